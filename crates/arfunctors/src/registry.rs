//! Functor and function registry.
//!
//! Identifiers met while parsing are resolved here. A name either denotes a
//! functor, a node evaluated against the record, or a function, a callable
//! over numeric arguments whose arity and parameter types are read from its
//! Rust signature.
//!
//! A registry is populated once and then only read; sharing it between
//! threads that parse concurrently is fine.

use crate::dynamic::{Dynamic, IntoDynamic};
use crate::error::{EvalError, RegistryError};
use crate::value::{NumericType, Scalar, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

type Callable = dyn Fn(&[Value]) -> Option<Value> + Send + Sync;

/// A registered function with its introspected signature.
#[derive(Clone)]
pub struct Function {
    params: Vec<NumericType>,
    result: NumericType,
    call: Arc<Callable>,
}

impl Function {
    pub fn new<Args, F: IntoFunction<Args>>(f: F) -> Self {
        f.into_function()
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[NumericType] {
        &self.params
    }

    pub fn result_type(&self) -> NumericType {
        self.result
    }

    /// Calls the function, converting each argument to its parameter type.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        let mismatch = || EvalError::ArityMismatch {
            name: name.to_string(),
            expected: self.arity(),
            found: args.len(),
        };
        if args.len() != self.arity() {
            return Err(mismatch());
        }
        (self.call)(args).ok_or_else(mismatch)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("result", &self.result)
            .finish()
    }
}

/// Callables usable as registry functions: `Fn(A0, .., An) -> O` with every
/// type a [`Scalar`] and up to six parameters. `Args` is the parameter tuple.
pub trait IntoFunction<Args> {
    fn into_function(self) -> Function;
}

macro_rules! into_function {
    ($($arg:ident $val:ident),*) => {
        impl<Func, Out, $($arg),*> IntoFunction<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out + Send + Sync + 'static,
            Out: Scalar,
            $($arg: Scalar,)*
        {
            fn into_function(self) -> Function {
                Function {
                    params: vec![$($arg::TYPE),*],
                    result: Out::TYPE,
                    call: Arc::new(move |args: &[Value]| match *args {
                        [$($val),*] => Some((self)($($arg::from_value($val)),*).into_value()),
                        _ => None,
                    }),
                }
            }
        }
    };
}

into_function!();
into_function!(A0 a0);
into_function!(A0 a0, A1 a1);
into_function!(A0 a0, A1 a1, A2 a2);
into_function!(A0 a0, A1 a1, A2 a2, A3 a3);
into_function!(A0 a0, A1 a1, A2 a2, A3 a3, A4 a4);
into_function!(A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);

/// What a registered name denotes.
pub enum Entry<R> {
    Functor(Dynamic<R>),
    Function(Function),
}

impl<R> Entry<R> {
    pub fn as_functor(&self) -> Option<&Dynamic<R>> {
        match self {
            Entry::Functor(node) => Some(node),
            Entry::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Entry::Functor(_) => None,
            Entry::Function(function) => Some(function),
        }
    }
}

impl<R> Clone for Entry<R> {
    fn clone(&self) -> Self {
        match self {
            Entry::Functor(node) => Entry::Functor(node.clone()),
            Entry::Function(function) => Entry::Function(function.clone()),
        }
    }
}

impl<R> fmt::Debug for Entry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Functor(node) => f.debug_tuple("Functor").field(node).finish(),
            Entry::Function(function) => f.debug_tuple("Function").field(function).finish(),
        }
    }
}

/// `(letter | '_') (letter | digit | '_')*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Names resolvable inside expressions over records of type `R`.
///
/// ```
/// use arfunctors::Registry;
///
/// struct Point { x: f64, y: f64 }
///
/// let mut registry = Registry::<Point>::new();
/// registry
///     .register_functor("x", |p: &Point| p.x)?
///     .register_functor("y", |p: &Point| p.y)?
///     .register_function("hypot", |a: f64, b: f64| a.hypot(b))?;
///
/// assert_eq!(registry.names().collect::<Vec<_>>(), ["x", "y", "hypot"]);
/// assert_eq!(registry.lookup("hypot")?.as_function().map(|f| f.arity()), Some(2));
/// # Ok::<(), arfunctors::RegistryError>(())
/// ```
pub struct Registry<R> {
    entries: IndexMap<String, Entry<R>>,
}

impl<R> Default for Registry<R> {
    fn default() -> Self {
        Registry {
            entries: IndexMap::new(),
        }
    }
}

impl<R: 'static> Registry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an accessor over the record.
    pub fn register_functor<T, F>(&mut self, name: &str, f: F) -> Result<&mut Self, RegistryError>
    where
        T: Scalar,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        self.insert(name, Entry::Functor(Dynamic::functor(name, f)))
    }

    /// Registers a whole expression under a name; it renders as the name.
    pub fn register_node(
        &mut self,
        name: &str,
        node: impl IntoDynamic<R>,
    ) -> Result<&mut Self, RegistryError> {
        let node = Dynamic::named(name, node.into_dynamic());
        self.insert(name, Entry::Functor(node))
    }

    pub fn register_function<Args, F>(
        &mut self,
        name: &str,
        f: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: IntoFunction<Args>,
    {
        self.insert(name, Entry::Function(f.into_function()))
    }

    fn insert(&mut self, name: &str, entry: Entry<R>) -> Result<&mut Self, RegistryError> {
        if !is_identifier(name) || name == "true" || name == "false" {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if self.entries.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        match &entry {
            Entry::Functor(node) => {
                log::debug!("registered functor {name}: {}", node.output_type())
            }
            Entry::Function(function) => {
                log::debug!("registered function {name}/{}", function.arity())
            }
        }
        self.entries.insert(name.to_string(), entry);
        Ok(self)
    }
}

impl<R> Registry<R> {
    pub fn lookup(&self, name: &str) -> Result<&Entry<R>, RegistryError> {
        self.entries
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Entry<R>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> fmt::Debug for Registry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Record {
        x: i32,
    }

    #[test]
    fn signatures_are_introspected() {
        let clamp = Function::new(|v: f64, lo: f64, hi: f64| v.clamp(lo, hi));
        assert_eq!(clamp.arity(), 3);
        assert_eq!(clamp.params(), [NumericType::F64; 3]);
        assert_eq!(clamp.result_type(), NumericType::F64);

        let answer = Function::new(|| 42u64);
        assert_eq!(answer.arity(), 0);
        assert_eq!(answer.invoke("answer", &[]), Ok(Value::U64(42)));
    }

    #[test]
    fn arguments_are_converted_to_parameter_types() {
        let half = Function::new(|v: f32| v / 2.0);
        assert_eq!(half.invoke("half", &[Value::I32(3)]), Ok(Value::F32(1.5)));
        let even = Function::new(|v: u32| v % 2 == 0);
        assert_eq!(
            even.invoke("even", &[Value::F64(4.7)]),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn invoke_checks_arity() {
        let add = Function::new(|a: i32, b: i32| a + b);
        assert_eq!(
            add.invoke("add", &[Value::I32(1)]),
            Err(EvalError::ArityMismatch {
                name: "add".into(),
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn names_are_validated() {
        let mut registry = Registry::<Record>::new();
        registry.register_functor("x", |r: &Record| r.x).unwrap();
        assert_eq!(
            registry.register_functor("x", |r: &Record| r.x).err(),
            Some(RegistryError::Duplicate("x".into()))
        );
        for bad in ["", "1x", "a-b", "true", "false", "x y"] {
            assert_eq!(
                registry.register_function(bad, || 1).err(),
                Some(RegistryError::InvalidName(bad.into()))
            );
        }
        assert_eq!(
            registry.lookup("y").err(),
            Some(RegistryError::NotFound("y".into()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registered_nodes_render_as_their_name() {
        let mut registry = Registry::<Record>::new();
        let doubled = Dynamic::functor("x", |r: &Record| r.x) * 2i32;
        registry.register_node("doubled", doubled).unwrap();
        let node = registry.lookup("doubled").unwrap().as_functor().unwrap();
        assert_eq!(node.to_string(), "doubled");
        assert_eq!(node.evaluate(&Record { x: 4 }), Ok(Value::I32(8)));
    }
}
