use crate::builder;
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::options::ParserOptions;
use crate::shunting_yard::ShuntingYard;
use arfunctors::{Dynamic, Registry};

/// Parses expressions over records of type `R`, resolving names in a
/// borrowed registry.
///
/// A parser holds no state between calls: trees returned by two calls share
/// nothing, and one parser may be used from several threads.
pub struct Parser<'r, R> {
    registry: &'r Registry<R>,
    options: ParserOptions,
}

impl<'r, R: 'static> Parser<'r, R> {
    pub fn new(registry: &'r Registry<R>) -> Self {
        Self::with_options(registry, ParserOptions::default())
    }

    pub fn with_options(registry: &'r Registry<R>, options: ParserOptions) -> Self {
        Parser { registry, options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn registry(&self) -> &'r Registry<R> {
        self.registry
    }

    /// Parses `text` into a run-time expression. Nothing is kept from a
    /// failed parse.
    pub fn parse(&self, text: &str) -> Result<Dynamic<R>, ParseError> {
        log::debug!("parsing {text:?}");
        let result = self.build(text);
        match &result {
            Ok(node) => log::debug!("parsed {text:?} as {node} ({})", node.output_type()),
            Err(e) => log::debug!("failed to parse {text:?}: {e}"),
        }
        result
    }

    fn build(&self, text: &str) -> Result<Dynamic<R>, ParseError> {
        let mut lexer = Lexer::new(text, self.registry, &self.options);
        let mut yard = ShuntingYard::new(self.options.operators.unary_precedence());
        while let Some(token) = lexer.next_token()? {
            yard.push(token)?;
        }
        let queue = yard.finish(text.len())?;
        builder::build(queue, text.len())
    }
}

/// Parses `text` with the default options.
pub fn parse<R: 'static>(registry: &Registry<R>, text: &str) -> Result<Dynamic<R>, ParseError> {
    Parser::new(registry).parse(text)
}
