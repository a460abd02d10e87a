//! Folds the postfix queue into a run-time expression tree.

use crate::error::ParseError;
use crate::shunting_yard::{Item, Postfix};
use arfunctors::{Dynamic, NumericType};

pub(crate) fn build<R: 'static>(queue: Vec<Item<R>>, end: usize) -> Result<Dynamic<R>, ParseError> {
    let mut values: Vec<Dynamic<R>> = Vec::with_capacity(queue.len());
    for Item { postfix, position } in queue {
        log::trace!("fold {} at {position}", postfix.describe());
        let node = match postfix {
            Postfix::Operand(node) => node,
            Postfix::Unary(op) => {
                let operand = pop(&mut values, position)?;
                let ty = operand.output_type();
                if op.result_type(ty).is_none() {
                    return Err(invalid_operands(op.symbol(), &[ty], position));
                }
                Dynamic::unary(op, operand)
            }
            Postfix::Binary(op) => {
                let right = pop(&mut values, position)?;
                let left = pop(&mut values, position)?;
                let (lt, rt) = (left.output_type(), right.output_type());
                if op.result_type(lt, rt).is_none() {
                    return Err(invalid_operands(op.symbol(), &[lt, rt], position));
                }
                Dynamic::binary(op, left, right)
            }
            Postfix::Call { name, function, args } => {
                if args != function.arity() {
                    return Err(ParseError::ArityMismatch {
                        expected: function.arity(),
                        found: args,
                        name,
                        position,
                    });
                }
                let first = values
                    .len()
                    .checked_sub(args)
                    .ok_or_else(|| ParseError::malformed(position, "missing arguments"))?;
                let args = values.split_off(first);
                Dynamic::call(name, function, args)
            }
        };
        values.push(node);
    }

    let root = values.pop();
    match root {
        Some(node) if values.is_empty() => Ok(node),
        Some(_) => Err(ParseError::malformed(end, "more than one value")),
        None => Err(ParseError::malformed(end, "empty expression")),
    }
}

fn pop<R>(values: &mut Vec<Dynamic<R>>, position: usize) -> Result<Dynamic<R>, ParseError> {
    values
        .pop()
        .ok_or_else(|| ParseError::malformed(position, "missing operand"))
}

fn invalid_operands(symbol: &'static str, types: &[NumericType], position: usize) -> ParseError {
    ParseError::InvalidOperands {
        symbol,
        operands: NumericType::join(types),
        position,
    }
}
