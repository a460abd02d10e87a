use arfunctors::{LiteralTypes, OperatorTable};

/// Parser configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserOptions {
    /// Operator spellings and precedences recognised in the text.
    pub operators: OperatorTable,
    /// Types given to literals written without a suffix.
    pub literals: LiteralTypes,
}

impl ParserOptions {
    pub fn with_operators(mut self, operators: OperatorTable) -> Self {
        self.operators = operators;
        self
    }

    pub fn with_literals(mut self, literals: LiteralTypes) -> Self {
        self.literals = literals;
        self
    }
}
