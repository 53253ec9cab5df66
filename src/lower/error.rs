use std::fmt;

/// Where an offending call argument came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgRef {
    Position(usize),
    Keyword(String),
}

impl fmt::Display for ArgRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(i) => write!(f, "#{i}"),
            Self::Keyword(name) => write!(f, "'{name}'"),
        }
    }
}

/// Structural failure while lowering. Every variant aborts the whole lowering call.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LowerError {
    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("Function '{function}' does not take arguments")]
    TakesNoArguments { function: &'static str },

    #[error("Function '{function}' does not take keyword arguments")]
    NoKeywordArguments { function: &'static str },

    #[error(
        "Wrong number of arguments for function '{function}' (expected {expected} found {found})"
    )]
    WrongArgumentCount {
        function: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Too many arguments for function '{function}' (at most {max}, found {found})")]
    TooManyArguments {
        function: &'static str,
        max: usize,
        found: usize,
    },

    #[error("Function '{function}' does not take argument '{keyword}'")]
    UnknownKeyword {
        function: &'static str,
        keyword: String,
    },

    #[error("In call to function '{function}': Argument '{param}' specified more than once")]
    DuplicateArgument {
        function: &'static str,
        param: &'static str,
    },

    #[error("In call to function '{function}': Argument {arg} must be a constant")]
    ExpectedConstant { function: &'static str, arg: ArgRef },

    #[error("In call to function '{function}': Argument {arg} must be a string literal")]
    ExpectedString { function: &'static str, arg: ArgRef },

    #[error("in subexpression {expr}: unsupported operator '{op}'")]
    UnsupportedOperator { expr: String, op: &'static str },

    #[error("Non-integer-constant powers not supported (exponent {exponent})")]
    UnsupportedPower { exponent: String },

    #[error("Integer power {exponent} exceeds the expansion limit of {limit}")]
    PowerTooLarge { exponent: i64, limit: u32 },

    #[error("Output exceeds {limit} function nodes")]
    OutputTooLarge { limit: usize },

    #[error("Invalid function call expression: '{callee}' is not a function name")]
    InvalidCallTarget { callee: String },

    #[error("Invalid constant {value}")]
    InvalidConstant { value: String },

    #[error("Invalid expression '{expr}'")]
    InvalidExpression { expr: String },

    #[error("Expression nests deeper than {limit} levels")]
    DepthLimitExceeded { limit: usize },
}
