use crate::expression::error::ExprError;
use crate::lower::error::LowerError;

pub type DensityResult<T> = Result<T, DensityError>;

#[derive(thiserror::Error, Debug)]
pub enum DensityError {
    #[error("{0}")]
    Parse(#[from] ExprError),

    #[error("lowering error: {0}")]
    Lower(#[from] LowerError),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serde(String),
}

impl DensityError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
