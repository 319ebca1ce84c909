use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ZkError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid point: {0}")]
    InvalidPoint(String),

    #[error("invalid verification key: {0}")]
    InvalidKey(String),

    #[error("public input length mismatch: expected {expected}, got {got}")]
    InputLengthMismatch { expected: usize, got: usize },

    #[error("decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ZkError>;
