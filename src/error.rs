use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Missing field: {0} must not be empty")]
    MissingField(&'static str),

    #[error("Score out of range: {0} (expected 1 to 5)")]
    ScoreOutOfRange(i32),
}
