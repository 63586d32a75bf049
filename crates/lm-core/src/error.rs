use thiserror::Error;

pub type LmResult<T> = Result<T, LmError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LmError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Too few points for {what}: need at least {required}, got {actual}")]
    TooFewPoints {
        what: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}
