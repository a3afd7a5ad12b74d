use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,
    #[error("Amount is not a valid number: {0}")]
    InvalidFormat(String),
    #[error("Amount has more than {max} decimal places")]
    TooManyDecimals {
        max: usize
    },
    #[error("Amount is too large")]
    Overflow
}
