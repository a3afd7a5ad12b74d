use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Field;
use crate::types::AmountError;

/// A field-scoped validation failure. The display text is the message the
/// user sees next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Sender account details are unavailable. Please reload your account and try again.")]
    SenderUnavailable,
    #[error("{field} is required")]
    Required {
        field: Field
    },
    #[error("You cannot transfer funds to your own account")]
    SelfTransfer,
    #[error("Amount must be a number with at most 2 decimal places")]
    InvalidAmount(AmountError),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Amount cannot exceed {max}")]
    AmountAboveLimit {
        max: Decimal
    },
    #[error("{field} must be at most {max} characters")]
    PurposeTooLong {
        field: Field,
        max: usize
    },
    #[error("Insufficient balance. Available balance is {available}")]
    InsufficientBalance {
        available: Decimal
    }
}

impl ValidationError {
    /// The draft field this error should be displayed against.
    pub fn field(&self) -> Field {
        match self {
            Self::SenderUnavailable => Field::SenderAccount,
            Self::Required { field } | Self::PurposeTooLong { field, .. } => *field,
            Self::SelfTransfer => Field::ToAccount,
            Self::InvalidAmount(_)
            | Self::NonPositiveAmount
            | Self::AmountAboveLimit { .. }
            | Self::InsufficientBalance { .. } => Field::Amount
        }
    }
}
