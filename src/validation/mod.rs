//! Pure field validators.
//!
//! These run on every keystroke and again at submit time, so they must stay
//! side-effect free and cheap.

mod errors;

use rust_decimal::Decimal;
use std::str::FromStr;

pub use errors::ValidationError;

use crate::models::{Field, TransferDraft};
use crate::types::{Amount, AmountError};

/// Parses and bounds-checks an amount typed by the user.
pub fn validate_amount(text: &str, max: Decimal) -> Result<Decimal, ValidationError> {
    let amount = match Amount::from_str(text) {
        Ok(amount) => amount,
        Err(AmountError::Empty) => return Err(ValidationError::Required { field: Field::Amount }),
        Err(error) => return Err(ValidationError::InvalidAmount(error))
    };

    if !amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount);
    }

    if amount.value() > max {
        return Err(ValidationError::AmountAboveLimit { max });
    }

    Ok(amount.value())
}

/// Fails when the trimmed value is empty; returns the trimmed value otherwise.
pub fn is_required(value: &str, field: Field) -> Result<&str, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }

    Ok(trimmed)
}

/// Checks the effective purpose of a draft and returns it.
///
/// The length limit applies to whichever field supplied the text, and the
/// error names that field.
pub fn validate_purpose(draft: &TransferDraft, max_length: usize) -> Result<String, ValidationError> {
    is_required(draft.purpose(), Field::Purpose)?;

    let field = draft.purpose_field();
    let effective = is_required(draft.effective_purpose(), field)?;

    if effective.chars().count() > max_length {
        return Err(ValidationError::PurposeTooLong { field, max: max_length });
    }

    Ok(effective.to_string())
}

/// Rejects a recipient that matches the sender account.
pub fn validate_recipient<'a>(to_account: &'a str, from_account: &str) -> Result<&'a str, ValidationError> {
    let recipient = is_required(to_account, Field::ToAccount)?;

    if recipient.eq_ignore_ascii_case(from_account.trim()) {
        return Err(ValidationError::SelfTransfer);
    }

    Ok(recipient)
}
