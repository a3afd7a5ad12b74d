use rust_decimal::Decimal;
use std::str::FromStr;

use crate::types::Amount;

/// Balance left after sending `amount_text`, or `None` when the balance is
/// unknown or the text is not a positive amount.
///
/// Recomputed on every call so it always reflects the latest draft and
/// snapshot. A negative result is a warning, not a validation failure.
pub fn project_balance(balance: Option<Decimal>, amount_text: &str) -> Option<Decimal> {
    let balance = balance?;
    let amount = Amount::from_str(amount_text).ok().filter(Amount::is_positive)?;

    balance.checked_sub(amount.value())
}
