use rust_decimal::Decimal;

use crate::types::AccountNumber;

/// Read-only projection of the sender's account.
///
/// This is a cache of server state. The balance is never adjusted locally;
/// it is replaced by a fresh read after every completed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub full_name: String,
    pub account_number: AccountNumber,
    pub balance: Decimal
}
