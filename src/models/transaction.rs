use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::types::{AccountNumber, TransactionId};

/// Lifecycle status reported by the server for a transfer.
///
/// Status naming is not consistent across backend versions, so anything
/// unrecognised lands in `Other` instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Approved,
    Completed,
    Rejected,
    Other(String)
}

impl TransactionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" | "PENDING_APPROVAL" | "IN_PROGRESS" | "PROCESSING" => Self::Pending,
            "APPROVED" => Self::Approved,
            "COMPLETED" | "COMPLETE" | "SUCCESS" | "SETTLED" => Self::Completed,
            "REJECTED" | "DECLINED" | "FAILED" => Self::Rejected,
            _ => Self::Other(raw.trim().to_string())
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(formatter, "PENDING"),
            Self::Approved => write!(formatter, "APPROVED"),
            Self::Completed => write!(formatter, "COMPLETED"),
            Self::Rejected => write!(formatter, "REJECTED"),
            Self::Other(raw) => write!(formatter, "{raw}")
        }
    }
}

/// A server-issued transfer record. The workflow only ever displays these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Server reference. Empty when the server did not return one.
    pub id: TransactionId,
    /// Sending account, taken from the request context if the server omitted it.
    pub from_account: AccountNumber,
    pub to_account: AccountNumber,
    /// Amount the server accepted, which is the submitted amount unless it says otherwise.
    pub amount: Decimal,
    /// Effective purpose, with any custom text already substituted.
    pub purpose: String,
    /// Defaults to `Pending` when the server sent no status.
    pub status: TransactionStatus,
    /// The transfer is parked until a manager approves it.
    pub requires_manager_approval: bool,
    /// Server timestamp, `None` when missing or unreadable.
    pub created_at: Option<DateTime<Utc>>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outbound,
    Inbound,
    Unknown
}

impl Direction {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OUT" | "OUTBOUND" | "OUTGOING" | "DEBIT" | "SENT" => Self::Outbound,
            "IN" | "INBOUND" | "INCOMING" | "CREDIT" | "RECEIVED" => Self::Inbound,
            _ => Self::Unknown
        }
    }
}

/// One row of the customer's transaction history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: TransactionId,
    /// Only `Outbound` entries feed the recent recipients list.
    pub direction: Direction,
    /// Destination account; blank values are normalised to `None`.
    pub to_account: Option<AccountNumber>,
    pub from_account: Option<AccountNumber>,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub purpose: Option<String>
}
