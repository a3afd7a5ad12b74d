use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::api::ApiError;
use crate::models::{AccountSnapshot, BeneficiaryInfo, Direction, HistoryEntry, TransactionRecord, TransactionStatus};
use crate::types::AccountNumber;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccountOverviewPayload {
    pub full_name: Option<String>,
    pub account_number: Option<String>,
    pub balance: Option<Decimal>
}

impl AccountOverviewPayload {
    /// A snapshot is only usable with an account number and a balance.
    pub fn into_snapshot(self) -> Option<AccountSnapshot> {
        let account_number = self.account_number.filter(|number| !number.trim().is_empty())?;
        let balance = self.balance?;

        Some(AccountSnapshot {
            full_name: self.full_name.unwrap_or_default(),
            account_number,
            balance
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BeneficiaryPayload {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<String>,
    pub beneficiary_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub nickname: Option<String>
}

impl BeneficiaryPayload {
    /// Entries without an id or account number cannot be selected and are dropped.
    pub fn into_info(self) -> Option<BeneficiaryInfo> {
        let id = self.id.filter(|id| !id.trim().is_empty())?;
        let account_number = self.account_number.filter(|number| !number.trim().is_empty())?;

        Some(BeneficiaryInfo {
            id,
            beneficiary_name: self.beneficiary_name.unwrap_or_default(),
            account_number,
            bank_name: self.bank_name.filter(|name| !name.trim().is_empty()),
            nickname: self.nickname.filter(|name| !name.trim().is_empty())
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryEntryPayload {
    #[serde(alias = "transaction_id", deserialize_with = "lenient_id")]
    pub id: Option<String>,
    pub direction: Option<String>,
    pub to_account: Option<String>,
    pub from_account: Option<String>,
    pub amount: Option<Decimal>,
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    pub purpose: Option<String>
}

impl From<HistoryEntryPayload> for HistoryEntry {
    fn from(payload: HistoryEntryPayload) -> Self {
        Self {
            id: payload.id.unwrap_or_default(),
            direction: payload.direction.as_deref().map(Direction::parse).unwrap_or(Direction::Unknown),
            to_account: payload.to_account.filter(|account| !account.trim().is_empty()),
            from_account: payload.from_account.filter(|account| !account.trim().is_empty()),
            amount: payload.amount.unwrap_or_default(),
            status: payload.status.as_deref().map(TransactionStatus::parse).unwrap_or(TransactionStatus::Pending),
            created_at: payload.created_at,
            purpose: payload.purpose
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccountLookupPayload {
    pub account_number: Option<String>,
    pub holder_name: Option<String>,
    pub bank_name: Option<String>
}

/// Display details for a manually entered recipient account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountHolder {
    pub account_number: AccountNumber,
    pub holder_name: String,
    pub bank_name: Option<String>
}

impl AccountLookupPayload {
    pub fn into_holder(self, requested: &str) -> Option<AccountHolder> {
        let holder_name = self.holder_name.filter(|name| !name.trim().is_empty())?;

        Some(AccountHolder {
            account_number: self.account_number.unwrap_or_else(|| requested.to_string()),
            holder_name,
            bank_name: self.bank_name
        })
    }
}

/// Response to a transfer submission.
///
/// Every field is optional and `id`/`created_at` are read leniently: a
/// settled transfer must never be reported as failed because one field had
/// an unexpected shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransactionPayload {
    #[serde(alias = "transaction_id", deserialize_with = "lenient_id")]
    pub id: Option<String>,
    pub from_account: Option<String>,
    pub to_account: Option<String>,
    pub amount: Option<Decimal>,
    pub purpose: Option<String>,
    pub status: Option<String>,
    pub requires_manager_approval: Option<bool>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>
}

impl TransactionPayload {
    /// # Errors
    ///
    /// `ApiError::Decode` only when the body is not a JSON object with the expected field types.
    pub fn from_json(body: &str) -> Result<Self, ApiError> {
        serde_json::from_str(body).map_err(|error| ApiError::Decode(error.to_string()))
    }

    /// Normalises the payload, taking fields the server omitted from the
    /// request that produced it. A missing status is reported as pending.
    pub fn into_record(self, request: &TransferRequest, from_account: &str) -> TransactionRecord {
        TransactionRecord {
            id: self.id.unwrap_or_default(),
            from_account: self.from_account.unwrap_or_else(|| from_account.to_string()),
            to_account: self.to_account.unwrap_or_else(|| request.to_account.clone()),
            amount: self.amount.unwrap_or(request.amount),
            purpose: self.purpose.unwrap_or_else(|| request.purpose.clone()),
            status: self.status.as_deref().map(TransactionStatus::parse).unwrap_or(TransactionStatus::Pending),
            requires_manager_approval: self.requires_manager_approval.unwrap_or(false),
            created_at: self.created_at
        }
    }
}

/// Body of the submit-transfer call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    pub to_account: AccountNumber,
    pub amount: Decimal,
    pub purpose: String,
    pub idempotency_key: Uuid
}

/// Ids arrive as strings or numbers depending on the endpoint. Anything else is dropped.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let id = match Value::deserialize(deserializer)? {
        Value::String(id) => Some(id),
        Value::Number(id) => Some(id.to_string()),
        _ => None
    };

    Ok(id.filter(|id| !id.trim().is_empty()))
}

/// An unreadable timestamp must not sink the whole payload, so it becomes `None`.
fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(raw) => Ok(parse_timestamp(&raw)),
        _ => Ok(None)
    }
}

/// RFC 3339, or a zone-less `YYYY-MM-DD[ T]HH:MM:SS[.fff]` read as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"].iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
