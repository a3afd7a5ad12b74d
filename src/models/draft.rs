use std::fmt;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use crate::types::AccountNumber;

/// Purpose values that defer to the free-text custom purpose.
const OTHER_PURPOSES: [&str; 2] = ["other", "others"];

/// Draft fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    SenderAccount,
    ToAccount,
    Amount,
    Purpose,
    CustomPurpose
}

impl Display for Field {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SenderAccount => "Sender account",
            Self::ToAccount => "Recipient account",
            Self::Amount => "Amount",
            Self::Purpose => "Purpose",
            Self::CustomPurpose => "Custom purpose"
        };

        write!(formatter, "{label}")
    }
}

/// The in-progress, unsubmitted transfer form.
///
/// Every mutation rolls the idempotency key, so a key always identifies one
/// exact set of field values. Resubmitting an untouched draft after a lost
/// response therefore sends the same key again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDraft {
    to_account: AccountNumber,
    amount_text: String,
    purpose: String,
    custom_purpose: Option<String>,
    idempotency_key: Uuid
}

impl Default for TransferDraft {
    fn default() -> Self {
        Self {
            to_account: String::new(),
            amount_text: String::new(),
            purpose: String::new(),
            custom_purpose: None,
            idempotency_key: Uuid::new_v4()
        }
    }
}

impl TransferDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_account(&self) -> &str {
        &self.to_account
    }

    pub fn amount_text(&self) -> &str {
        &self.amount_text
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn custom_purpose(&self) -> Option<&str> {
        self.custom_purpose.as_deref()
    }

    pub fn idempotency_key(&self) -> Uuid {
        self.idempotency_key
    }

    pub fn set_to_account(&mut self, value: &str) {
        self.to_account = value.to_string();
        self.touch();
    }

    pub fn set_amount_text(&mut self, value: &str) {
        self.amount_text = value.to_string();
        self.touch();
    }

    pub fn set_purpose(&mut self, value: &str) {
        self.purpose = value.to_string();
        self.touch();
    }

    pub fn set_custom_purpose(&mut self, value: &str) {
        self.custom_purpose = if value.is_empty() { None } else { Some(value.to_string()) };
        self.touch();
    }

    /// Whether the selected purpose defers to the custom text.
    pub fn uses_custom_purpose(&self) -> bool {
        let purpose = self.purpose.trim();
        OTHER_PURPOSES.iter().any(|other| purpose.eq_ignore_ascii_case(other))
    }

    /// The purpose text that will actually be sent, trimmed.
    pub fn effective_purpose(&self) -> &str {
        if self.uses_custom_purpose() {
            self.custom_purpose.as_deref().unwrap_or_default().trim()
        } else {
            self.purpose.trim()
        }
    }

    /// The field that supplied the effective purpose.
    pub fn purpose_field(&self) -> Field {
        if self.uses_custom_purpose() { Field::CustomPurpose } else { Field::Purpose }
    }

    pub fn is_empty(&self) -> bool {
        self.to_account.is_empty()
            && self.amount_text.is_empty()
            && self.purpose.is_empty()
            && self.custom_purpose.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn touch(&mut self) {
        self.idempotency_key = Uuid::new_v4();
    }
}
