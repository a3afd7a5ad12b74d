use crate::types::{AccountNumber, BeneficiaryId};

/// A saved counterparty account the customer can pick instead of typing a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeneficiaryInfo {
    pub id: BeneficiaryId,
    pub beneficiary_name: String,
    pub account_number: AccountNumber,
    pub bank_name: Option<String>,
    pub nickname: Option<String>
}

impl BeneficiaryInfo {
    /// Nickname when one is set, otherwise the registered name.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref()
            .filter(|nickname| !nickname.trim().is_empty())
            .unwrap_or(&self.beneficiary_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeneficiarySource {
    /// Fresh detail read including sensitive fields.
    Verified,
    /// Entry from the previously loaded list, possibly stale.
    Cached
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBeneficiary {
    pub info: BeneficiaryInfo,
    pub source: BeneficiarySource
}

impl ResolvedBeneficiary {
    pub fn is_verified(&self) -> bool {
        self.source == BeneficiarySource::Verified
    }
}
