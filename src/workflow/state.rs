use rust_decimal::Decimal;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::api::TransferRequest;
use crate::models::{AccountSnapshot, Field, ResolvedBeneficiary, TransactionRecord, TransferDraft};
use crate::types::AccountNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Drafting,
    /// Transient; only visible in logs since validation runs synchronously.
    Validating,
    AwaitingConfirmation,
    Submitting,
    Completed
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeneficiaryDisplay {
    pub name: String,
    pub bank_name: Option<String>,
    pub verified: bool
}

/// Immutable snapshot of "what will be sent", taken when validation passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPayload {
    pub from_account: AccountNumber,
    pub to_account: AccountNumber,
    pub amount: Decimal,
    pub purpose: String,
    pub beneficiary: Option<BeneficiaryDisplay>,
    pub projected_balance: Option<Decimal>,
    pub idempotency_key: Uuid
}

impl ConfirmationPayload {
    pub fn to_request(&self) -> TransferRequest {
        TransferRequest {
            to_account: self.to_account.clone(),
            amount: self.amount,
            purpose: self.purpose.clone(),
            idempotency_key: self.idempotency_key
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WorkflowState {
    Drafting,
    AwaitingConfirmation(ConfirmationPayload),
    Submitting(ConfirmationPayload),
    Completed(TransactionRecord)
}

impl WorkflowState {
    pub(crate) fn phase(&self) -> Phase {
        match self {
            Self::Drafting => Phase::Drafting,
            Self::AwaitingConfirmation(_) => Phase::AwaitingConfirmation,
            Self::Submitting(_) => Phase::Submitting,
            Self::Completed(_) => Phase::Completed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Confirm arrived outside AwaitingConfirmation and changed nothing.
    Ignored,
    Completed(TransactionRecord),
    /// Back in Drafting with the draft intact; carries the message shown to the user.
    Failed(String)
}

/// Point-in-time copy of everything a UI needs to render the workflow.
#[derive(Debug, Clone)]
pub struct WorkflowView {
    pub phase: Phase,
    pub draft: TransferDraft,
    pub field_errors: BTreeMap<Field, String>,
    pub workflow_error: Option<String>,
    pub account: Option<AccountSnapshot>,
    pub beneficiary: Option<ResolvedBeneficiary>,
    pub projected_balance: Option<Decimal>,
    pub can_submit: bool,
    pub confirmation: Option<ConfirmationPayload>,
    pub completed: Option<TransactionRecord>,
    pub recent_recipients: Vec<AccountNumber>
}
