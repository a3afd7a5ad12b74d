//! Port to the banking backend.
//!
//! The backend is the source of truth for balances, beneficiaries and
//! transfer legality. Everything it returns is modelled as an
//! optional-field payload and normalised into domain types here, at the
//! boundary, so the rest of the crate never trusts a field to be present.

mod errors;
mod memory;
mod wire;

use async_trait::async_trait;

pub use errors::{ApiError, ApiResult};
pub use memory::InMemoryBankingApi;
pub use wire::{
    AccountHolder, AccountLookupPayload, AccountOverviewPayload, BeneficiaryPayload, HistoryEntryPayload,
    TransactionPayload, TransferRequest
};

#[async_trait]
pub trait BankingApi: Send + Sync + 'static {
    /// Sender account number, holder name and balance.
    async fn account_overview(&self) -> ApiResult<AccountOverviewPayload>;

    /// Saved beneficiaries, without sensitive fields.
    async fn beneficiaries(&self) -> ApiResult<Vec<BeneficiaryPayload>>;

    /// Full detail for one saved beneficiary. `include_sensitive` asks for the
    /// unmasked account number and bank name.
    async fn beneficiary_detail(&self, beneficiary_id: &str, include_sensitive: bool) -> ApiResult<BeneficiaryPayload>;

    /// Transaction history, most recent first.
    async fn transaction_history(&self) -> ApiResult<Vec<HistoryEntryPayload>>;

    /// Resolves a manually typed account number to its holder.
    async fn lookup_account(&self, account_number: &str) -> ApiResult<AccountLookupPayload>;

    /// Submits one transfer. Implementations should pass `request.idempotency_key`
    /// through so the server can deduplicate retries.
    ///
    /// # Errors
    ///
    /// * `ApiError::Rejected` when the server refuses the transfer, with its message if structured.
    /// * `ApiError::Transport` or `ApiError::Timeout` when the outcome is unknown.
    /// * `ApiError::Decode` when the response body is not JSON at all.
    async fn submit_transfer(&self, request: &TransferRequest) -> ApiResult<TransactionPayload>;
}
