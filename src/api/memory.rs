use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

use crate::api::{
    AccountLookupPayload, AccountOverviewPayload, ApiError, ApiResult, BankingApi, BeneficiaryPayload,
    HistoryEntryPayload, TransactionPayload, TransferRequest
};
use crate::utils::lock;

/// An in-process backend holding one customer's data.
///
/// Submissions answer with scripted responses in order; once the script is
/// exhausted they succeed, debit the stored balance and report `COMPLETED`.
#[derive(Default)]
pub struct InMemoryBankingApi {
    overview: Mutex<Option<AccountOverviewPayload>>,
    beneficiaries: Mutex<Vec<BeneficiaryPayload>>,
    details: DashMap<String, BeneficiaryPayload>,
    directory: DashMap<String, AccountLookupPayload>,
    history: Mutex<Vec<HistoryEntryPayload>>,
    submit_script: Mutex<VecDeque<ApiResult<TransactionPayload>>>,
    submitted: Mutex<Vec<TransferRequest>>,
    submit_delay: Mutex<Duration>,
    fail_details: AtomicBool,
    fail_overview: AtomicBool,
    submit_calls: AtomicUsize,
    overview_calls: AtomicUsize,
    lookup_calls: AtomicUsize
}

impl InMemoryBankingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, full_name: &str, account_number: &str, balance: Decimal) -> Self {
        *lock(&self.overview) = Some(AccountOverviewPayload {
            full_name: Some(full_name.to_string()),
            account_number: Some(account_number.to_string()),
            balance: Some(balance)
        });
        self
    }

    /// Adds a saved beneficiary. `bank_name` is only returned by the detail endpoint.
    pub fn with_beneficiary(self, id: &str, name: &str, account_number: &str, bank_name: Option<&str>) -> Self {
        let summary = BeneficiaryPayload {
            id: Some(id.to_string()),
            beneficiary_name: Some(name.to_string()),
            account_number: Some(account_number.to_string()),
            bank_name: None,
            nickname: None
        };
        let detail = BeneficiaryPayload { bank_name: bank_name.map(str::to_string), ..summary.clone() };

        lock(&self.beneficiaries).push(summary);
        self.details.insert(id.to_string(), detail);
        self
    }

    pub fn with_history(self, entry: HistoryEntryPayload) -> Self {
        lock(&self.history).push(entry);
        self
    }

    pub fn with_known_account(self, account_number: &str, holder_name: &str) -> Self {
        self.directory.insert(account_number.to_string(), AccountLookupPayload {
            account_number: Some(account_number.to_string()),
            holder_name: Some(holder_name.to_string()),
            bank_name: None
        });
        self
    }

    pub fn with_submit_delay(self, delay: Duration) -> Self {
        *lock(&self.submit_delay) = delay;
        self
    }

    pub fn push_submit_response(&self, response: ApiResult<TransactionPayload>) {
        lock(&self.submit_script).push_back(response);
    }

    pub fn set_fail_beneficiary_details(&self, fail: bool) {
        self.fail_details.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_account_overview(&self, fail: bool) {
        self.fail_overview.store(fail, Ordering::SeqCst);
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn overview_calls(&self) -> usize {
        self.overview_calls.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<TransferRequest> {
        lock(&self.submitted).clone()
    }

    fn settle(&self, request: &TransferRequest) -> TransactionPayload {
        let mut overview = lock(&self.overview);
        let from_account = overview.as_ref().and_then(|overview| overview.account_number.clone());

        if let Some(balance) = overview.as_mut().and_then(|overview| overview.balance.as_mut()) {
            *balance -= request.amount;
        }

        let id = format!("TXN{}", self.submit_calls());

        lock(&self.history).insert(0, HistoryEntryPayload {
            id: Some(id.clone()),
            direction: Some("OUTBOUND".to_string()),
            to_account: Some(request.to_account.clone()),
            from_account: from_account.clone(),
            amount: Some(request.amount),
            status: Some("COMPLETED".to_string()),
            created_at: None,
            purpose: Some(request.purpose.clone())
        });

        TransactionPayload {
            id: Some(id),
            from_account,
            to_account: Some(request.to_account.clone()),
            amount: Some(request.amount),
            purpose: Some(request.purpose.clone()),
            status: Some("COMPLETED".to_string()),
            requires_manager_approval: Some(false),
            created_at: None
        }
    }
}

#[async_trait]
impl BankingApi for InMemoryBankingApi {
    async fn account_overview(&self) -> ApiResult<AccountOverviewPayload> {
        self.overview_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_overview.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("account service unavailable".to_string()));
        }

        lock(&self.overview).clone()
            .ok_or_else(|| ApiError::Rejected { status: 404, message: Some("Account not found".to_string()) })
    }

    async fn beneficiaries(&self) -> ApiResult<Vec<BeneficiaryPayload>> {
        Ok(lock(&self.beneficiaries).clone())
    }

    async fn beneficiary_detail(&self, beneficiary_id: &str, _include_sensitive: bool) -> ApiResult<BeneficiaryPayload> {
        if self.fail_details.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("beneficiary service unavailable".to_string()));
        }

        self.details.get(beneficiary_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ApiError::Rejected { status: 404, message: Some("Beneficiary not found".to_string()) })
    }

    async fn transaction_history(&self) -> ApiResult<Vec<HistoryEntryPayload>> {
        Ok(lock(&self.history).clone())
    }

    async fn lookup_account(&self, account_number: &str) -> ApiResult<AccountLookupPayload> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);

        self.directory.get(account_number)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ApiError::Rejected { status: 404, message: Some("Account not found".to_string()) })
    }

    async fn submit_transfer(&self, request: &TransferRequest) -> ApiResult<TransactionPayload> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.submitted).push(request.clone());

        let delay = *lock(&self.submit_delay);
        if !delay.is_zero() {
            sleep(delay).await;
        }

        let scripted = lock(&self.submit_script).pop_front();

        match scripted {
            Some(response) => response,
            None => Ok(self.settle(request))
        }
    }
}
