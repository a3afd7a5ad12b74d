use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::api::{AccountHolder, ApiError, BankingApi};
use crate::beneficiary::{BeneficiaryResolver, RecipientLookup};
use crate::config::WorkflowConfig;
use crate::guard::{evaluate, Capability};
use crate::models::{
    AccountSnapshot, BeneficiaryInfo, Field, HistoryEntry, ResolvedBeneficiary, TransactionRecord, TransferDraft
};
use crate::projection::{project_balance, recent_recipients, ReceiptProjector, ReceiptView};
use crate::session::SessionContext;
use crate::types::AccountNumber;
use crate::utils::lock;
use crate::validation::{validate_amount, validate_purpose, validate_recipient, ValidationError};
use crate::workflow::state::WorkflowState;
use crate::workflow::{BeneficiaryDisplay, ConfirmOutcome, ConfirmationPayload, Phase, WorkflowError, WorkflowView};

struct Inner {
    state: WorkflowState,
    draft: TransferDraft,
    beneficiary: Option<ResolvedBeneficiary>,
    beneficiaries: Vec<BeneficiaryInfo>,
    account: Option<AccountSnapshot>,
    history: Vec<HistoryEntry>,
    field_errors: BTreeMap<Field, ValidationError>,
    workflow_error: Option<String>,
    /// Bumped whenever the recipient changes so late beneficiary lookups can be dropped.
    selection: u64
}

impl Inner {
    fn new() -> Self {
        Self {
            state: WorkflowState::Drafting,
            draft: TransferDraft::new(),
            beneficiary: None,
            beneficiaries: Vec::new(),
            account: None,
            history: Vec::new(),
            field_errors: BTreeMap::new(),
            workflow_error: None,
            selection: 0
        }
    }

    fn ensure_editable(&self) -> Result<(), WorkflowError> {
        match self.state {
            WorkflowState::Drafting | WorkflowState::AwaitingConfirmation(_) => Ok(()),
            WorkflowState::Submitting(_) => Err(WorkflowError::SubmissionInFlight),
            WorkflowState::Completed(_) => Err(WorkflowError::InvalidTransition {
                action: "edit the draft",
                phase: Phase::Completed
            })
        }
    }

    fn projected_balance(&self) -> Option<Decimal> {
        project_balance(self.account.as_ref().map(|account| account.balance), self.draft.amount_text())
    }

    fn can_submit(&self) -> bool {
        matches!(self.state, WorkflowState::Drafting)
            && !self.projected_balance().is_some_and(|balance| balance < Decimal::ZERO)
    }
}

/// Drives one customer's transfer from draft to settled receipt.
///
/// All methods take `&self`; the state lives behind a mutex that is never
/// held across a network call. Entering `Submitting` happens under that
/// lock, which is what guarantees at most one in-flight submission even when
/// several confirms race on a shared reference.
pub struct TransferWorkflow<A: BankingApi> {
    context: SessionContext,
    config: WorkflowConfig,
    api: Arc<A>,
    resolver: BeneficiaryResolver<A>,
    lookup: RecipientLookup<A>,
    receipts: ReceiptProjector,
    inner: Mutex<Inner>
}

impl<A: BankingApi> TransferWorkflow<A> {
    /// Checks the caller's role and loads the initial draft context.
    ///
    /// Read failures are not fatal: the workflow starts with whatever could
    /// be loaded and validation reports a missing sender account.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::AccessDenied` if the role may not initiate transfers.
    /// * `WorkflowError::Config` if `config` fails `WorkflowConfig::validate`.
    pub async fn start(context: SessionContext, api: Arc<A>, config: WorkflowConfig) -> Result<Self, WorkflowError> {
        let guard = evaluate(&context.role, Capability::InitiateTransfer);

        if !guard.allowed {
            warn!("User [{}] with role [{}] denied transfer access", context.user_id, context.role);
            let message = guard.guidance_message
                .unwrap_or_else(|| "You do not have access to transfers.".to_string());
            return Err(WorkflowError::AccessDenied(message));
        }

        if let Err(error) = config.validate() {
            warn!("Transfer workflow for user [{}] rejected its configuration: {error}", context.user_id);
            return Err(WorkflowError::Config(error.to_string()));
        }

        let workflow = Self {
            resolver: BeneficiaryResolver::new(api.clone()),
            lookup: RecipientLookup::new(
                api.clone(),
                config.lookup_debounce(),
                config.lookup_cache_capacity,
                config.lookup_cache_ttl()
            ),
            receipts: ReceiptProjector::new(&config),
            inner: Mutex::new(Inner::new()),
            context,
            config,
            api
        };

        workflow.refresh().await;

        info!("Transfer workflow started for user [{}]", workflow.context.user_id);

        Ok(workflow)
    }

    /// Re-reads the account, beneficiary list and history. Failed reads keep the previous data.
    pub async fn refresh(&self) {
        let (account, beneficiaries, history) = tokio::join!(
            self.fetch_account(),
            self.resolver.load_list(),
            self.fetch_history()
        );

        let mut inner = self.inner();

        if let Some(account) = account {
            inner.account = Some(account);
        }

        match beneficiaries {
            Ok(beneficiaries) => inner.beneficiaries = beneficiaries,
            Err(error) => warn!("Beneficiary list could not be loaded: {error}")
        }

        if let Some(history) = history {
            inner.history = history;
        }
    }

    async fn fetch_account(&self) -> Option<AccountSnapshot> {
        match self.api.account_overview().await {
            Ok(payload) => {
                let snapshot = payload.into_snapshot();

                if snapshot.is_none() {
                    warn!("Account overview for user [{}] is missing its number or balance", self.context.user_id);
                }

                snapshot
            }
            Err(error) => {
                warn!("Account overview for user [{}] could not be loaded: {error}", self.context.user_id);
                None
            }
        }
    }

    async fn fetch_history(&self) -> Option<Vec<HistoryEntry>> {
        match self.api.transaction_history().await {
            Ok(entries) => Some(entries.into_iter().map(HistoryEntry::from).collect()),
            Err(error) => {
                warn!("Transaction history could not be loaded: {error}");
                None
            }
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    fn edit(&self, fields: &[Field], apply: impl FnOnce(&mut Inner)) -> Result<(), WorkflowError> {
        let mut inner = self.inner();
        inner.ensure_editable()?;

        apply(&mut *inner);

        for field in fields {
            inner.field_errors.remove(field);
        }

        debug!("Draft fields {fields:?} updated");

        Ok(())
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.inner().state.phase()
    }

    pub fn draft(&self) -> TransferDraft {
        self.inner().draft.clone()
    }

    pub fn account(&self) -> Option<AccountSnapshot> {
        self.inner().account.clone()
    }

    pub fn beneficiaries(&self) -> Vec<BeneficiaryInfo> {
        self.inner().beneficiaries.clone()
    }

    pub fn field_error(&self, field: Field) -> Option<ValidationError> {
        self.inner().field_errors.get(&field).cloned()
    }

    pub fn workflow_error(&self) -> Option<String> {
        self.inner().workflow_error.clone()
    }

    pub fn set_to_account(&self, value: &str) -> Result<(), WorkflowError> {
        self.edit(&[Field::ToAccount], |inner| {
            inner.draft.set_to_account(value);
            inner.selection += 1;

            let still_selected = inner.beneficiary.as_ref()
                .is_some_and(|beneficiary| beneficiary.info.account_number == value.trim());

            if !still_selected {
                inner.beneficiary = None;
            }
        })
    }

    pub fn set_amount(&self, value: &str) -> Result<(), WorkflowError> {
        self.edit(&[Field::Amount], |inner| inner.draft.set_amount_text(value))
    }

    pub fn set_purpose(&self, value: &str) -> Result<(), WorkflowError> {
        self.edit(&[Field::Purpose, Field::CustomPurpose], |inner| inner.draft.set_purpose(value))
    }

    pub fn set_custom_purpose(&self, value: &str) -> Result<(), WorkflowError> {
        self.edit(&[Field::CustomPurpose], |inner| inner.draft.set_custom_purpose(value))
    }

    /// Resolves a saved beneficiary and makes it the draft's recipient.
    ///
    /// If the recipient changes again while the lookup is in flight, the
    /// late result is returned but not applied.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Beneficiary` if the detail fetch failed and the id is not in the saved list.
    /// * `WorkflowError::SubmissionInFlight` or `WorkflowError::InvalidTransition` if the draft
    ///   cannot be edited in the current phase.
    pub async fn select_beneficiary(&self, beneficiary_id: &str) -> Result<ResolvedBeneficiary, WorkflowError> {
        let ticket = {
            let mut inner = self.inner();
            inner.ensure_editable()?;
            inner.selection += 1;
            inner.selection
        };

        let resolved = self.resolver.resolve(beneficiary_id).await?;

        let mut inner = self.inner();

        if inner.selection != ticket {
            debug!("Beneficiary [{beneficiary_id}] selection superseded");
            return Ok(resolved);
        }

        inner.ensure_editable()?;
        inner.draft.set_to_account(&resolved.info.account_number);
        inner.field_errors.remove(&Field::ToAccount);
        inner.beneficiary = Some(resolved.clone());

        debug!("Beneficiary [{beneficiary_id}] selected, verified: {}", resolved.is_verified());

        Ok(resolved)
    }

    /// Debounced holder-name lookup for a manually typed account number.
    pub async fn lookup_recipient(&self, account_number: &str) -> Option<AccountHolder> {
        self.lookup.lookup(account_number).await
    }

    pub fn recent_recipients(&self) -> Vec<AccountNumber> {
        recent_recipients(&self.inner().history, self.config.recent_recipient_limit)
    }

    pub fn projected_balance(&self) -> Option<Decimal> {
        self.inner().projected_balance()
    }

    /// Submit is offered only while drafting and never while the projected balance is negative.
    pub fn can_submit(&self) -> bool {
        self.inner().can_submit()
    }

    /// Drafting -> Validating -> AwaitingConfirmation, or back to Drafting with one field error.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::Validation` with the first failing rule, also stored against its field.
    /// * `WorkflowError::SubmissionInFlight` or `WorkflowError::InvalidTransition` outside Drafting.
    pub fn submit(&self) -> Result<ConfirmationPayload, WorkflowError> {
        let mut inner = self.inner();

        match &inner.state {
            WorkflowState::Drafting => {}
            WorkflowState::Submitting(_) => return Err(WorkflowError::SubmissionInFlight),
            state => {
                return Err(WorkflowError::InvalidTransition { action: "submit", phase: state.phase() });
            }
        }

        debug!("Workflow [{}] {:?} -> {:?}", self.context.user_id, Phase::Drafting, Phase::Validating);

        inner.workflow_error = None;
        inner.field_errors.clear();

        match self.validate(&*inner) {
            Ok(payload) => {
                inner.state = WorkflowState::AwaitingConfirmation(payload.clone());
                debug!("Workflow [{}] {:?} -> {:?}", self.context.user_id, Phase::Validating, Phase::AwaitingConfirmation);
                Ok(payload)
            }
            Err(error) => {
                debug!("Workflow [{}] validation failed on {:?}: {error}", self.context.user_id, error.field());
                inner.field_errors.insert(error.field(), error.clone());
                Err(error.into())
            }
        }
    }

    /// Checks run in a fixed order and the first failure wins.
    fn validate(&self, inner: &Inner) -> Result<ConfirmationPayload, ValidationError> {
        let account = inner.account.as_ref().ok_or(ValidationError::SenderUnavailable)?;
        let to_account = validate_recipient(inner.draft.to_account(), &account.account_number)?;
        let amount = validate_amount(inner.draft.amount_text(), self.config.max_amount)?;
        let purpose = validate_purpose(&inner.draft, self.config.max_purpose_length)?;

        if amount > account.balance {
            return Err(ValidationError::InsufficientBalance { available: account.balance });
        }

        let beneficiary = inner.beneficiary.as_ref()
            .filter(|beneficiary| beneficiary.info.account_number == to_account)
            .map(|beneficiary| BeneficiaryDisplay {
                name: beneficiary.info.display_name().to_string(),
                bank_name: beneficiary.info.bank_name.clone(),
                verified: beneficiary.is_verified()
            });

        Ok(ConfirmationPayload {
            from_account: account.account_number.clone(),
            to_account: to_account.to_string(),
            amount,
            purpose,
            beneficiary,
            projected_balance: account.balance.checked_sub(amount),
            idempotency_key: inner.draft.idempotency_key()
        })
    }

    /// AwaitingConfirmation -> Drafting. Returns false when there was nothing to cancel.
    pub fn cancel(&self) -> bool {
        let mut inner = self.inner();

        if !matches!(inner.state, WorkflowState::AwaitingConfirmation(_)) {
            debug!("Cancel ignored while {:?}", inner.state.phase());
            return false;
        }

        inner.state = WorkflowState::Drafting;
        debug!("Workflow [{}] confirmation cancelled", self.context.user_id);

        true
    }

    /// Throws the whole draft away and returns to an empty Drafting state.
    pub fn discard_draft(&self) -> Result<(), WorkflowError> {
        let mut inner = self.inner();
        inner.ensure_editable()?;

        inner.state = WorkflowState::Drafting;
        inner.draft.clear();
        inner.beneficiary = None;
        inner.field_errors.clear();
        inner.workflow_error = None;
        inner.selection += 1;

        Ok(())
    }

    /// AwaitingConfirmation -> Submitting -> Completed | Drafting.
    ///
    /// Any confirm that does not find the workflow awaiting confirmation is
    /// ignored, so double-clicks and racing callers produce a single request.
    /// A timeout is treated exactly like a server error, with no assumption
    /// about whether the transfer landed.
    pub async fn confirm(&self) -> ConfirmOutcome {
        let payload = {
            let mut inner = self.inner();

            let payload = match &inner.state {
                WorkflowState::AwaitingConfirmation(payload) => payload.clone(),
                state => {
                    debug!("Confirm ignored while {:?}", state.phase());
                    return ConfirmOutcome::Ignored;
                }
            };

            inner.state = WorkflowState::Submitting(payload.clone());
            payload
        };

        let request = payload.to_request();

        info!(
            "User [{}] submitting transfer of {} to [{}] with key [{}]",
            self.context.user_id, request.amount, request.to_account, request.idempotency_key
        );

        let result = match timeout(self.config.submit_timeout(), self.api.submit_transfer(&request)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout)
        };

        match result {
            Ok(response) => {
                let record = response.into_record(&request, &payload.from_account);
                self.complete(record.clone()).await;
                ConfirmOutcome::Completed(record)
            }
            Err(error) => {
                let message = error.server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.config.generic_failure_message.clone());

                warn!("Transfer [{}] for user [{}] failed: {error}", request.idempotency_key, self.context.user_id);

                let mut inner = self.inner();
                inner.state = WorkflowState::Drafting;
                inner.workflow_error = Some(message.clone());

                ConfirmOutcome::Failed(message)
            }
        }
    }

    async fn complete(&self, record: TransactionRecord) {
        let (account, history) = tokio::join!(self.fetch_account(), self.fetch_history());

        let mut inner = self.inner();

        match account {
            Some(account) => inner.account = Some(account),
            None => warn!("Balance for user [{}] may be stale after transfer [{}]", self.context.user_id, record.id)
        }

        if let Some(history) = history {
            inner.history = history;
        }

        inner.draft.clear();
        inner.beneficiary = None;
        inner.field_errors.clear();
        inner.workflow_error = None;
        inner.selection += 1;

        info!("Transfer [{}] for user [{}] settled with status {}", record.id, self.context.user_id, record.status);

        inner.state = WorkflowState::Completed(record);
    }

    /// Completed -> Drafting.
    pub fn dismiss_receipt(&self) -> bool {
        let mut inner = self.inner();

        if !matches!(inner.state, WorkflowState::Completed(_)) {
            return false;
        }

        inner.state = WorkflowState::Drafting;

        true
    }

    pub fn completed(&self) -> Option<TransactionRecord> {
        match &self.inner().state {
            WorkflowState::Completed(record) => Some(record.clone()),
            _ => None
        }
    }

    pub fn receipt(&self) -> Option<ReceiptView> {
        self.completed().map(|record| self.receipts.project(&record))
    }

    pub fn receipts(&self) -> &ReceiptProjector {
        &self.receipts
    }

    pub fn view(&self) -> WorkflowView {
        let inner = self.inner();

        let (confirmation, completed) = match &inner.state {
            WorkflowState::AwaitingConfirmation(payload) | WorkflowState::Submitting(payload) => (Some(payload.clone()), None),
            WorkflowState::Completed(record) => (None, Some(record.clone())),
            WorkflowState::Drafting => (None, None)
        };

        WorkflowView {
            phase: inner.state.phase(),
            draft: inner.draft.clone(),
            field_errors: inner.field_errors.iter()
                .map(|(field, error)| (*field, error.to_string()))
                .collect(),
            workflow_error: inner.workflow_error.clone(),
            account: inner.account.clone(),
            beneficiary: inner.beneficiary.clone(),
            projected_balance: inner.projected_balance(),
            can_submit: inner.can_submit(),
            confirmation,
            completed,
            recent_recipients: recent_recipients(&inner.history, self.config.recent_recipient_limit)
        }
    }
}
