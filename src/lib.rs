//! Funds-transfer initiation for a banking front end.
//!
//! A [`TransferWorkflow`] takes a customer from an empty draft, through
//! validation and an explicit confirmation step, to a single submission and
//! a receipt. The backend is reached only through the [`BankingApi`] port,
//! and every computed view (projected balance, recent recipients, receipt)
//! is derived from server data rather than kept as a local ledger.

pub mod api;
pub mod beneficiary;
pub mod config;
pub mod guard;
pub mod logging;
pub mod models;
pub mod projection;
pub mod session;
pub mod timers;
pub mod types;
pub mod validation;
pub mod workflow;

mod utils;

pub use api::{ApiError, BankingApi, InMemoryBankingApi};
pub use config::{ConfigError, WorkflowConfig};
pub use guard::{Capability, Role, RoleGuardResult};
pub use session::{SessionContext, SessionControl};
pub use workflow::{ConfirmOutcome, ConfirmationPayload, Phase, TransferWorkflow, WorkflowError, WorkflowView};
