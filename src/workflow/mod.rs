mod errors;
mod state;
mod transfer_workflow;

pub use errors::WorkflowError;
pub use state::{BeneficiaryDisplay, ConfirmOutcome, ConfirmationPayload, Phase, WorkflowView};
pub use transfer_workflow::TransferWorkflow;
