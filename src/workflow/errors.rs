use thiserror::Error;

use crate::beneficiary::ResolveError;
use crate::validation::ValidationError;
use crate::workflow::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// The caller's role may not use the workflow. Carries the guidance message.
    #[error("{0}")]
    AccessDenied(String),
    /// The supplied configuration failed validation. Carries the reason.
    #[error("{0}")]
    Config(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Beneficiary(#[from] ResolveError),
    #[error("A transfer submission is already in progress")]
    SubmissionInFlight,
    #[error("Cannot {action} while the workflow is {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: Phase
    }
}
