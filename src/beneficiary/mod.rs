mod lookup;
mod resolver;
#[cfg(test)]
mod tests;

use thiserror::Error;

pub use lookup::RecipientLookup;
pub use resolver::BeneficiaryResolver;

use crate::types::BeneficiaryId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Beneficiary [{0}] could not be fetched and is not in the saved list")]
    NotFound(BeneficiaryId)
}
