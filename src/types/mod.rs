mod amount;
mod errors;

pub use amount::Amount;
pub use errors::AmountError;

pub type AccountNumber = String;
pub type BeneficiaryId = String;
pub type TransactionId = String;
