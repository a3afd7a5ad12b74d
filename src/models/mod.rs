mod account;
mod beneficiary;
mod draft;
#[cfg(test)]
mod tests;
mod transaction;

pub use account::AccountSnapshot;
pub use beneficiary::{BeneficiaryInfo, BeneficiarySource, ResolvedBeneficiary};
pub use draft::{Field, TransferDraft};
pub use transaction::{Direction, HistoryEntry, TransactionRecord, TransactionStatus};
