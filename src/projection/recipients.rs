use std::collections::HashSet;

use crate::models::{Direction, HistoryEntry};
use crate::types::AccountNumber;

/// Most recent distinct destination accounts of outbound transfers.
///
/// `history` is expected most recent first; first-seen order is kept.
pub fn recent_recipients(history: &[HistoryEntry], limit: usize) -> Vec<AccountNumber> {
    let mut seen = HashSet::new();

    history.iter()
        .filter(|entry| entry.direction == Direction::Outbound)
        .filter_map(|entry| entry.to_account.as_deref())
        .map(str::trim)
        .filter(|account| !account.is_empty())
        .filter(|account| seen.insert(account.to_string()))
        .take(limit)
        .map(str::to_string)
        .collect()
}
