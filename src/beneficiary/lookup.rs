use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::api::{AccountHolder, BankingApi};
use crate::timers::Debouncer;
use crate::types::AccountNumber;

/// Resolves manually typed recipient accounts to a holder name.
///
/// Lookups wait for typing to settle and successful answers are cached for
/// a short time. Any failure simply yields `None`.
pub struct RecipientLookup<A: BankingApi> {
    api: Arc<A>,
    debouncer: Debouncer,
    cache: Cache<AccountNumber, AccountHolder>
}

impl<A: BankingApi> RecipientLookup<A> {
    pub fn new(api: Arc<A>, debounce: Duration, capacity: u64, ttl: Duration) -> Self {
        Self {
            api,
            debouncer: Debouncer::new(debounce),
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build()
        }
    }

    /// Debounced lookup. Returns `None` when superseded by a newer call.
    pub async fn lookup(&self, account_number: &str) -> Option<AccountHolder> {
        let account_number = account_number.trim().to_string();

        if account_number.is_empty() {
            return None;
        }

        self.debouncer.run(|| self.fetch(account_number)).await.flatten()
    }

    async fn fetch(&self, account_number: AccountNumber) -> Option<AccountHolder> {
        if let Some(holder) = self.cache.get(&account_number).await {
            return Some(holder);
        }

        match self.api.lookup_account(&account_number).await {
            Ok(payload) => {
                let holder = payload.into_holder(&account_number)?;
                self.cache.insert(account_number, holder.clone()).await;
                Some(holder)
            }
            Err(error) => {
                debug!("Recipient lookup for [{account_number}] failed: {error}");
                None
            }
        }
    }
}
