use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Runs only the last call of a burst, once the burst has been quiet for `window`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0))
        }
    }

    /// Waits out the window and runs `action` unless a newer call arrived.
    ///
    /// Superseded calls resolve to `None` without running their action.
    pub async fn run<F, Fut, T>(&self, action: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        sleep(self.window).await;

        if self.generation.load(Ordering::SeqCst) != ticket {
            return None;
        }

        Some(action().await)
    }
}
