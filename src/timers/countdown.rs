use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// A single-shot action scheduled to run after a delay, cancellable until it fires.
pub struct Countdown {
    deadline: Instant,
    handle: JoinHandle<()>
}

impl Countdown {
    pub fn schedule<Fut>(delay: Duration, action: Fut) -> Self
    where
        Fut: Future<Output = ()> + Send + 'static
    {
        let deadline = Instant::now() + delay;
        let handle = tokio::spawn(async move {
            sleep_until(deadline).await;
            action.await;
        });

        Self { deadline, handle }
    }

    /// Time left before the action fires, zero once it is due.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops the action if it has not run yet.
    pub fn cancel(self) {
        self.handle.abort();
    }
}
