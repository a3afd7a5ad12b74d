//! Read-only session context injected into each workflow, and the forced
//! sign-out that follows credential-affecting operations.


use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::guard::Role;
use crate::timers::Countdown;

/// Who is driving the workflow. Resolved by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: String,
    pub role: Role
}

impl SessionContext {
    pub fn new(user_id: &str, role: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            role: Role::from(role)
        }
    }
}

#[async_trait]
pub trait SessionControl: Send + Sync + 'static {
    async fn sign_out(&self, reason: &str) -> anyhow::Result<()>;
}

/// Signs the user out once `delay` elapses, unless the countdown is cancelled.
pub fn schedule_forced_sign_out<C: SessionControl>(control: Arc<C>, delay: Duration, reason: &str) -> Countdown {
    let reason = reason.to_string();

    info!("Forced sign-out scheduled in {delay:?}: {reason}");

    Countdown::schedule(delay, async move {
        if let Err(error) = control.sign_out(&reason).await {
            warn!("Forced sign-out failed: {error}");
        }
    })
}
