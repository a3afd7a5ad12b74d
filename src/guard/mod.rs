//! Role-based gating of the transfer workflow.
//!
//! This only decides what the UI offers. The write endpoint enforces the
//! real allow/deny decision.


use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Customer,
    Auditor,
    Manager,
    Admin,
    /// Anything the portal does not recognise.
    Other(String)
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        let normalized = normalized.strip_prefix("role_").unwrap_or(&normalized);

        match normalized {
            "customer" | "user" => Self::Customer,
            "auditor" => Self::Auditor,
            "manager" => Self::Manager,
            "admin" | "administrator" => Self::Admin,
            _ => Self::Other(raw.trim().to_string())
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(formatter, "customer"),
            Self::Auditor => write!(formatter, "auditor"),
            Self::Manager => write!(formatter, "manager"),
            Self::Admin => write!(formatter, "admin"),
            Self::Other(raw) => write!(formatter, "{raw}")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    InitiateTransfer,
    ApproveTransfer,
    ViewHistory
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGuardResult {
    pub allowed: bool,
    pub guidance_message: Option<String>
}

impl RoleGuardResult {
    fn allow() -> Self {
        Self { allowed: true, guidance_message: None }
    }

    fn deny(message: &str) -> Self {
        Self { allowed: false, guidance_message: Some(message.to_string()) }
    }
}

const GENERIC_DENIAL: &str = "Your role does not have access to this feature. Contact your administrator if you believe this is a mistake.";

pub fn evaluate(role: &Role, capability: Capability) -> RoleGuardResult {
    match (capability, role) {
        (Capability::InitiateTransfer, Role::Customer) => RoleGuardResult::allow(),
        (Capability::InitiateTransfer, Role::Auditor) => RoleGuardResult::deny(
            "Auditors have read-only access. You can review transactions but cannot initiate transfers."
        ),
        (Capability::InitiateTransfer, Role::Manager) => RoleGuardResult::deny(
            "Managers approve transfers rather than initiate them. Use the approvals queue to review pending transfers."
        ),
        (Capability::InitiateTransfer, Role::Admin) => RoleGuardResult::deny(
            "Administrators manage users and system settings. Transfers must be initiated from a customer account."
        ),

        (Capability::ApproveTransfer, Role::Manager) => RoleGuardResult::allow(),
        (Capability::ApproveTransfer, Role::Customer) => RoleGuardResult::deny(
            "Transfers that need approval are reviewed by a manager. You will see the outcome in your transaction history."
        ),
        (Capability::ApproveTransfer, Role::Auditor) => RoleGuardResult::deny(
            "Auditors have read-only access and cannot approve transfers."
        ),
        (Capability::ApproveTransfer, Role::Admin) => RoleGuardResult::deny(
            "Transfer approval is reserved for managers."
        ),

        (Capability::ViewHistory, Role::Customer | Role::Auditor | Role::Manager | Role::Admin) => RoleGuardResult::allow(),

        (_, Role::Other(_)) => RoleGuardResult::deny(GENERIC_DENIAL)
    }
}
