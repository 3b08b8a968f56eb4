//! Logout action for either role.

use tracing::{info, warn};

use crate::backend::SessionBackend;
use crate::role::RoleCapability;
use crate::session::{Credential, SessionContext};

/// Ends the session for one role: tells the backend (best effort), drops the
/// stored credential and returns the login path to redirect to.
#[derive(Debug, Clone)]
pub struct LogoutAction {
    capability: RoleCapability,
    session: SessionContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub redirect_to: &'static str,
    /// Whether a credential was stored when logout ran.
    pub had_credential: bool,
    /// Whether the backend acknowledged the logout.
    pub backend_acknowledged: bool,
}

impl LogoutAction {
    pub fn new(capability: RoleCapability, session: SessionContext) -> Self {
        Self {
            capability,
            session,
        }
    }

    pub async fn run<B>(&self, backend: &B) -> LogoutOutcome
    where
        B: SessionBackend + ?Sized,
    {
        let Some(credential) = self.session.credential(self.capability.token_key) else {
            return LogoutOutcome {
                redirect_to: self.capability.login_redirect_path,
                had_credential: false,
                backend_acknowledged: false,
            };
        };

        let backend_acknowledged = match backend.logout(&self.capability, &credential).await {
            Ok(()) => true,
            Err(err) => {
                warn!(role = %self.capability.role, error = %err, "backend logout failed");
                false
            }
        };
        self.finish(&credential, backend_acknowledged)
    }

    /// Drop `credential` unless another one was stored while the backend call
    /// was in flight, and report the outcome.
    pub fn finish(&self, credential: &Credential, backend_acknowledged: bool) -> LogoutOutcome {
        if self.session.credential(self.capability.token_key).as_ref() == Some(credential) {
            self.session.clear(self.capability.token_key);
        }
        info!(role = %self.capability.role, "logged out");

        LogoutOutcome {
            redirect_to: self.capability.login_redirect_path,
            had_credential: true,
            backend_acknowledged,
        }
    }
}
