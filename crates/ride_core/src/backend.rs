//! Port to the session backend: profile verification and logout.
//!
//! The gate only depends on [`SessionBackend`]; the reqwest adapter lives in
//! [`http`] behind the `http` feature so the core stays transport-free.

use async_trait::async_trait;
use thiserror::Error;

use crate::identity::Identity;
use crate::role::RoleCapability;
use crate::session::Credential;

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
mod response;

/// Identifies one gate mount so a late verification result can be matched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountTicket(pub(crate) u64);

/// A verification call requested by a pending gate mount.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub ticket: MountTicket,
    pub capability: RoleCapability,
    pub credential: Credential,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend rejected the credential (401/403).
    #[error("credential rejected by backend (status {status})")]
    InvalidCredential { status: u16 },
    /// Network failure, timeout, unexpected status or undecodable body.
    #[error("session backend unreachable: {0}")]
    Transport(String),
}

impl BackendError {
    pub fn transport(message: impl Into<String>) -> Self {
        BackendError::Transport(message.into())
    }
}

#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Confirm the credential and return the profile it belongs to.
    async fn verify(&self, request: &VerificationRequest) -> Result<Identity, BackendError>;

    /// Invalidate the server-side session for the credential.
    async fn logout(
        &self,
        capability: &RoleCapability,
        credential: &Credential,
    ) -> Result<(), BackendError>;
}
