use crate::backend::BackendError;
use crate::identity::{CaptainProfile, Identity, RiderProfile};
use crate::role::Role;

/// `/captains/profile` wraps the profile; `/users/profile` returns it bare.
#[derive(serde::Deserialize)]
pub(super) struct CaptainProfileEnvelope {
    pub(super) captain: CaptainProfile,
}

pub(super) fn parse_identity(role: Role, body: &[u8]) -> Result<Identity, BackendError> {
    let decoded = match role {
        Role::Rider => serde_json::from_slice::<RiderProfile>(body).map(Identity::Rider),
        Role::Captain => serde_json::from_slice::<CaptainProfileEnvelope>(body)
            .map(|envelope| Identity::Captain(envelope.captain)),
    };
    decoded.map_err(|err| BackendError::transport(format!("invalid {role} profile payload: {err}")))
}

/// Map a response status to an error, or `None` for success.
pub(super) fn classify_status(status: u16) -> Option<BackendError> {
    match status {
        200..=299 => None,
        401 | 403 => Some(BackendError::InvalidCredential { status }),
        other => Some(BackendError::transport(format!("unexpected status {other}"))),
    }
}
