//! Test helpers for common test setup and utilities.
//!
//! Shared fixtures for unit and integration tests: sample profiles, the
//! reference fare catalog, and a scripted [`SessionBackend`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{BackendError, SessionBackend, VerificationRequest};
use crate::identity::{
    CaptainProfile, CaptainStatus, CaptainVehicle, FullName, Identity, RiderProfile,
};
use crate::pricing::FareCatalog;
use crate::role::{Role, RoleCapability};
use crate::session::{Credential, SessionContext};
use crate::vehicle::VehicleType;

/// Reference catalog: car 100, moto 50, auto 70.
pub fn sample_catalog() -> FareCatalog {
    FareCatalog::from_raw([("car", 100.0), ("moto", 50.0), ("auto", 70.0)])
        .expect("sample catalog should be valid")
}

pub fn sample_rider_profile() -> RiderProfile {
    RiderProfile {
        id: "rider-1".to_string(),
        fullname: FullName {
            firstname: "Ravi".to_string(),
            lastname: Some("Kumar".to_string()),
        },
        email: "ravi@example.com".to_string(),
    }
}

pub fn sample_captain_profile() -> CaptainProfile {
    CaptainProfile {
        id: "captain-1".to_string(),
        fullname: FullName {
            firstname: "Asha".to_string(),
            lastname: Some("Rao".to_string()),
        },
        email: "asha@example.com".to_string(),
        status: CaptainStatus::Active,
        vehicle: CaptainVehicle {
            color: "black".to_string(),
            plate: "KA01AB1234".to_string(),
            capacity: 4,
            vehicle_type: VehicleType::Car,
        },
    }
}

pub fn sample_rider_identity() -> Identity {
    Identity::Rider(sample_rider_profile())
}

pub fn sample_captain_identity() -> Identity {
    Identity::Captain(sample_captain_profile())
}

/// Store `token` for the capability's role in `session`.
pub fn store_token(session: &SessionContext, capability: &RoleCapability, token: &str) {
    session.store(
        capability.token_key,
        Credential::new(token).expect("test token should not be blank"),
    );
}

/// How a [`ScriptedBackend`] answers verification calls.
#[derive(Debug, Clone)]
pub enum VerifyScript {
    /// Accept and answer with the sample profile for the requesting role.
    Accept,
    Reject { status: u16 },
    Unreachable,
}

/// In-memory backend with a fixed answer and call counters.
#[derive(Debug)]
pub struct ScriptedBackend {
    verify: VerifyScript,
    logout_fails: bool,
    verify_calls: AtomicUsize,
    logout_calls: AtomicUsize,
    seen_tokens: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(verify: VerifyScript) -> Self {
        Self {
            verify,
            logout_fails: false,
            verify_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new(VerifyScript::Accept)
    }

    pub fn rejecting() -> Self {
        Self::new(VerifyScript::Reject { status: 401 })
    }

    pub fn unreachable() -> Self {
        Self::new(VerifyScript::Unreachable)
    }

    pub fn with_failing_logout(mut self) -> Self {
        self.logout_fails = true;
        self
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    /// Tokens presented to either endpoint, in call order.
    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen_tokens.lock().expect("seen_tokens lock").clone()
    }

    fn record(&self, credential: &Credential) {
        self.seen_tokens
            .lock()
            .expect("seen_tokens lock")
            .push(credential.expose().to_string());
    }
}

#[async_trait]
impl SessionBackend for ScriptedBackend {
    async fn verify(&self, request: &VerificationRequest) -> Result<Identity, BackendError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.record(&request.credential);
        match &self.verify {
            VerifyScript::Accept => Ok(match request.capability.role {
                Role::Rider => sample_rider_identity(),
                Role::Captain => sample_captain_identity(),
            }),
            VerifyScript::Reject { status } => {
                Err(BackendError::InvalidCredential { status: *status })
            }
            VerifyScript::Unreachable => Err(BackendError::transport("connection refused")),
        }
    }

    async fn logout(
        &self,
        _capability: &RoleCapability,
        credential: &Credential,
    ) -> Result<(), BackendError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.record(credential);
        if self.logout_fails {
            Err(BackendError::transport("connection reset"))
        } else {
            Ok(())
        }
    }
}
