//! Route access gate: render a protected view only behind a verified session.
//!
//! One [`RouteAccessGate`] exists per role. Every navigation to a protected
//! path creates a fresh [`GateMount`], which walks
//! `Idle -> Pending -> {Granted | Denied}`:
//!
//! - [`GateMount::start`] re-reads the role's credential. Without one the mount
//!   is denied on the spot and no request is issued.
//! - With a credential the mount becomes pending and hands back a
//!   [`VerificationRequest`]; nothing is rendered until it resolves.
//! - [`GateMount::resolve`] applies the backend outcome. Results for a mount
//!   that was unmounted, or carrying another mount's ticket, are discarded.
//!
//! [`GateMount::run`] drives both steps against a [`SessionBackend`].

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::{BackendError, MountTicket, SessionBackend, VerificationRequest};
use crate::identity::Identity;
use crate::role::RoleCapability;
use crate::session::SessionContext;

/// What to do with the stored credential when verification cannot reach the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailurePolicy {
    /// Redirect but keep the credential so an outage does not force a new login.
    #[default]
    KeepCredential,
    ClearCredential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    MissingCredential,
    InvalidCredential,
    TransportFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Idle,
    Pending,
    Granted,
    Denied(DenialReason),
}

impl GatePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GatePhase::Granted | GatePhase::Denied(_))
    }
}

/// Instruction for the caller after a gate transition.
#[derive(Debug, Clone)]
pub enum GateStep {
    /// Issue this verification call and feed the result to [`GateMount::resolve`].
    Verify(VerificationRequest),
    /// The protected view is mounted.
    Render,
    /// Navigate to the role's login path.
    Redirect(&'static str),
    /// Nothing changed: the mount is gone, already settled, or the ticket is stale.
    Discarded,
}

/// What a mount shows right now.
#[derive(Debug, PartialEq, Eq)]
pub enum Rendered<'a, V> {
    Nothing,
    View(&'a V),
    Redirect(&'static str),
}

/// Per-role gate. Cheap to keep for the application's lifetime.
#[derive(Debug)]
pub struct RouteAccessGate {
    capability: RoleCapability,
    session: SessionContext,
    transport_policy: TransportFailurePolicy,
    next_ticket: Cell<u64>,
}

impl RouteAccessGate {
    pub fn new(capability: RoleCapability, session: SessionContext) -> Self {
        Self {
            capability,
            session,
            transport_policy: TransportFailurePolicy::default(),
            next_ticket: Cell::new(0),
        }
    }

    pub fn with_transport_policy(mut self, policy: TransportFailurePolicy) -> Self {
        self.transport_policy = policy;
        self
    }

    pub fn capability(&self) -> &RoleCapability {
        &self.capability
    }

    /// Mount the gate around a protected view. `view` runs at most once, with
    /// the verified identity.
    pub fn mount<V>(&self, view: impl FnOnce(&Identity) -> V + 'static) -> GateMount<V> {
        let ticket = MountTicket(self.next_ticket.get());
        self.next_ticket.set(ticket.0 + 1);
        GateMount {
            ticket,
            capability: self.capability,
            session: self.session.clone(),
            transport_policy: self.transport_policy,
            phase: GatePhase::Idle,
            mounted: true,
            identity: None,
            view: ViewSlot::Waiting(Box::new(view)),
        }
    }
}

enum ViewSlot<V> {
    Waiting(Box<dyn FnOnce(&Identity) -> V>),
    Mounted(V),
    Dropped,
}

/// One gate instance for one navigation.
pub struct GateMount<V> {
    ticket: MountTicket,
    capability: RoleCapability,
    session: SessionContext,
    transport_policy: TransportFailurePolicy,
    phase: GatePhase,
    mounted: bool,
    identity: Option<Identity>,
    view: ViewSlot<V>,
}

impl<V> fmt::Debug for GateMount<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateMount")
            .field("ticket", &self.ticket)
            .field("role", &self.capability.role)
            .field("phase", &self.phase)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl<V> GateMount<V> {
    pub fn ticket(&self) -> MountTicket {
        self.ticket
    }

    pub fn capability(&self) -> &RoleCapability {
        &self.capability
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Identity confirmed by the backend, once granted.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Read the credential and either deny immediately or request verification.
    pub fn start(&mut self) -> GateStep {
        if !self.mounted || self.phase != GatePhase::Idle {
            return GateStep::Discarded;
        }

        match self.session.credential(self.capability.token_key) {
            None => {
                info!(role = %self.capability.role, "no credential stored, redirecting to login");
                self.deny(DenialReason::MissingCredential)
            }
            Some(credential) => {
                debug!(role = %self.capability.role, ticket = self.ticket.0, "verifying session");
                self.phase = GatePhase::Pending;
                GateStep::Verify(VerificationRequest {
                    ticket: self.ticket,
                    capability: self.capability,
                    credential,
                })
            }
        }
    }

    /// Apply a verification outcome for `ticket`.
    pub fn resolve(
        &mut self,
        ticket: MountTicket,
        outcome: Result<Identity, BackendError>,
    ) -> GateStep {
        if !self.mounted || ticket != self.ticket || self.phase != GatePhase::Pending {
            debug!(
                role = %self.capability.role,
                ticket = ticket.0,
                mounted = self.mounted,
                "discarding verification result"
            );
            return GateStep::Discarded;
        }

        match outcome {
            Ok(identity) if identity.role() == self.capability.role => self.grant(identity),
            Ok(identity) => {
                warn!(
                    expected = %self.capability.role,
                    actual = %identity.role(),
                    "backend returned a profile for the wrong role"
                );
                self.session.clear(self.capability.token_key);
                self.deny(DenialReason::InvalidCredential)
            }
            Err(BackendError::InvalidCredential { status }) => {
                info!(role = %self.capability.role, status, "credential rejected, clearing it");
                self.session.clear(self.capability.token_key);
                self.deny(DenialReason::InvalidCredential)
            }
            Err(BackendError::Transport(message)) => {
                warn!(role = %self.capability.role, error = %message, "session verification failed");
                if self.transport_policy == TransportFailurePolicy::ClearCredential {
                    self.session.clear(self.capability.token_key);
                }
                self.deny(DenialReason::TransportFailure)
            }
        }
    }

    /// Start, verify against `backend` and resolve. Returns the final step.
    pub async fn run<B>(&mut self, backend: &B) -> GateStep
    where
        B: SessionBackend + ?Sized,
    {
        match self.start() {
            GateStep::Verify(request) => {
                let outcome = backend.verify(&request).await;
                self.resolve(request.ticket, outcome)
            }
            step => step,
        }
    }

    /// Tear the mount down. Any verification result still in flight is discarded.
    pub fn unmount(&mut self) {
        if self.mounted {
            debug!(role = %self.capability.role, ticket = self.ticket.0, phase = ?self.phase, "gate unmounted");
        }
        self.mounted = false;
        self.view = ViewSlot::Dropped;
    }

    /// Current output. Never re-verifies; a granted mount keeps returning the
    /// same view instance.
    pub fn render(&self) -> Rendered<'_, V> {
        match (self.phase, &self.view) {
            (GatePhase::Granted, ViewSlot::Mounted(view)) if self.mounted => Rendered::View(view),
            (GatePhase::Denied(_), _) => Rendered::Redirect(self.capability.login_redirect_path),
            _ => Rendered::Nothing,
        }
    }

    /// Mutable access to the mounted view, for screens that keep their own state.
    pub fn view_mut(&mut self) -> Option<&mut V> {
        match (&mut self.view, self.mounted) {
            (ViewSlot::Mounted(view), true) => Some(view),
            _ => None,
        }
    }

    /// Take the mounted view out, ending the mount.
    pub fn into_view(self) -> Option<V> {
        match self.view {
            ViewSlot::Mounted(view) if self.mounted => Some(view),
            _ => None,
        }
    }

    fn grant(&mut self, identity: Identity) -> GateStep {
        info!(role = %self.capability.role, user = %identity.id(), "session verified");
        self.phase = GatePhase::Granted;
        if let ViewSlot::Waiting(build) = std::mem::replace(&mut self.view, ViewSlot::Dropped) {
            self.view = ViewSlot::Mounted(build(&identity));
        }
        self.identity = Some(identity);
        GateStep::Render
    }

    fn deny(&mut self, reason: DenialReason) -> GateStep {
        self.phase = GatePhase::Denied(reason);
        self.view = ViewSlot::Dropped;
        GateStep::Redirect(self.capability.login_redirect_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::{CAPTAIN_CAPABILITY, RIDER_CAPABILITY};
    use crate::session::Credential;
    use crate::test_helpers::{sample_captain_identity, sample_rider_identity};

    fn rider_gate_with_token() -> (RouteAccessGate, SessionContext) {
        let session = SessionContext::new();
        session.store(
            RIDER_CAPABILITY.token_key,
            Credential::new("rider-token").expect("credential"),
        );
        (RouteAccessGate::new(RIDER_CAPABILITY, session.clone()), session)
    }

    #[test]
    fn start_without_credential_denies_without_request() {
        let gate = RouteAccessGate::new(RIDER_CAPABILITY, SessionContext::new());
        let mut mount = gate.mount(|_| "home");

        assert!(matches!(mount.start(), GateStep::Redirect("/login")));
        assert_eq!(mount.phase(), GatePhase::Denied(DenialReason::MissingCredential));
        assert_eq!(mount.render(), Rendered::Redirect("/login"));
    }

    #[test]
    fn pending_mount_renders_nothing() {
        let (gate, _session) = rider_gate_with_token();
        let mut mount = gate.mount(|_| "home");

        let GateStep::Verify(request) = mount.start() else {
            panic!("expected verification request");
        };
        assert_eq!(request.ticket, mount.ticket());
        assert_eq!(request.credential.expose(), "rider-token");
        assert_eq!(mount.phase(), GatePhase::Pending);
        assert_eq!(mount.render(), Rendered::Nothing);
    }

    #[test]
    fn second_start_is_ignored() {
        let (gate, _session) = rider_gate_with_token();
        let mut mount = gate.mount(|_| "home");

        assert!(matches!(mount.start(), GateStep::Verify(_)));
        assert!(matches!(mount.start(), GateStep::Discarded));
        assert_eq!(mount.phase(), GatePhase::Pending);
    }

    #[test]
    fn resolved_mount_ignores_further_results() {
        let (gate, session) = rider_gate_with_token();
        let mut mount = gate.mount(|_| "home");
        let ticket = mount.ticket();
        mount.start();

        assert!(matches!(
            mount.resolve(ticket, Ok(sample_rider_identity())),
            GateStep::Render
        ));
        assert!(matches!(
            mount.resolve(ticket, Err(BackendError::InvalidCredential { status: 401 })),
            GateStep::Discarded
        ));
        assert_eq!(mount.phase(), GatePhase::Granted);
        assert!(session.contains(RIDER_CAPABILITY.token_key));
    }

    #[test]
    fn profile_for_other_role_is_treated_as_invalid() {
        let (gate, session) = rider_gate_with_token();
        let mut mount = gate.mount(|_| "home");
        let ticket = mount.ticket();
        mount.start();

        let step = mount.resolve(ticket, Ok(sample_captain_identity()));
        assert!(matches!(step, GateStep::Redirect("/login")));
        assert!(!session.contains(RIDER_CAPABILITY.token_key));
    }

    #[test]
    fn tickets_are_unique_per_mount() {
        let gate = RouteAccessGate::new(CAPTAIN_CAPABILITY, SessionContext::new());
        let first = gate.mount(|_| ());
        let second = gate.mount(|_| ());
        assert_ne!(first.ticket(), second.ticket());
    }

    #[test]
    fn transport_failure_policy_clears_credential_when_configured() {
        let session = SessionContext::new();
        session.store(
            RIDER_CAPABILITY.token_key,
            Credential::new("rider-token").expect("credential"),
        );
        let gate = RouteAccessGate::new(RIDER_CAPABILITY, session.clone())
            .with_transport_policy(TransportFailurePolicy::ClearCredential);
        let mut mount = gate.mount(|_| "home");
        let ticket = mount.ticket();
        mount.start();

        let step = mount.resolve(ticket, Err(BackendError::transport("timed out")));
        assert!(matches!(step, GateStep::Redirect("/login")));
        assert_eq!(mount.phase(), GatePhase::Denied(DenialReason::TransportFailure));
        assert!(!session.contains(RIDER_CAPABILITY.token_key));
    }
}
