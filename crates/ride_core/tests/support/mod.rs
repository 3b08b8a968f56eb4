#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use ride_core::gate::{GateMount, RouteAccessGate};
use ride_core::identity::Identity;
use ride_core::role::RoleCapability;
use ride_core::session::SessionContext;
use ride_core::test_helpers::store_token;

/// Stand-in for a protected screen; counts how often it was constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedView {
    pub user_id: String,
}

/// Gate for `capability` over a fresh session, optionally seeded with `token`.
pub fn gate_with_token(
    capability: RoleCapability,
    token: Option<&str>,
) -> (RouteAccessGate, SessionContext) {
    let session = SessionContext::new();
    if let Some(token) = token {
        store_token(&session, &capability, token);
    }
    (RouteAccessGate::new(capability, session.clone()), session)
}

/// Mount `gate` around a [`ProtectedView`], returning the mount and the
/// number of times the view has been instantiated.
pub fn mount_counting(gate: &RouteAccessGate) -> (GateMount<ProtectedView>, Rc<Cell<u32>>) {
    let instantiations = Rc::new(Cell::new(0));
    let counter = Rc::clone(&instantiations);
    let mount = gate.mount(move |identity: &Identity| {
        counter.set(counter.get() + 1);
        ProtectedView {
            user_id: identity.id().to_string(),
        }
    });
    (mount, instantiations)
}
