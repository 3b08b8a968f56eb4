//! Route table and navigation.

use tracing::debug;

use crate::config::ClientConfig;
use crate::gate::{GateMount, RouteAccessGate};
use crate::identity::Identity;
use crate::role::{Role, CAPTAIN_CAPABILITY, RIDER_CAPABILITY};
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Start,
    RiderLogin,
    RiderSignup,
    CaptainLogin,
    CaptainSignup,
    Riding,
    CaptainRiding,
    Home,
    RiderLogout,
    CaptainHome,
    CaptainLogout,
}

impl Screen {
    pub fn is_logout(self) -> bool {
        matches!(self, Screen::RiderLogout | Screen::CaptainLogout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Gated(Role),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub screen: Screen,
    pub access: RouteAccess,
}

const fn route(path: &'static str, screen: Screen, access: RouteAccess) -> Route {
    Route {
        path,
        screen,
        access,
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Application routes. `gate_riding_screens` decides whether the mid-ride
    /// screens sit behind their role's gate.
    pub fn new(gate_riding_screens: bool) -> Self {
        let (riding, captain_riding) = if gate_riding_screens {
            (
                RouteAccess::Gated(Role::Rider),
                RouteAccess::Gated(Role::Captain),
            )
        } else {
            (RouteAccess::Public, RouteAccess::Public)
        };

        Self {
            routes: vec![
                route("/", Screen::Start, RouteAccess::Public),
                route("/login", Screen::RiderLogin, RouteAccess::Public),
                route("/signup", Screen::RiderSignup, RouteAccess::Public),
                route("/captain-login", Screen::CaptainLogin, RouteAccess::Public),
                route("/captain-signup", Screen::CaptainSignup, RouteAccess::Public),
                route("/riding", Screen::Riding, riding),
                route("/captain-riding", Screen::CaptainRiding, captain_riding),
                route("/home", Screen::Home, RouteAccess::Gated(Role::Rider)),
                route("/users/logout", Screen::RiderLogout, RouteAccess::Gated(Role::Rider)),
                route("/captain-home", Screen::CaptainHome, RouteAccess::Gated(Role::Captain)),
                route("/captain/logout", Screen::CaptainLogout, RouteAccess::Gated(Role::Captain)),
            ],
        }
    }

    /// Look up a path, ignoring a trailing slash and any query string.
    pub fn resolve(&self, path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let normalized = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        self.routes.iter().copied().find(|route| route.path == normalized)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

/// The view a gated route mounts once the session is verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub screen: Screen,
    pub identity: Identity,
}

#[derive(Debug)]
pub enum Navigation {
    Public(Screen),
    Gated(GateMount<ScreenView>),
    NotFound,
}

/// Resolves paths and mounts the right gate for protected screens.
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    rider_gate: RouteAccessGate,
    captain_gate: RouteAccessGate,
}

impl Router {
    pub fn new(config: &ClientConfig, session: SessionContext) -> Self {
        Self {
            table: RouteTable::new(config.gate_riding_screens),
            rider_gate: RouteAccessGate::new(RIDER_CAPABILITY, session.clone())
                .with_transport_policy(config.transport_failure_policy),
            captain_gate: RouteAccessGate::new(CAPTAIN_CAPABILITY, session)
                .with_transport_policy(config.transport_failure_policy),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn gate(&self, role: Role) -> &RouteAccessGate {
        match role {
            Role::Rider => &self.rider_gate,
            Role::Captain => &self.captain_gate,
        }
    }

    /// Resolve `path`. Gated routes come back as a fresh, not yet started mount.
    pub fn navigate(&self, path: &str) -> Navigation {
        let Some(route) = self.table.resolve(path) else {
            debug!(path, "no route");
            return Navigation::NotFound;
        };

        match route.access {
            RouteAccess::Public => Navigation::Public(route.screen),
            RouteAccess::Gated(role) => {
                let screen = route.screen;
                Navigation::Gated(self.gate(role).mount(move |identity| ScreenView {
                    screen,
                    identity: identity.clone(),
                }))
            }
        }
    }
}
