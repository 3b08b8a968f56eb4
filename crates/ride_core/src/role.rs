//! Rider and captain roles and the per-role parameters of the route gate.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Rider,
    Captain,
}

/// Everything the gate needs to know about a role.
///
/// Endpoint paths are relative to the backend base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCapability {
    pub role: Role,
    /// Key of the role's credential in the session context.
    pub token_key: &'static str,
    pub verify_endpoint: &'static str,
    pub logout_endpoint: &'static str,
    pub login_redirect_path: &'static str,
}

pub const RIDER_CAPABILITY: RoleCapability = RoleCapability {
    role: Role::Rider,
    token_key: "token",
    verify_endpoint: "/users/profile",
    logout_endpoint: "/users/logout",
    login_redirect_path: "/login",
};

pub const CAPTAIN_CAPABILITY: RoleCapability = RoleCapability {
    role: Role::Captain,
    token_key: "captain-token",
    verify_endpoint: "/captains/profile",
    logout_endpoint: "/captains/logout",
    login_redirect_path: "/captain-login",
};

impl Role {
    pub const fn capability(self) -> RoleCapability {
        match self {
            Role::Rider => RIDER_CAPABILITY,
            Role::Captain => CAPTAIN_CAPABILITY,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Rider => f.write_str("rider"),
            Role::Captain => f.write_str("captain"),
        }
    }
}
