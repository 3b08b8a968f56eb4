//! Session gating and ride booking state for the ride-hailing client.
//!
//! Screens, styling and maps live elsewhere; this crate owns the two pieces of
//! client logic worth testing on their own:
//!
//! - [`gate`]: decides whether a role-protected screen renders or redirects to
//!   login, based on a credential verified against the backend.
//! - [`booking`]: the vehicle-selection and fare-confirmation panel sequence,
//!   priced from an immutable [`pricing::FareCatalog`].

pub mod backend;
pub mod booking;
pub mod config;
pub mod gate;
pub mod identity;
pub mod logout;
pub mod pricing;
pub mod role;
pub mod routes;
pub mod session;
pub mod vehicle;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
