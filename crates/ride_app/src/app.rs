//! Application root: owns the session context and wires gates, router and
//! backend together for the lifetime of the client.

use ride_core::backend::SessionBackend;
use ride_core::booking::{RideBookingController, SelectedRide, SelectionOutcome, VehicleOption};
use ride_core::config::ClientConfig;
use ride_core::gate::{DenialReason, GatePhase};
use ride_core::logout::{LogoutAction, LogoutOutcome};
use ride_core::pricing::{FareCatalog, FareError, PricingConfig, TripEstimate};
use ride_core::role::Role;
use ride_core::routes::{Navigation, Router, Screen};
use ride_core::session::{Credential, CredentialError, SessionContext};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationReport {
    Public(Screen),
    Granted { screen: Screen, user: String },
    LoggedOut(LogoutOutcome),
    Redirected { to: &'static str, reason: DenialReason },
    NotFound,
}

/// Result of walking the booking panels for one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingReport {
    pub options: Vec<VehicleOption>,
    pub outcome: SelectionOutcome,
}

impl BookingReport {
    pub fn confirmed(&self) -> Option<SelectedRide> {
        match &self.outcome {
            SelectionOutcome::Selected(ride) => Some(*ride),
            SelectionOutcome::Ignored(_) => None,
        }
    }
}

pub struct RideApp<B> {
    session: SessionContext,
    router: Router,
    pricing: PricingConfig,
    backend: B,
}

impl<B: SessionBackend> RideApp<B> {
    pub fn new(config: &ClientConfig, backend: B) -> Self {
        let session = SessionContext::new();
        Self {
            router: Router::new(config, session.clone()),
            session,
            pricing: PricingConfig::default(),
            backend,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Record the credential a login or signup screen obtained.
    pub fn sign_in(&self, role: Role, token: &str) -> Result<(), CredentialError> {
        let credential = Credential::new(token)?;
        self.session.store(role.capability().token_key, credential);
        Ok(())
    }

    pub async fn navigate(&self, path: &str) -> NavigationReport {
        let mut mount = match self.router.navigate(path) {
            Navigation::Public(screen) => return NavigationReport::Public(screen),
            Navigation::NotFound => return NavigationReport::NotFound,
            Navigation::Gated(mount) => mount,
        };

        mount.run(&self.backend).await;
        let capability = *mount.capability();
        match mount.phase() {
            GatePhase::Granted => {
                let Some(view) = mount.into_view() else {
                    return NavigationReport::NotFound;
                };
                if view.screen.is_logout() {
                    NavigationReport::LoggedOut(self.logout(capability.role).await)
                } else {
                    NavigationReport::Granted {
                        screen: view.screen,
                        user: view.identity.display_name(),
                    }
                }
            }
            GatePhase::Denied(reason) => NavigationReport::Redirected {
                to: capability.login_redirect_path,
                reason,
            },
            GatePhase::Idle | GatePhase::Pending => NavigationReport::NotFound,
        }
    }

    pub async fn logout(&self, role: Role) -> LogoutOutcome {
        LogoutAction::new(role.capability(), self.session.clone())
            .run(&self.backend)
            .await
    }

    pub fn quote(&self, trip: TripEstimate, surge: f64) -> Result<FareCatalog, FareError> {
        let catalog = self.pricing.quote(trip)?;
        if surge == 1.0 {
            Ok(catalog)
        } else {
            catalog.with_surge(surge)
        }
    }

    /// Open the vehicle panel, pick `vehicle` and leave the flow reset once
    /// the fare is confirmed.
    pub fn book(&self, vehicle: &str, trip: TripEstimate) -> Result<BookingReport, FareError> {
        let catalog = self.quote(trip, 1.0)?;
        let mut controller = RideBookingController::new();

        controller.open_vehicle_panel();
        let options = controller.vehicle_options(&catalog);
        let outcome = controller.select_vehicle_named(vehicle, &catalog);
        if let SelectionOutcome::Selected(ride) = &outcome {
            info!(vehicle = %ride.vehicle, fare = %ride.fare, "ride confirmed");
            controller.reset();
        } else {
            controller.close_panel();
        }

        Ok(BookingReport { options, outcome })
    }
}
