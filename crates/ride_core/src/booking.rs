//! Ride booking panel controller.
//!
//! Drives the vehicle-selection then fare-confirmation sequence. The open
//! panel is a single [`ActivePanel`] value, so two panels can never be open at
//! once, and a selection always carries the fare it was quoted at.

use tracing::debug;

use crate::pricing::{Fare, FareCatalog};
use crate::vehicle::VehicleType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivePanel {
    #[default]
    Closed,
    VehiclePanel,
    ConfirmPanel,
}

/// A vehicle choice and the fare it was priced at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedRide {
    pub vehicle: VehicleType,
    pub fare: Fare,
    /// Revision of the catalog the fare came from.
    pub catalog_revision: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RideSelectionState {
    pub panel: ActivePanel,
    pub selection: Option<SelectedRide>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSelection {
    UnknownVehicle(String),
    NotInCatalog(VehicleType),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    Selected(SelectedRide),
    /// State was left untouched.
    Ignored(InvalidSelection),
}

/// One row of the vehicle panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleOption {
    pub vehicle: VehicleType,
    pub display_name: &'static str,
    pub capacity: u8,
    pub blurb: &'static str,
    pub eta_minutes: u32,
    pub fare: Fare,
}

#[derive(Debug, Clone, Default)]
pub struct RideBookingController {
    state: RideSelectionState,
}

impl RideBookingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RideSelectionState {
        self.state
    }

    pub fn panel(&self) -> ActivePanel {
        self.state.panel
    }

    pub fn selection(&self) -> Option<SelectedRide> {
        self.state.selection
    }

    pub fn selected_vehicle(&self) -> Option<VehicleType> {
        self.state.selection.map(|ride| ride.vehicle)
    }

    /// Fare locked in by the current selection.
    pub fn confirmed_fare(&self) -> Option<Fare> {
        self.state.selection.map(|ride| ride.fare)
    }

    pub fn open_vehicle_panel(&mut self) {
        self.state.panel = ActivePanel::VehiclePanel;
    }

    /// Select `vehicle` priced from `catalog` and move to the confirm panel.
    /// Vehicles missing from the catalog leave the state untouched.
    pub fn select_vehicle(&mut self, vehicle: VehicleType, catalog: &FareCatalog) -> SelectionOutcome {
        let Some(fare) = catalog.fare(vehicle) else {
            debug!(%vehicle, revision = catalog.revision(), "vehicle not in fare catalog, ignoring");
            return SelectionOutcome::Ignored(InvalidSelection::NotInCatalog(vehicle));
        };

        let ride = SelectedRide {
            vehicle,
            fare,
            catalog_revision: catalog.revision(),
        };
        self.state = RideSelectionState {
            panel: ActivePanel::ConfirmPanel,
            selection: Some(ride),
        };
        debug!(%vehicle, %fare, "vehicle selected");
        SelectionOutcome::Selected(ride)
    }

    /// Untyped entry point for panel input; unknown names are ignored.
    pub fn select_vehicle_named(&mut self, name: &str, catalog: &FareCatalog) -> SelectionOutcome {
        match name.parse::<VehicleType>() {
            Ok(vehicle) => self.select_vehicle(vehicle, catalog),
            Err(err) => {
                debug!(error = %err, "ignoring vehicle selection");
                SelectionOutcome::Ignored(InvalidSelection::UnknownVehicle(err.0))
            }
        }
    }

    /// Close whichever panel is open. The selection survives.
    pub fn close_panel(&mut self) {
        self.state.panel = ActivePanel::Closed;
    }

    /// Finish or abandon the booking flow.
    pub fn reset(&mut self) {
        self.state = RideSelectionState::default();
    }

    /// Catalog-backed rows for the vehicle panel, in display order.
    pub fn vehicle_options(&self, catalog: &FareCatalog) -> Vec<VehicleOption> {
        catalog
            .iter()
            .map(|(vehicle, fare)| VehicleOption {
                vehicle,
                display_name: vehicle.display_name(),
                capacity: vehicle.capacity(),
                blurb: vehicle.blurb(),
                eta_minutes: vehicle.nominal_eta_minutes(),
                fare,
            })
            .collect()
    }
}
