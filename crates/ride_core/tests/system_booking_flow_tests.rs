use ride_core::booking::{
    ActivePanel, InvalidSelection, RideBookingController, RideSelectionState, SelectionOutcome,
};
use ride_core::pricing::{Fare, FareCatalog, PricingConfig, TripEstimate};
use ride_core::test_helpers::sample_catalog;
use ride_core::vehicle::VehicleType;
use rstest::rstest;

#[test]
fn selecting_car_opens_confirm_panel() {
    let catalog = sample_catalog();
    let mut controller = RideBookingController::new();
    controller.open_vehicle_panel();

    let outcome = controller.select_vehicle(VehicleType::Car, &catalog);

    assert!(matches!(outcome, SelectionOutcome::Selected(ride) if ride.vehicle == VehicleType::Car));
    assert_eq!(controller.selected_vehicle(), Some(VehicleType::Car));
    assert_eq!(controller.panel(), ActivePanel::ConfirmPanel);
    assert_eq!(controller.confirmed_fare(), Fare::new(100.0).ok());
}

#[rstest]
#[case("bike")]
#[case("")]
#[case("helicopter")]
fn unknown_vehicle_name_changes_nothing(#[case] name: &str) {
    let catalog = sample_catalog();
    let mut controller = RideBookingController::new();
    controller.open_vehicle_panel();
    let before = controller.state();

    let outcome = controller.select_vehicle_named(name, &catalog);

    assert_eq!(
        outcome,
        SelectionOutcome::Ignored(InvalidSelection::UnknownVehicle(name.to_string()))
    );
    assert_eq!(controller.state(), before);
}

#[test]
fn unknown_vehicle_keeps_an_earlier_selection() {
    let catalog = sample_catalog();
    let mut controller = RideBookingController::new();
    controller.select_vehicle(VehicleType::Moto, &catalog);
    controller.close_panel();
    let before = controller.state();

    controller.select_vehicle_named("bike", &catalog);

    assert_eq!(controller.state(), before);
    assert_eq!(controller.selected_vehicle(), Some(VehicleType::Moto));
}

#[test]
fn open_then_close_leaves_selection_unset() {
    let mut controller = RideBookingController::new();

    controller.open_vehicle_panel();
    controller.close_panel();

    assert_eq!(controller.panel(), ActivePanel::Closed);
    assert_eq!(controller.selected_vehicle(), None);
}

#[test]
fn close_panel_keeps_last_choice() {
    let catalog = sample_catalog();
    let mut controller = RideBookingController::new();
    controller.open_vehicle_panel();
    controller.select_vehicle(VehicleType::Auto, &catalog);

    controller.close_panel();

    assert_eq!(controller.panel(), ActivePanel::Closed);
    assert_eq!(controller.selected_vehicle(), Some(VehicleType::Auto));
}

#[rstest]
#[case(VehicleType::Car)]
#[case(VehicleType::Moto)]
#[case(VehicleType::Auto)]
fn repeated_selection_is_idempotent(#[case] vehicle: VehicleType) {
    let catalog = sample_catalog();
    let mut once = RideBookingController::new();
    let mut twice = RideBookingController::new();

    once.select_vehicle(vehicle, &catalog);
    twice.select_vehicle(vehicle, &catalog);
    twice.select_vehicle(vehicle, &catalog);

    assert_eq!(once.state(), twice.state());
}

#[test]
fn full_flow_ends_in_clean_state() {
    let catalog = sample_catalog();
    let mut controller = RideBookingController::new();

    controller.open_vehicle_panel();
    assert_eq!(controller.panel(), ActivePanel::VehiclePanel);
    controller.select_vehicle(VehicleType::Moto, &catalog);
    assert_eq!(controller.panel(), ActivePanel::ConfirmPanel);
    controller.open_vehicle_panel();
    assert_eq!(controller.panel(), ActivePanel::VehiclePanel);
    controller.select_vehicle(VehicleType::Car, &catalog);
    assert_eq!(controller.selected_vehicle(), Some(VehicleType::Car));

    controller.reset();
    assert_eq!(controller.state(), RideSelectionState::default());
}

#[test]
fn surge_refresh_does_not_reprice_existing_selection() {
    let original = sample_catalog();
    let mut controller = RideBookingController::new();
    controller.select_vehicle(VehicleType::Car, &original);

    let surged = original.with_surge(2.0).expect("surge");
    assert_eq!(surged.fare(VehicleType::Car), Fare::new(200.0).ok());

    let ride = controller.selection().expect("selection");
    assert_eq!(ride.fare, Fare::new(100.0).expect("fare"));
    assert_eq!(ride.catalog_revision, original.revision());

    controller.select_vehicle(VehicleType::Car, &surged);
    let repriced = controller.selection().expect("selection");
    assert_eq!(repriced.fare, Fare::new(200.0).expect("fare"));
    assert_eq!(repriced.catalog_revision, surged.revision());
}

#[test]
fn quoted_catalog_drives_vehicle_panel() {
    let catalog = PricingConfig::default()
        .quote(TripEstimate {
            distance_km: 5.0,
            duration_min: 12.0,
        })
        .expect("quote");
    let mut controller = RideBookingController::new();

    let options = controller.vehicle_options(&catalog);
    assert_eq!(options.len(), 3);
    // 20 + 5 * 8 + 12 * 1.5
    assert_eq!(options[1].vehicle, VehicleType::Moto);
    assert_eq!(options[1].fare.amount(), 78.0);

    controller.open_vehicle_panel();
    let outcome = controller.select_vehicle(options[1].vehicle, &catalog);
    assert!(matches!(outcome, SelectionOutcome::Selected(_)));
    assert_eq!(controller.confirmed_fare(), Some(options[1].fare));
}

#[test]
fn partial_catalog_makes_missing_vehicle_inert() {
    let catalog = FareCatalog::from_raw([("car", 100.0)]).expect("catalog");
    let mut controller = RideBookingController::new();
    controller.open_vehicle_panel();

    let outcome = controller.select_vehicle_named("auto", &catalog);

    assert_eq!(
        outcome,
        SelectionOutcome::Ignored(InvalidSelection::NotInCatalog(VehicleType::Auto))
    );
    assert_eq!(controller.panel(), ActivePanel::VehiclePanel);
    assert_eq!(controller.selected_vehicle(), None);
}
