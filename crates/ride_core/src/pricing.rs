//! Fares and fare catalogs.
//!
//! A [`FareCatalog`] is an immutable snapshot of prices for one booking
//! session. Refreshing prices (surge, new estimate) builds a new catalog with a
//! higher revision; nothing mutates an existing one.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::vehicle::{VehicleParseError, VehicleType};

/// Base fare per vehicle type in currency units.
pub const BASE_FARE_CAR: f64 = 50.0;
pub const BASE_FARE_MOTO: f64 = 20.0;
pub const BASE_FARE_AUTO: f64 = 30.0;

/// Per-kilometer rate per vehicle type.
pub const PER_KM_RATE_CAR: f64 = 15.0;
pub const PER_KM_RATE_MOTO: f64 = 8.0;
pub const PER_KM_RATE_AUTO: f64 = 10.0;

/// Per-minute rate per vehicle type.
pub const PER_MINUTE_RATE_CAR: f64 = 3.0;
pub const PER_MINUTE_RATE_MOTO: f64 = 1.5;
pub const PER_MINUTE_RATE_AUTO: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FareError {
    #[error("fare must be a finite, non-negative amount (got {0})")]
    InvalidAmount(f64),
    #[error("surge multiplier must be finite and at least 1.0 (got {0})")]
    InvalidSurge(f64),
    #[error(transparent)]
    UnknownVehicle(#[from] VehicleParseError),
    #[error("more than one fare for vehicle `{0}`")]
    DuplicateVehicle(VehicleType),
    #[error("fare catalog revision {0} cannot be advanced")]
    RevisionOverflow(u64),
    #[error("malformed fare payload: {0}")]
    Malformed(String),
}

/// A non-negative, finite price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Fare(f64);

impl Fare {
    pub fn new(amount: f64) -> Result<Self, FareError> {
        if amount.is_finite() && amount >= 0.0 {
            Ok(Self(amount))
        } else {
            Err(FareError::InvalidAmount(amount))
        }
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Immutable vehicle → fare snapshot with O(1) lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct FareCatalog {
    revision: u64,
    fares: [Option<Fare>; VehicleType::COUNT],
}

impl FareCatalog {
    /// Catalog at revision 0. Later entries for the same vehicle win.
    pub fn new(entries: impl IntoIterator<Item = (VehicleType, Fare)>) -> Self {
        let mut fares = [None; VehicleType::COUNT];
        for (vehicle, fare) in entries {
            fares[vehicle.index()] = Some(fare);
        }
        Self { revision: 0, fares }
    }

    /// Build a catalog from loosely-typed `name → amount` pairs, rejecting
    /// unknown vehicle names, repeated vehicles and invalid amounts.
    pub fn from_raw<'a>(
        entries: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Self, FareError> {
        let mut fares = [None; VehicleType::COUNT];
        for (name, amount) in entries {
            let vehicle = name.parse::<VehicleType>()?;
            let slot = &mut fares[vehicle.index()];
            if slot.is_some() {
                return Err(FareError::DuplicateVehicle(vehicle));
            }
            *slot = Some(Fare::new(amount)?);
        }
        Ok(Self { revision: 0, fares })
    }

    /// Decode a JSON object such as `{"car": 193, "moto": 65, "auto": 118}`.
    pub fn from_json(body: &str) -> Result<Self, FareError> {
        let raw: HashMap<String, f64> =
            serde_json::from_str(body).map_err(|err| FareError::Malformed(err.to_string()))?;
        Self::from_raw(raw.iter().map(|(name, amount)| (name.as_str(), *amount)))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn fare(&self, vehicle: VehicleType) -> Option<Fare> {
        self.fares[vehicle.index()]
    }

    pub fn contains(&self, vehicle: VehicleType) -> bool {
        self.fare(vehicle).is_some()
    }

    /// Entries in panel display order.
    pub fn iter(&self) -> impl Iterator<Item = (VehicleType, Fare)> + '_ {
        VehicleType::ALL
            .into_iter()
            .filter_map(|vehicle| self.fare(vehicle).map(|fare| (vehicle, fare)))
    }

    /// New revision with every fare scaled by `multiplier` and rounded.
    pub fn with_surge(&self, multiplier: f64) -> Result<Self, FareError> {
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(FareError::InvalidSurge(multiplier));
        }
        let revision = self
            .revision
            .checked_add(1)
            .ok_or(FareError::RevisionOverflow(self.revision))?;
        let mut fares = self.fares;
        for fare in fares.iter_mut().flatten() {
            *fare = Fare::new((fare.amount() * multiplier).round())?;
        }
        Ok(Self { revision, fares })
    }

    /// Same fares, stamped with an explicit revision.
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }
}

/// Distance and duration of a requested trip, as estimated by a maps provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripEstimate {
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Rates for one vehicle type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleRates {
    pub base: f64,
    pub per_km: f64,
    pub per_minute: f64,
}

/// Pricing collaborator that produces a catalog from a trip estimate.
///
/// Formula per vehicle: `round(base + distance_km * per_km + duration_min * per_minute)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingConfig {
    pub car: VehicleRates,
    pub moto: VehicleRates,
    pub auto: VehicleRates,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            car: VehicleRates {
                base: BASE_FARE_CAR,
                per_km: PER_KM_RATE_CAR,
                per_minute: PER_MINUTE_RATE_CAR,
            },
            moto: VehicleRates {
                base: BASE_FARE_MOTO,
                per_km: PER_KM_RATE_MOTO,
                per_minute: PER_MINUTE_RATE_MOTO,
            },
            auto: VehicleRates {
                base: BASE_FARE_AUTO,
                per_km: PER_KM_RATE_AUTO,
                per_minute: PER_MINUTE_RATE_AUTO,
            },
        }
    }
}

impl PricingConfig {
    pub fn rates(&self, vehicle: VehicleType) -> VehicleRates {
        match vehicle {
            VehicleType::Car => self.car,
            VehicleType::Moto => self.moto,
            VehicleType::Auto => self.auto,
        }
    }

    pub fn calculate_fare(&self, vehicle: VehicleType, trip: TripEstimate) -> Result<Fare, FareError> {
        let rates = self.rates(vehicle);
        let amount =
            rates.base + trip.distance_km * rates.per_km + trip.duration_min * rates.per_minute;
        Fare::new(amount.round())
    }

    /// Price every vehicle type for `trip`.
    pub fn quote(&self, trip: TripEstimate) -> Result<FareCatalog, FareError> {
        let fares = VehicleType::ALL
            .into_iter()
            .map(|vehicle| -> Result<_, FareError> {
                Ok((vehicle, self.calculate_fare(vehicle, trip)?))
            })
            .collect::<Result<Vec<_>, FareError>>()?;
        Ok(FareCatalog::new(fares))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fare(amount: f64) -> Fare {
        Fare::new(amount).expect("fare")
    }

    #[test]
    fn fare_rejects_negative_and_non_finite() {
        assert!(Fare::new(0.0).is_ok());
        assert_eq!(Fare::new(-1.0), Err(FareError::InvalidAmount(-1.0)));
        assert!(Fare::new(f64::NAN).is_err());
        assert!(Fare::new(f64::INFINITY).is_err());
    }

    #[test]
    fn catalog_lookup_reports_missing_entries() {
        let catalog = FareCatalog::new([(VehicleType::Car, fare(100.0))]);
        assert_eq!(catalog.fare(VehicleType::Car), Some(fare(100.0)));
        assert!(!catalog.contains(VehicleType::Moto));
        assert_eq!(catalog.iter().count(), 1);
    }

    #[test]
    fn from_raw_rejects_unknown_keys() {
        let err = FareCatalog::from_raw([("car", 100.0), ("bike", 10.0)]).unwrap_err();
        assert!(matches!(err, FareError::UnknownVehicle(_)));
    }

    #[test]
    fn from_raw_rejects_repeated_vehicle() {
        let err = FareCatalog::from_raw([("moto", 50.0), ("car", 100.0), ("moto", 70.0)])
            .unwrap_err();
        assert_eq!(err, FareError::DuplicateVehicle(VehicleType::Moto));
    }

    #[test]
    fn from_json_rejects_alias_and_case_variants_of_a_key() {
        for body in [
            r#"{"moto": 50, "motorcycle": 90}"#,
            r#"{"moto": 50, "MOTO": 70}"#,
            r#"{" car": 100}"#,
        ] {
            assert!(
                matches!(FareCatalog::from_json(body), Err(FareError::UnknownVehicle(_))),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn from_json_decodes_fare_object() {
        let catalog = FareCatalog::from_json(r#"{"car": 193, "moto": 65, "auto": 118}"#)
            .expect("catalog");
        assert_eq!(catalog.fare(VehicleType::Moto), Some(fare(65.0)));
        assert!(matches!(
            FareCatalog::from_json("[1, 2]"),
            Err(FareError::Malformed(_))
        ));
    }

    #[test]
    fn surge_builds_new_revision_without_touching_original() {
        let base = FareCatalog::new([(VehicleType::Car, fare(100.0)), (VehicleType::Auto, fare(70.0))]);
        let surged = base.with_surge(1.5).expect("surge");

        assert_eq!(surged.revision(), base.revision() + 1);
        assert_eq!(surged.fare(VehicleType::Car), Some(fare(150.0)));
        assert_eq!(surged.fare(VehicleType::Auto), Some(fare(105.0)));
        assert_eq!(base.fare(VehicleType::Car), Some(fare(100.0)));
        assert!(base.with_surge(0.5).is_err());
    }

    #[test]
    fn surge_on_last_revision_is_an_error() {
        let catalog = FareCatalog::new([(VehicleType::Car, fare(1.0))]).with_revision(u64::MAX);
        assert_eq!(
            catalog.with_surge(1.5),
            Err(FareError::RevisionOverflow(u64::MAX))
        );
    }

    #[test]
    fn fare_includes_base_distance_and_duration() {
        let pricing = PricingConfig::default();
        let trip = TripEstimate {
            distance_km: 8.0,
            duration_min: 21.0,
        };

        // 50 + 8 * 15 + 21 * 3
        assert_eq!(pricing.calculate_fare(VehicleType::Car, trip), Ok(fare(233.0)));
        // 20 + 8 * 8 + 21 * 1.5 = 115.5, rounded
        assert_eq!(pricing.calculate_fare(VehicleType::Moto, trip), Ok(fare(116.0)));

        let catalog = pricing.quote(trip).expect("catalog");
        assert!(VehicleType::ALL.iter().all(|vehicle| catalog.contains(*vehicle)));
    }

    #[test]
    fn zero_length_trip_costs_base_fare() {
        let pricing = PricingConfig::default();
        let trip = TripEstimate {
            distance_km: 0.0,
            duration_min: 0.0,
        };
        assert_eq!(
            pricing.calculate_fare(VehicleType::Auto, trip),
            Ok(fare(BASE_FARE_AUTO))
        );
    }
}
