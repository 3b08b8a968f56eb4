//! Vehicle types offered by the booking panel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    /// Captain profiles spell this `motorcycle`; fares and the panel use `moto`.
    #[serde(alias = "motorcycle")]
    Moto,
    Auto,
}

/// Raised when an untyped vehicle name is not one of the known types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vehicle type `{0}`")]
pub struct VehicleParseError(pub String);

impl VehicleType {
    pub const COUNT: usize = 3;

    /// Display order of the vehicle panel.
    pub const ALL: [VehicleType; Self::COUNT] = [VehicleType::Car, VehicleType::Moto, VehicleType::Auto];

    pub(crate) const fn index(self) -> usize {
        match self {
            VehicleType::Car => 0,
            VehicleType::Moto => 1,
            VehicleType::Auto => 2,
        }
    }

    /// Wire name used by fare payloads and ride requests.
    pub const fn as_str(self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Moto => "moto",
            VehicleType::Auto => "auto",
        }
    }

    /// Product name shown on the vehicle panel row.
    pub const fn display_name(self) -> &'static str {
        match self {
            VehicleType::Car => "UberGo",
            VehicleType::Moto => "Moto",
            VehicleType::Auto => "UberAuto",
        }
    }

    /// Seats offered to the rider.
    pub const fn capacity(self) -> u8 {
        match self {
            VehicleType::Car => 4,
            VehicleType::Moto => 1,
            VehicleType::Auto => 3,
        }
    }

    pub const fn blurb(self) -> &'static str {
        match self {
            VehicleType::Car => "Affordable, compact rides",
            VehicleType::Moto => "Affordable, motorcycle ride",
            VehicleType::Auto => "Affordable, auto ride",
        }
    }

    /// Nominal pickup ETA in minutes advertised on the panel.
    pub const fn nominal_eta_minutes(self) -> u32 {
        match self {
            VehicleType::Car | VehicleType::Auto => 2,
            VehicleType::Moto => 3,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = VehicleParseError;

    /// Exact wire names only; `motorcycle` is accepted by serde for captain
    /// profiles but is not a fare key.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "car" => Ok(VehicleType::Car),
            "moto" => Ok(VehicleType::Moto),
            "auto" => Ok(VehicleType::Auto),
            _ => Err(VehicleParseError(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names_and_rejects_unknown() {
        assert_eq!("car".parse::<VehicleType>(), Ok(VehicleType::Car));
        assert_eq!("moto".parse::<VehicleType>(), Ok(VehicleType::Moto));
        assert_eq!("auto".parse::<VehicleType>(), Ok(VehicleType::Auto));
        assert_eq!(
            "bike".parse::<VehicleType>(),
            Err(VehicleParseError("bike".to_string()))
        );
    }

    #[test]
    fn parse_rejects_case_whitespace_and_aliases() {
        for name in ["MOTO", " moto ", "Car", "motorcycle"] {
            assert_eq!(
                name.parse::<VehicleType>(),
                Err(VehicleParseError(name.to_string()))
            );
        }
    }

    #[test]
    fn indices_are_dense_and_follow_display_order() {
        for (expected, vehicle) in VehicleType::ALL.iter().enumerate() {
            assert_eq!(vehicle.index(), expected);
        }
    }

    #[test]
    fn deserializes_captain_spelling() {
        let vehicle: VehicleType = serde_json::from_str("\"motorcycle\"").expect("vehicle");
        assert_eq!(vehicle, VehicleType::Moto);
        assert_eq!(serde_json::to_string(&vehicle).expect("json"), "\"moto\"");
    }
}
