//! Profiles returned by the session verification call.

use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::vehicle::VehicleType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName {
    pub firstname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
}

impl FullName {
    pub fn display(&self) -> String {
        match &self.lastname {
            Some(last) if !last.trim().is_empty() => format!("{} {}", self.firstname, last),
            _ => self.firstname.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: FullName,
    pub email: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptainStatus {
    Active,
    #[default]
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptainVehicle {
    pub color: String,
    pub plate: String,
    pub capacity: u32,
    #[serde(rename = "vehicleType")]
    pub vehicle_type: VehicleType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptainProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: FullName,
    pub email: String,
    #[serde(default)]
    pub status: CaptainStatus,
    pub vehicle: CaptainVehicle,
}

/// Verified identity held by a granted gate mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Rider(RiderProfile),
    Captain(CaptainProfile),
}

impl Identity {
    pub fn role(&self) -> Role {
        match self {
            Identity::Rider(_) => Role::Rider,
            Identity::Captain(_) => Role::Captain,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Identity::Rider(profile) => &profile.id,
            Identity::Captain(profile) => &profile.id,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Identity::Rider(profile) => profile.fullname.display(),
            Identity::Captain(profile) => profile.fullname.display(),
        }
    }
}
