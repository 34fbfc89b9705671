//! Appliance classification, terminology and display tables.
//!
//! An appliance's type comes from its state entity when the integration set
//! an explicit `appliance_type` attribute, otherwise from keyword heuristics
//! on the entity id. Types the card code does not know about are carried
//! through verbatim and only fall back to the generic row of the lookup
//! tables.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

use crate::store::StateSnapshot;

/// Kind of appliance behind a monitored state sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplianceType {
    WashingMachine,
    Dishwasher,
    Dryer,
    Oven,
    WaterHeater,
    CoffeeMaker,
    Monitor,
    Nas,
    #[serde(rename = "printer_3d")]
    Printer3d,
    Vmc,
    Generic,
    /// An explicit `appliance_type` attribute value this crate does not
    /// recognize, passed through untouched.
    Unknown(String),
}

impl fmt::Display for ApplianceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(s) => write!(f, "{}", s),
            other => {
                // Use the serde snake_case form
                let json = serde_json::to_value(other).unwrap();
                write!(f, "{}", json.as_str().unwrap())
            }
        }
    }
}

impl From<String> for ApplianceType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "washing_machine" => Self::WashingMachine,
            "dishwasher" => Self::Dishwasher,
            "dryer" => Self::Dryer,
            "oven" => Self::Oven,
            "water_heater" => Self::WaterHeater,
            "coffee_maker" => Self::CoffeeMaker,
            "monitor" => Self::Monitor,
            "nas" => Self::Nas,
            "printer_3d" => Self::Printer3d,
            "vmc" => Self::Vmc,
            "generic" => Self::Generic,
            _ => Self::Unknown(s),
        }
    }
}

impl ApplianceType {
    /// Display word for the appliance's unit of operation.
    pub fn terminology(&self) -> Terminology {
        match self {
            Self::Monitor | Self::Nas | Self::Printer3d | Self::Vmc => Terminology::Session,
            _ => Terminology::Cycle,
        }
    }

    /// Material-design icon name, with the generic icon as fallback.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::WashingMachine => "mdi:washing-machine",
            Self::Dishwasher => "mdi:dishwasher",
            Self::Dryer => "mdi:tumble-dryer",
            Self::Oven => "mdi:stove",
            Self::WaterHeater => "mdi:water-boiler",
            Self::CoffeeMaker => "mdi:coffee-maker",
            Self::Monitor => "mdi:monitor",
            Self::Nas => "mdi:nas",
            Self::Printer3d => "mdi:printer-3d",
            Self::Vmc => "mdi:fan",
            Self::Generic | Self::Unknown(_) => "mdi:power-plug",
        }
    }
}

/// Infer the appliance type for a canonical state entity.
///
/// Priority 1 is the entity's explicit `appliance_type` attribute, taken
/// verbatim; an empty string counts as absent. Priority 2 is keyword
/// matching on the lower-cased entity id; the rules overlap in substring
/// space, so their order is load-bearing. An entity the host has no record
/// of classifies as generic.
pub fn classify(snapshot: Option<&StateSnapshot>, entity_id: &str) -> ApplianceType {
    let Some(snapshot) = snapshot else {
        return ApplianceType::Generic;
    };

    if let Some(explicit) = snapshot
        .attributes
        .get("appliance_type")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        return ApplianceType::from(explicit.to_string());
    }

    let id = entity_id.to_lowercase();
    if id.contains("washing") {
        ApplianceType::WashingMachine
    } else if id.contains("dishwasher") {
        ApplianceType::Dishwasher
    } else if id.contains("dryer") {
        ApplianceType::Dryer
    } else if id.contains("oven") {
        ApplianceType::Oven
    } else if id.contains("water") && id.contains("heater") {
        ApplianceType::WaterHeater
    } else if id.contains("coffee") {
        ApplianceType::CoffeeMaker
    } else if id.contains("monitor") || id.contains("screen") {
        ApplianceType::Monitor
    } else if id.contains("nas") {
        ApplianceType::Nas
    } else if id.contains("printer") && id.contains("3d") {
        ApplianceType::Printer3d
    } else if id.contains("vmc") || id.contains("ventilation") {
        ApplianceType::Vmc
    } else {
        ApplianceType::Generic
    }
}

/// The display word for one run of an appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Terminology {
    Cycle,
    Session,
}

/// Operational state reported by the canonical state sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CycleState {
    Idle,
    Running,
    Finished,
    Unknown,
}

impl CycleState {
    /// Parse a raw state string; anything unrecognized (including a missing
    /// or unavailable reading) is `Unknown`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("idle") => Self::Idle,
            Some("running") => Self::Running,
            Some("finished") => Self::Finished,
            _ => Self::Unknown,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Idle => "#9e9e9e",
            Self::Running => "#4caf50",
            Self::Finished => "#2196f3",
            Self::Unknown => "#ff9800",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Idle => "mdi:power-standby",
            Self::Running => "mdi:play-circle",
            Self::Finished => "mdi:check-circle",
            Self::Unknown => "mdi:help-circle",
        }
    }
}
