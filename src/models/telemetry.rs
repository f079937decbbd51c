use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VoyageError;
use crate::geo::GeoPoint;

/// Engine state reported alongside each telemetry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineStatus {
    #[default]
    Normal,
    Starting,
    Stopped,
    Standby,
    Overheat,
    Failure,
    Maintenance,
}

impl EngineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Starting => "STARTING",
            Self::Stopped => "STOPPED",
            Self::Standby => "STANDBY",
            Self::Overheat => "OVERHEAT",
            Self::Failure => "FAILURE",
            Self::Maintenance => "MAINTENANCE",
        }
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineStatus {
    type Err = VoyageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NORMAL" => Ok(Self::Normal),
            "STARTING" => Ok(Self::Starting),
            "STOPPED" => Ok(Self::Stopped),
            "STANDBY" => Ok(Self::Standby),
            "OVERHEAT" => Ok(Self::Overheat),
            "FAILURE" => Ok(Self::Failure),
            "MAINTENANCE" => Ok(Self::Maintenance),
            other => Err(VoyageError::invalid_argument(format!(
                "unknown engine status '{other}'"
            ))),
        }
    }
}

/// One observation reported by a ship. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPoint {
    ship_id: String,
    position: GeoPoint,
    speed: f64,
    heading: f64,
    fuel_consumption: f64,
    engine_status: EngineStatus,
    timestamp: DateTime<Utc>,
    notes: Option<String>,
}

impl TelemetryPoint {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ship_id: impl Into<String>,
        position: GeoPoint,
        speed: f64,
        heading: f64,
        fuel_consumption: f64,
        engine_status: EngineStatus,
        timestamp: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self {
            ship_id: ship_id.into(),
            position,
            speed,
            heading,
            fuel_consumption,
            engine_status,
            timestamp,
            notes,
        }
    }

    pub fn ship_id(&self) -> &str {
        &self.ship_id
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    /// Reported speed over ground, in knots.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn fuel_consumption(&self) -> f64 {
        self.fuel_consumption
    }

    pub fn engine_status(&self) -> EngineStatus {
        self.engine_status
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    #[must_use]
    pub fn distance_to_km(&self, other: &TelemetryPoint) -> f64 {
        self.position.distance_to_km(&other.position)
    }
}
