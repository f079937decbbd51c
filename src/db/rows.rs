use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::VoyageError;
use crate::geo::GeoPoint;
use crate::models::telemetry::TelemetryPoint;
use crate::models::voyage::{VoyageRecord, VoyageTotals};

/// A row of `voyages`, including the stored aggregates.
#[derive(Debug, Clone, FromRow)]
pub struct VoyageRow {
    pub id: Uuid,
    pub ship_id: Option<String>,
    pub departure_time: DateTime<Utc>,
    pub departure_port: String,
    pub arrival_time: Option<DateTime<Utc>>,
    pub arrival_port: Option<String>,
    pub notes: Option<String>,
    pub total_distance_km: f64,
    pub average_speed: f64,
    pub average_fuel_consumption: f64,
    pub telemetry_count: i32,
    pub speed_sum: f64,
    pub fuel_sum: f64,
}

impl VoyageRow {
    pub fn record(&self) -> VoyageRecord {
        VoyageRecord {
            id: self.id,
            ship_id: self.ship_id.clone(),
            departure_time: self.departure_time,
            departure_port: self.departure_port.clone(),
            arrival_time: self.arrival_time,
            arrival_port: self.arrival_port.clone(),
            notes: self.notes.clone(),
        }
    }

    pub fn totals(&self) -> VoyageTotals {
        VoyageTotals {
            telemetry_count: usize::try_from(self.telemetry_count).unwrap_or_default(),
            total_distance_km: self.total_distance_km,
            speed_sum: self.speed_sum,
            fuel_sum: self.fuel_sum,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TelemetryRow {
    pub voyage_id: Uuid,
    pub seq: i32,
    pub ship_id: String,
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lng: f64,
    pub speed: f64,
    pub heading: f64,
    pub fuel_consumption: f64,
    pub engine_status: String,
    pub distance_from_last_km: f64,
    pub notes: Option<String>,
    pub correlation_id: Option<Uuid>,
}

impl TryFrom<TelemetryRow> for TelemetryPoint {
    type Error = VoyageError;

    fn try_from(row: TelemetryRow) -> Result<Self, Self::Error> {
        Ok(TelemetryPoint::new(
            row.ship_id,
            GeoPoint::new(row.lat, row.lng),
            row.speed,
            row.heading,
            row.fuel_consumption,
            row.engine_status.parse()?,
            row.timestamp,
            row.notes,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::telemetry::EngineStatus;

    fn row(engine_status: &str) -> TelemetryRow {
        TelemetryRow {
            voyage_id: Uuid::new_v4(),
            seq: 0,
            ship_id: "IMO9074729".into(),
            timestamp: Utc::now(),
            lat: -6.2,
            lng: 106.8,
            speed: 12.0,
            heading: 45.0,
            fuel_consumption: 5.0,
            engine_status: engine_status.into(),
            distance_from_last_km: 0.0,
            notes: None,
            correlation_id: None,
        }
    }

    #[test]
    fn telemetry_row_becomes_point() {
        let point = TelemetryPoint::try_from(row("OVERHEAT")).unwrap();
        assert_eq!(point.position(), GeoPoint::new(-6.2, 106.8));
        assert_eq!(point.engine_status(), EngineStatus::Overheat);
        assert_eq!(point.heading(), 45.0);
    }

    #[test]
    fn voyage_row_carries_running_totals() {
        let row = VoyageRow {
            id: Uuid::new_v4(),
            ship_id: Some("IMO9074729".into()),
            departure_time: Utc::now(),
            departure_port: "Jakarta".into(),
            arrival_time: None,
            arrival_port: None,
            notes: None,
            total_distance_km: 61.4,
            average_speed: 13.5,
            average_fuel_consumption: 5.5,
            telemetry_count: 2,
            speed_sum: 27.0,
            fuel_sum: 11.0,
        };

        let totals = row.totals();
        assert_eq!(totals.telemetry_count, 2);
        assert_eq!(totals.speed_sum, 27.0);
        assert_eq!(totals.total_distance_km, 61.4);
        assert_eq!(row.record().departure_port, "Jakarta");
    }

    #[test]
    fn unknown_engine_status_in_row_is_rejected() {
        assert!(TelemetryPoint::try_from(row("WARP")).is_err());
    }
}
