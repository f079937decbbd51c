//! Voyage aggregate: one sailing from departure to arrival, accumulating the
//! telemetry reported along the way.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{VoyageError, VoyageResult};
use crate::models::telemetry::TelemetryPoint;

/// Where a voyage stands in its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VoyageStatus {
    /// At sea; telemetry is accepted.
    Active,

    /// Arrived. Terminal, no more telemetry.
    Completed {
        arrival_time: DateTime<Utc>,
        arrival_port: String,
    },
}

/// Persisted header of a voyage, without its telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct VoyageRecord {
    pub id: Uuid,
    pub ship_id: Option<String>,
    pub departure_time: DateTime<Utc>,
    pub departure_port: String,
    pub arrival_time: Option<DateTime<Utc>>,
    pub arrival_port: Option<String>,
    pub notes: Option<String>,
}

/// Running sums of a voyage, stored next to its header.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoyageTotals {
    pub telemetry_count: usize,
    pub total_distance_km: f64,
    pub speed_sum: f64,
    pub fuel_sum: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Voyage {
    id: Uuid,
    ship_id: Option<String>,
    departure_time: DateTime<Utc>,
    departure_port: String,
    notes: Option<String>,
    status: VoyageStatus,
    telemetry: Vec<TelemetryPoint>,
    telemetry_count: usize,
    total_distance_km: f64,
    speed_sum: f64,
    fuel_sum: f64,
}

impl Voyage {
    /// Starts a voyage that is not bound to a particular ship.
    pub fn start(
        departure_time: DateTime<Utc>,
        departure_port: impl Into<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ship_id: None,
            departure_time,
            departure_port: departure_port.into(),
            notes,
            status: VoyageStatus::Active,
            telemetry: Vec::new(),
            telemetry_count: 0,
            total_distance_km: 0.0,
            speed_sum: 0.0,
            fuel_sum: 0.0,
        }
    }

    /// Starts a voyage whose telemetry must all come from `ship_id`.
    pub fn start_for_ship(
        ship_id: impl Into<String>,
        departure_time: DateTime<Utc>,
        departure_port: impl Into<String>,
        notes: Option<String>,
    ) -> Self {
        let mut voyage = Self::start(departure_time, departure_port, notes);
        voyage.ship_id = Some(ship_id.into());
        voyage
    }

    /// Rebuilds a voyage from storage, replaying its telemetry in order.
    pub fn restore(record: VoyageRecord, points: Vec<TelemetryPoint>) -> Self {
        let mut voyage = Self::from_record(record, VoyageTotals::default());
        voyage.telemetry.reserve(points.len());
        for point in points {
            voyage.accumulate(point);
        }
        voyage
    }

    /// Rebuilds a voyage from its stored totals and latest point, without
    /// reading the rest of its telemetry.
    ///
    /// Only `last_point` is held afterwards; later appends measure their leg
    /// from it and the averages keep counting every stored point.
    pub fn resume(
        record: VoyageRecord,
        totals: VoyageTotals,
        last_point: Option<TelemetryPoint>,
    ) -> Self {
        let mut voyage = Self::from_record(record, totals);
        voyage.telemetry.extend(last_point);
        voyage
    }

    fn from_record(record: VoyageRecord, totals: VoyageTotals) -> Self {
        let status = match record.arrival_time {
            Some(arrival_time) => VoyageStatus::Completed {
                arrival_time,
                arrival_port: record.arrival_port.unwrap_or_default(),
            },
            None => VoyageStatus::Active,
        };

        Self {
            id: record.id,
            ship_id: record.ship_id,
            departure_time: record.departure_time,
            departure_port: record.departure_port,
            notes: record.notes,
            status,
            telemetry: Vec::new(),
            telemetry_count: totals.telemetry_count,
            total_distance_km: totals.total_distance_km,
            speed_sum: totals.speed_sum,
            fuel_sum: totals.fuel_sum,
        }
    }

    /// Appends a telemetry point, updating distance and averages.
    ///
    /// Nothing is modified when the point is rejected.
    pub fn append_telemetry(&mut self, point: TelemetryPoint) -> VoyageResult<()> {
        if self.is_completed() {
            return Err(VoyageError::invalid_state(format!(
                "voyage {} already completed",
                self.id
            )));
        }
        if point.ship_id().trim().is_empty() {
            return Err(VoyageError::invalid_argument(
                "telemetry point must be linked to a ship",
            ));
        }
        if let Some(ship_id) = &self.ship_id {
            if ship_id != point.ship_id() {
                return Err(VoyageError::invalid_argument(format!(
                    "telemetry from ship {} cannot join voyage of ship {}",
                    point.ship_id(),
                    ship_id
                )));
            }
        }

        self.accumulate(point);
        Ok(())
    }

    /// Marks the voyage as arrived.
    pub fn complete(
        &mut self,
        arrival_time: DateTime<Utc>,
        arrival_port: impl Into<String>,
    ) -> VoyageResult<()> {
        if self.is_completed() {
            return Err(VoyageError::invalid_state(format!(
                "voyage {} already completed",
                self.id
            )));
        }
        if arrival_time <= self.departure_time {
            return Err(VoyageError::invalid_argument(format!(
                "arrival time {arrival_time} must be after departure time {}",
                self.departure_time
            )));
        }

        self.status = VoyageStatus::Completed {
            arrival_time,
            arrival_port: arrival_port.into(),
        };
        Ok(())
    }

    fn accumulate(&mut self, point: TelemetryPoint) {
        if let Some(last) = self.telemetry.last() {
            self.total_distance_km += last.distance_to_km(&point);
        }
        self.speed_sum += point.speed();
        self.fuel_sum += point.fuel_consumption();
        self.telemetry.push(point);
        self.telemetry_count += 1;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn ship_id(&self) -> Option<&str> {
        self.ship_id.as_deref()
    }

    pub fn departure_time(&self) -> DateTime<Utc> {
        self.departure_time
    }

    pub fn departure_port(&self) -> &str {
        &self.departure_port
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn status(&self) -> &VoyageStatus {
        &self.status
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, VoyageStatus::Completed { .. })
    }

    pub fn arrival_time(&self) -> Option<DateTime<Utc>> {
        match &self.status {
            VoyageStatus::Completed { arrival_time, .. } => Some(*arrival_time),
            VoyageStatus::Active => None,
        }
    }

    pub fn arrival_port(&self) -> Option<&str> {
        match &self.status {
            VoyageStatus::Completed { arrival_port, .. } => Some(arrival_port),
            VoyageStatus::Active => None,
        }
    }

    /// Points held in memory, oldest first. A resumed voyage holds only its
    /// latest point.
    pub fn telemetry(&self) -> &[TelemetryPoint] {
        &self.telemetry
    }

    /// Number of points the voyage has accepted, including any not held in memory.
    pub fn telemetry_count(&self) -> usize {
        self.telemetry_count
    }

    pub fn totals(&self) -> VoyageTotals {
        VoyageTotals {
            telemetry_count: self.telemetry_count,
            total_distance_km: self.total_distance_km,
            speed_sum: self.speed_sum,
            fuel_sum: self.fuel_sum,
        }
    }

    /// Sum of the great-circle legs between consecutive points, in kilometers.
    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    /// Unweighted mean of the reported speeds; zero before any telemetry.
    pub fn average_speed(&self) -> f64 {
        self.mean(self.speed_sum)
    }

    /// Unweighted mean of the reported fuel consumption; zero before any telemetry.
    pub fn average_fuel_consumption(&self) -> f64 {
        self.mean(self.fuel_sum)
    }

    /// Time between departure and arrival, once arrived.
    pub fn trip_time(&self) -> Option<Duration> {
        self.arrival_time().map(|arrival| arrival - self.departure_time)
    }

    /// Header fields as they are stored.
    pub fn record(&self) -> VoyageRecord {
        VoyageRecord {
            id: self.id,
            ship_id: self.ship_id.clone(),
            departure_time: self.departure_time,
            departure_port: self.departure_port.clone(),
            arrival_time: self.arrival_time(),
            arrival_port: self.arrival_port().map(str::to_string),
            notes: self.notes.clone(),
        }
    }

    fn mean(&self, sum: f64) -> f64 {
        if self.telemetry_count == 0 {
            0.0
        } else {
            sum / self.telemetry_count as f64
        }
    }
}
