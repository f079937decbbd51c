//! Fleet summaries over the voyages completed in a period.

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

use crate::error::{VoyageError, VoyageResult};
use crate::models::voyage::Voyage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> VoyageResult<Self> {
        if end < start {
            return Err(VoyageError::invalid_argument(
                "end date cannot be earlier than start date",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub period: DateRange,
    pub total_trips: usize,
    #[serde(rename = "total_hours", serialize_with = "serialize_hours")]
    pub total_time: Duration,
    pub total_distance_km: f64,
    pub average_speed: f64,
    pub average_fuel_consumption: f64,
}

impl Insight {
    /// Summarises the completed voyages that departed within `period`.
    ///
    /// Averages are the mean of each voyage's own average, over the voyages
    /// that reported any telemetry.
    pub fn generate<'a, I>(period: DateRange, voyages: I) -> Self
    where
        I: IntoIterator<Item = &'a Voyage>,
    {
        let mut total_trips = 0;
        let mut total_time = Duration::zero();
        let mut total_distance_km = 0.0;
        let mut reporting = 0usize;
        let mut speed_sum = 0.0;
        let mut fuel_sum = 0.0;

        for voyage in voyages {
            let Some(trip_time) = voyage.trip_time() else {
                continue;
            };
            if !period.contains(voyage.departure_time()) {
                continue;
            }

            total_trips += 1;
            total_time = total_time + trip_time;
            total_distance_km += voyage.total_distance_km();
            if voyage.telemetry_count() > 0 {
                reporting += 1;
                speed_sum += voyage.average_speed();
                fuel_sum += voyage.average_fuel_consumption();
            }
        }

        let mean = |sum: f64| if reporting == 0 { 0.0 } else { sum / reporting as f64 };

        Self {
            period,
            total_trips,
            total_time,
            total_distance_km,
            average_speed: mean(speed_sum),
            average_fuel_consumption: mean(fuel_sum),
        }
    }

    pub fn total_hours(&self) -> f64 {
        hours(&self.total_time)
    }
}

fn hours(d: &Duration) -> f64 {
    d.num_seconds() as f64 / 3600.0
}

fn serialize_hours<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(hours(d))
}
