//! PortLog: voyage tracking for shipping fleets.
//!
//! The domain model and telemetry aggregator live in [`models`] and [`geo`];
//! the rest is the ingestion service that feeds them from Kafka and keeps
//! voyages in PostgreSQL.

pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod join_code;
pub mod kafka;
pub mod models;
pub mod processor;

pub use error::{VoyageError, VoyageErrorKind};
pub use geo::{haversine_km, GeoPoint};
pub use models::telemetry::{EngineStatus, TelemetryPoint};
pub use models::voyage::{Voyage, VoyageStatus, VoyageTotals};
