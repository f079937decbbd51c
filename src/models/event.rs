//! Decoded ship events, independent of the wire encoding.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::geo::GeoPoint;
use crate::models::message;
use crate::models::report;
use crate::models::telemetry::{EngineStatus, TelemetryPoint};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed protobuf payload: {0}")]
    Protobuf(#[from] prost::DecodeError),
    #[error("message missing ship id")]
    MissingShipId,
    #[error("message missing timestamp")]
    MissingTimestamp,
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
    #[error("{0} event missing port")]
    MissingPort(&'static str),
    #[error("telemetry missing position")]
    MissingPosition,
    #[error("position out of range: {0}, {1}")]
    PositionOutOfRange(f64, f64),
    #[error("{0} cannot be negative")]
    Negative(&'static str),
    #[error("{0} is not a finite number")]
    NotFinite(&'static str),
    #[error("unknown engine status '{0}'")]
    EngineStatus(String),
}

/// Encoding of the payloads on the telemetry topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadFormat {
    #[default]
    Json,
    Protobuf,
}

impl FromStr for PayloadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "protobuf" | "proto" => Ok(Self::Protobuf),
            other => Err(format!("unknown payload format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Departure,
    Arrival,
    Telemetry,
}

impl FromStr for EventType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEPARTURE" => Ok(Self::Departure),
            "ARRIVAL" => Ok(Self::Arrival),
            "TELEMETRY" => Ok(Self::Telemetry),
            other => Err(DecodeError::UnknownEvent(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Leaving port. `point` is set when the report carried a position.
    Departure {
        port: String,
        notes: Option<String>,
        point: Option<TelemetryPoint>,
    },
    Arrival { port: String },
    Telemetry(TelemetryPoint),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipEvent {
    pub correlation_id: Uuid,
    pub ship_id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

/// Field set shared by every encoding.
#[derive(Debug, Default)]
pub(crate) struct ReportFields {
    pub correlation_id: Option<Uuid>,
    pub ship_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub fuel_consumption: Option<f64>,
    pub engine_status: Option<String>,
    pub port: Option<String>,
    pub notes: Option<String>,
}

/// Decodes one payload from the telemetry topic.
pub fn decode(format: PayloadFormat, payload: &[u8]) -> Result<ShipEvent, DecodeError> {
    match format {
        PayloadFormat::Json => message::ShipMessage::from_slice(payload)?.into_event(),
        PayloadFormat::Protobuf => report::ShipReport::from_slice(payload)?.into_event(),
    }
}

impl ShipEvent {
    pub(crate) fn from_fields(event: EventType, fields: ReportFields) -> Result<Self, DecodeError> {
        let ship_id = fields
            .ship_id
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or(DecodeError::MissingShipId)?;
        let timestamp = fields
            .timestamp
            .ok_or(DecodeError::MissingTimestamp)?;
        let correlation_id = fields.correlation_id.unwrap_or_else(Uuid::new_v4);

        let kind = match event {
            EventType::Departure => EventKind::Departure {
                port: non_blank(fields.port.clone()).ok_or(DecodeError::MissingPort("departure"))?,
                notes: fields.notes.clone(),
                point: match (fields.latitude, fields.longitude) {
                    (Some(_), Some(_)) => Some(telemetry_point(&ship_id, timestamp, &fields)?),
                    _ => None,
                },
            },
            EventType::Arrival => EventKind::Arrival {
                port: non_blank(fields.port).ok_or(DecodeError::MissingPort("arrival"))?,
            },
            EventType::Telemetry => {
                EventKind::Telemetry(telemetry_point(&ship_id, timestamp, &fields)?)
            }
        };

        Ok(Self {
            correlation_id,
            ship_id,
            timestamp,
            kind,
        })
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

fn telemetry_point(
    ship_id: &str,
    timestamp: DateTime<Utc>,
    fields: &ReportFields,
) -> Result<TelemetryPoint, DecodeError> {
    let (Some(lat), Some(lon)) = (fields.latitude, fields.longitude) else {
        return Err(DecodeError::MissingPosition);
    };
    let lat = finite("latitude", lat)?;
    let lon = finite("longitude", lon)?;
    let position = GeoPoint::new(lat, lon);
    if !position.is_valid() {
        return Err(DecodeError::PositionOutOfRange(lat, lon));
    }

    let speed = finite("speed", fields.speed.unwrap_or(0.0))?;
    if speed < 0.0 {
        return Err(DecodeError::Negative("speed"));
    }
    let heading = finite("heading", fields.heading.unwrap_or(0.0))?;
    let fuel_consumption = finite("fuel consumption", fields.fuel_consumption.unwrap_or(0.0))?;
    if fuel_consumption < 0.0 {
        return Err(DecodeError::Negative("fuel consumption"));
    }
    let engine_status = match fields.engine_status.as_deref() {
        None | Some("") => EngineStatus::default(),
        Some(s) => s
            .parse::<EngineStatus>()
            .map_err(|_| DecodeError::EngineStatus(s.to_string()))?,
    };

    Ok(TelemetryPoint::new(
        ship_id,
        position,
        speed,
        heading,
        fuel_consumption,
        engine_status,
        timestamp,
        fields.notes.clone(),
    ))
}

/// Rejects NaN and the infinities.
fn finite(field: &'static str, value: f64) -> Result<f64, DecodeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DecodeError::NotFinite(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ReportFields {
        ReportFields {
            ship_id: Some("ship-7".into()),
            timestamp: Some(Utc::now()),
            latitude: Some(-6.2),
            longitude: Some(106.8),
            speed: Some(12.0),
            fuel_consumption: Some(5.0),
            port: Some("Jakarta".into()),
            ..ReportFields::default()
        }
    }

    #[test]
    fn departure_with_position_carries_a_point() {
        let event = ShipEvent::from_fields(EventType::Departure, fields()).unwrap();
        match event.kind {
            EventKind::Departure { port, point, .. } => {
                assert_eq!(port, "Jakarta");
                let point = point.unwrap();
                assert_eq!(point.ship_id(), "ship-7");
                assert_eq!(point.engine_status(), EngineStatus::Normal);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn departure_without_position_has_no_point() {
        let f = ReportFields {
            latitude: None,
            ..fields()
        };
        let event = ShipEvent::from_fields(EventType::Departure, f).unwrap();
        assert!(matches!(event.kind, EventKind::Departure { point: None, .. }));
    }

    #[test]
    fn arrival_requires_port() {
        let f = ReportFields {
            port: Some("  ".into()),
            ..fields()
        };
        let err = ShipEvent::from_fields(EventType::Arrival, f).unwrap_err();
        assert!(matches!(err, DecodeError::MissingPort("arrival")));
    }

    #[test]
    fn telemetry_rejects_out_of_range_position() {
        let f = ReportFields {
            latitude: Some(91.0),
            ..fields()
        };
        let err = ShipEvent::from_fields(EventType::Telemetry, f).unwrap_err();
        assert!(matches!(err, DecodeError::PositionOutOfRange(..)));
    }

    #[test]
    fn telemetry_rejects_negative_speed() {
        let f = ReportFields {
            speed: Some(-1.0),
            ..fields()
        };
        let err = ShipEvent::from_fields(EventType::Telemetry, f).unwrap_err();
        assert!(matches!(err, DecodeError::Negative("speed")));
    }

    #[test]
    fn telemetry_rejects_non_finite_numbers() {
        let cases: [fn(&mut ReportFields); 5] = [
            |f| f.latitude = Some(f64::INFINITY),
            |f| f.longitude = Some(f64::NAN),
            |f| f.speed = Some(f64::NAN),
            |f| f.heading = Some(f64::NEG_INFINITY),
            |f| f.fuel_consumption = Some(f64::INFINITY),
        ];
        for set in cases {
            let mut f = fields();
            set(&mut f);
            let err = ShipEvent::from_fields(EventType::Telemetry, f).unwrap_err();
            assert!(matches!(err, DecodeError::NotFinite(_)), "got {err:?}");
        }
    }

    #[test]
    fn blank_ship_id_is_missing() {
        let f = ReportFields {
            ship_id: Some(String::new()),
            ..fields()
        };
        let err = ShipEvent::from_fields(EventType::Telemetry, f).unwrap_err();
        assert!(matches!(err, DecodeError::MissingShipId));
    }

    #[test]
    fn payload_format_parses() {
        assert_eq!("JSON".parse::<PayloadFormat>().unwrap(), PayloadFormat::Json);
        assert_eq!("protobuf".parse::<PayloadFormat>().unwrap(), PayloadFormat::Protobuf);
        assert!("xml".parse::<PayloadFormat>().is_err());
    }
}
