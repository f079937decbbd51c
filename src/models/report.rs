//! Protobuf encoding of ship reports (`portlog.v1.ShipReport`).

use chrono::DateTime;
use prost::Message;
use uuid::Uuid;

use crate::models::event::{DecodeError, EventType, ReportFields, ShipEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ReportEvent {
    Unspecified = 0,
    Departure = 1,
    Arrival = 2,
    Telemetry = 3,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ShipReport {
    #[prost(string, tag = "1")]
    pub uuid: String,
    #[prost(enumeration = "ReportEvent", tag = "2")]
    pub event: i32,
    #[prost(string, tag = "3")]
    pub ship_id: String,
    /// Unix epoch, milliseconds.
    #[prost(int64, tag = "4")]
    pub timestamp_ms: i64,
    #[prost(double, optional, tag = "5")]
    pub latitude: Option<f64>,
    #[prost(double, optional, tag = "6")]
    pub longitude: Option<f64>,
    #[prost(double, optional, tag = "7")]
    pub speed: Option<f64>,
    #[prost(double, optional, tag = "8")]
    pub heading: Option<f64>,
    #[prost(double, optional, tag = "9")]
    pub fuel_consumption: Option<f64>,
    #[prost(string, optional, tag = "10")]
    pub engine_status: Option<String>,
    #[prost(string, optional, tag = "11")]
    pub port: Option<String>,
    #[prost(string, optional, tag = "12")]
    pub notes: Option<String>,
}

impl ShipReport {
    pub fn from_slice(payload: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self::decode(payload)?)
    }

    pub fn into_event(self) -> Result<ShipEvent, DecodeError> {
        let event = match ReportEvent::try_from(self.event) {
            Ok(ReportEvent::Departure) => EventType::Departure,
            Ok(ReportEvent::Arrival) => EventType::Arrival,
            Ok(ReportEvent::Telemetry) => EventType::Telemetry,
            _ => return Err(DecodeError::UnknownEvent(self.event.to_string())),
        };
        let timestamp = match self.timestamp_ms {
            0 => None,
            ms => Some(
                DateTime::from_timestamp_millis(ms)
                    .ok_or_else(|| DecodeError::InvalidTimestamp(ms.to_string()))?,
            ),
        };

        let fields = ReportFields {
            correlation_id: Uuid::parse_str(&self.uuid).ok(),
            ship_id: Some(self.ship_id),
            timestamp,
            latitude: self.latitude,
            longitude: self.longitude,
            speed: self.speed,
            heading: self.heading,
            fuel_consumption: self.fuel_consumption,
            engine_status: self.engine_status,
            port: self.port,
            notes: self.notes,
        };
        ShipEvent::from_fields(event, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::event::{decode, EventKind, PayloadFormat};

    fn report(event: ReportEvent) -> ShipReport {
        ShipReport {
            uuid: Uuid::new_v4().to_string(),
            event: event as i32,
            ship_id: "IMO9074729".into(),
            timestamp_ms: 1_704_067_200_000,
            latitude: Some(-6.2),
            longitude: Some(106.8),
            speed: Some(12.0),
            heading: None,
            fuel_consumption: Some(5.0),
            engine_status: Some("STARTING".into()),
            port: Some("Jakarta".into()),
            notes: None,
        }
    }

    #[test]
    fn decodes_encoded_departure() {
        let bytes = report(ReportEvent::Departure).encode_to_vec();

        let event = decode(PayloadFormat::Protobuf, &bytes).unwrap();

        assert_eq!(event.ship_id, "IMO9074729");
        assert_eq!(event.timestamp.timestamp(), 1_704_067_200);
        let EventKind::Departure { port, point, .. } = event.kind else {
            panic!("expected departure");
        };
        assert_eq!(port, "Jakarta");
        assert_eq!(point.unwrap().heading(), 0.0);
    }

    #[test]
    fn unspecified_event_is_rejected() {
        let err = report(ReportEvent::Unspecified).into_event().unwrap_err();
        assert!(matches!(err, DecodeError::UnknownEvent(_)));
    }

    #[test]
    fn missing_timestamp_is_rejected() {
        let mut r = report(ReportEvent::Telemetry);
        r.timestamp_ms = 0;
        assert!(matches!(r.into_event(), Err(DecodeError::MissingTimestamp)));
    }

    #[test]
    fn non_finite_doubles_are_rejected() {
        let mut r = report(ReportEvent::Telemetry);
        r.speed = Some(f64::NAN);
        let err = decode(PayloadFormat::Protobuf, &r.encode_to_vec()).unwrap_err();
        assert!(matches!(err, DecodeError::NotFinite("speed")));

        let mut r = report(ReportEvent::Telemetry);
        r.fuel_consumption = Some(f64::INFINITY);
        let err = decode(PayloadFormat::Protobuf, &r.encode_to_vec()).unwrap_err();
        assert!(matches!(err, DecodeError::NotFinite("fuel consumption")));
    }

    #[test]
    fn garbage_is_a_protobuf_error() {
        let err = decode(PayloadFormat::Protobuf, &[0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, DecodeError::Protobuf(_)));
    }
}
