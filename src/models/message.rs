use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::event::{DecodeError, EventType, ReportFields, ShipEvent};

/// JSON envelope published by the shipboard loggers.
#[derive(Debug, Deserialize)]
pub struct ShipMessage {
    pub event: String,
    pub data: Data,
    #[serde(default)]
    pub metadata: Metadata,
    pub uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Data {
    #[serde(rename = "SHIP_ID")]
    pub ship_id: Option<String>,
    #[serde(rename = "TIMESTAMP")]
    pub timestamp: Option<String>,
    #[serde(rename = "LATITUDE", default, deserialize_with = "parse_f64_option")]
    pub latitude: Option<f64>,
    #[serde(rename = "LONGITUDE", default, deserialize_with = "parse_f64_option")]
    pub longitude: Option<f64>,
    #[serde(rename = "SPEED", default, deserialize_with = "parse_f64_option")]
    pub speed: Option<f64>,
    #[serde(rename = "HEADING", default, deserialize_with = "parse_f64_option")]
    pub heading: Option<f64>,
    #[serde(rename = "FUEL_CONSUMPTION", default, deserialize_with = "parse_f64_option")]
    pub fuel_consumption: Option<f64>,
    #[serde(rename = "ENGINE_STATUS")]
    pub engine_status: Option<String>,
    #[serde(rename = "PORT")]
    pub port: Option<String>,
    #[serde(rename = "NOTES")]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Metadata {
    #[serde(rename = "SHIP_ID")]
    pub ship_id: Option<String>,
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

impl ShipMessage {
    pub fn from_slice(payload: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(payload)?)
    }

    pub fn get_ship_id(&self) -> Option<&String> {
        self.data.ship_id.as_ref().or(self.metadata.ship_id.as_ref())
    }

    pub fn into_event(self) -> Result<ShipEvent, DecodeError> {
        let event: EventType = self.event.parse()?;
        let ship_id = self.get_ship_id().cloned();
        let timestamp = match self.data.timestamp.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_timestamp(raw)?),
        };
        let correlation_id = self.uuid.as_deref().and_then(|u| Uuid::parse_str(u).ok());

        let fields = ReportFields {
            correlation_id,
            ship_id,
            timestamp,
            latitude: self.data.latitude,
            longitude: self.data.longitude,
            speed: self.data.speed,
            heading: self.data.heading,
            fuel_consumption: self.data.fuel_consumption,
            engine_status: self.data.engine_status,
            port: self.data.port,
            notes: self.data.notes,
        };
        ShipEvent::from_fields(event, fields)
    }
}

/// RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS` taken as UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DecodeError> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map(|t| t.and_utc())
        .map_err(|_| DecodeError::InvalidTimestamp(raw.to_string()))
}

fn parse_f64_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFloat {
        String(String),
        Float(f64),
    }

    let v: Option<StringOrFloat> = Option::deserialize(deserializer)?;
    match v {
        Some(StringOrFloat::Float(f)) => Ok(Some(f)),
        Some(StringOrFloat::String(s)) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                s.trim().parse::<f64>().map(Some).map_err(serde::de::Error::custom)
            }
        }
        None => Ok(None),
    }
}
