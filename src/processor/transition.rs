//! What a ship event does to the ship's voyage at sea.
//!
//! - Departure with no voyage at sea starts one; a second departure is ignored.
//! - Telemetry joins the voyage at sea; it never opens a voyage.
//! - Arrival completes the voyage at sea.

use crate::error::VoyageResult;
use crate::models::event::{EventKind, ShipEvent};
use crate::models::voyage::Voyage;

#[derive(Debug)]
pub enum Transition {
    Started(Voyage),
    Appended { voyage: Voyage, leg_km: f64 },
    Completed(Voyage),
    Ignored(&'static str),
}

pub fn apply_event(active: Option<Voyage>, event: &ShipEvent) -> VoyageResult<Transition> {
    match (&event.kind, active) {
        (EventKind::Departure { .. }, Some(_)) => Ok(Transition::Ignored("departure while at sea")),
        (EventKind::Departure { port, notes, point }, None) => {
            let mut voyage = Voyage::start_for_ship(
                event.ship_id.clone(),
                event.timestamp,
                port.clone(),
                notes.clone(),
            );
            if let Some(point) = point {
                voyage.append_telemetry(point.clone())?;
            }
            Ok(Transition::Started(voyage))
        }
        (EventKind::Telemetry(point), Some(mut voyage)) => {
            let before = voyage.total_distance_km();
            voyage.append_telemetry(point.clone())?;
            let leg_km = voyage.total_distance_km() - before;
            Ok(Transition::Appended { voyage, leg_km })
        }
        (EventKind::Telemetry(_), None) => Ok(Transition::Ignored("telemetry without voyage")),
        (EventKind::Arrival { port }, Some(mut voyage)) => {
            voyage.complete(event.timestamp, port.clone())?;
            Ok(Transition::Completed(voyage))
        }
        (EventKind::Arrival { .. }, None) => Ok(Transition::Ignored("arrival without voyage")),
    }
}
