use crate::db::{voyages, DbPool};
use crate::models::event::{self, PayloadFormat};
use crate::processor::transition::{apply_event, Transition};
use tracing::{debug, info, warn};

pub async fn process_message(
    pool: &DbPool,
    format: PayloadFormat,
    payload: &[u8],
) -> anyhow::Result<()> {
    // 1. Decode
    let event = match event::decode(format, payload) {
        Ok(e) => e,
        Err(e) => {
            warn!("Failed to decode message: {}", e);
            return Ok(());
        }
    };

    debug!("Processing event for ship {}: {:?}", event.ship_id, event.kind);

    // 2. Start transaction and serialize on the ship
    let mut tx = pool.begin().await?;
    voyages::lock_ship(&mut *tx, &event.ship_id).await?;

    // 3. Current voyage at sea, if any
    let active = voyages::load_active_voyage(&mut *tx, &event.ship_id).await?;

    // 4. Apply rules; a rejected event leaves storage untouched
    let transition = match apply_event(active, &event) {
        Ok(t) => t,
        Err(e) => {
            warn!(
                "Rejected event {} for ship {}: {}",
                event.correlation_id, event.ship_id, e
            );
            return Ok(());
        }
    };

    // 5. Persist
    match transition {
        Transition::Started(voyage) => {
            voyages::insert_voyage(&mut *tx, &voyage, event.correlation_id).await?;
            info!(
                "Started voyage {} for ship {} from {}",
                voyage.id(),
                event.ship_id,
                voyage.departure_port()
            );
        }
        Transition::Appended { voyage, leg_km } => {
            voyages::append_latest_point(&mut *tx, &voyage, leg_km, event.correlation_id).await?;
            debug!(
                "Voyage {}: +{:.3} km, total {:.3} km over {} points",
                voyage.id(),
                leg_km,
                voyage.total_distance_km(),
                voyage.telemetry_count()
            );
        }
        Transition::Completed(voyage) => {
            voyages::complete_voyage(&mut *tx, &voyage).await?;
            info!(
                "Completed voyage {} for ship {}: {:.1} km, avg speed {:.2}, avg fuel {:.2}",
                voyage.id(),
                event.ship_id,
                voyage.total_distance_km(),
                voyage.average_speed(),
                voyage.average_fuel_consumption()
            );
        }
        Transition::Ignored(reason) => {
            info!("Ignored event for ship {}: {}", event.ship_id, reason);
            return Ok(());
        }
    }

    tx.commit().await?;

    Ok(())
}
