//! Voyage persistence: the aggregator's state is written back after every
//! accepted event, inside the caller's transaction.

use std::collections::HashMap;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::db::queries;
use crate::db::rows::{TelemetryRow, VoyageRow};
use crate::db::DbPool;
use crate::models::telemetry::TelemetryPoint;
use crate::models::voyage::Voyage;

/// Serializes event handling per ship until the transaction ends.
pub async fn lock_ship(conn: &mut PgConnection, ship_id: &str) -> Result<()> {
    sqlx::query(queries::LOCK_SHIP)
        .bind(ship_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Loads the ship's voyage at sea, locking the row.
///
/// The voyage is resumed from its stored totals and its latest point only.
pub async fn load_active_voyage(conn: &mut PgConnection, ship_id: &str) -> Result<Option<Voyage>> {
    let row = sqlx::query_as::<_, VoyageRow>(queries::SELECT_ACTIVE_VOYAGE)
        .bind(ship_id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let last_point = sqlx::query_as::<_, TelemetryRow>(queries::SELECT_LAST_TELEMETRY_POINT)
        .bind(row.id)
        .fetch_optional(&mut *conn)
        .await?
        .map(TelemetryPoint::try_from)
        .transpose()?;

    Ok(Some(Voyage::resume(row.record(), row.totals(), last_point)))
}

/// Telemetry of the given voyages, grouped by voyage and in append order.
pub async fn load_telemetry(
    conn: &mut PgConnection,
    voyage_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<TelemetryPoint>>> {
    let rows = sqlx::query_as::<_, TelemetryRow>(queries::SELECT_TELEMETRY_FOR_VOYAGES)
        .bind(voyage_ids)
        .fetch_all(&mut *conn)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<TelemetryPoint>> = HashMap::new();
    for row in rows {
        let voyage_id = row.voyage_id;
        grouped
            .entry(voyage_id)
            .or_default()
            .push(TelemetryPoint::try_from(row)?);
    }
    Ok(grouped)
}

/// Inserts a freshly started voyage together with any telemetry it already holds.
pub async fn insert_voyage(
    conn: &mut PgConnection,
    voyage: &Voyage,
    correlation_id: Uuid,
) -> Result<()> {
    sqlx::query(queries::INSERT_VOYAGE)
        .bind(voyage.id())
        .bind(voyage.ship_id())
        .bind(voyage.departure_time())
        .bind(voyage.departure_port())
        .bind(voyage.notes())
        .execute(&mut *conn)
        .await?;

    let mut previous: Option<&TelemetryPoint> = None;
    for (seq, point) in voyage.telemetry().iter().enumerate() {
        let leg_km = previous.map_or(0.0, |p| p.distance_to_km(point));
        insert_telemetry_point(conn, voyage.id(), seq, point, leg_km, correlation_id).await?;
        previous = Some(point);
    }

    update_voyage_aggregates(conn, voyage).await
}

/// Stores the newest telemetry point of `voyage` and its refreshed aggregates.
pub async fn append_latest_point(
    conn: &mut PgConnection,
    voyage: &Voyage,
    leg_km: f64,
    correlation_id: Uuid,
) -> Result<()> {
    let Some(point) = voyage.telemetry().last() else {
        bail!("voyage {} has no telemetry to store", voyage.id());
    };
    insert_telemetry_point(
        conn,
        voyage.id(),
        voyage.telemetry_count() - 1,
        point,
        leg_km,
        correlation_id,
    )
    .await?;

    update_voyage_aggregates(conn, voyage).await
}

pub async fn insert_telemetry_point(
    conn: &mut PgConnection,
    voyage_id: Uuid,
    seq: usize,
    point: &TelemetryPoint,
    leg_km: f64,
    correlation_id: Uuid,
) -> Result<()> {
    let position = point.position();
    sqlx::query(queries::INSERT_TELEMETRY_POINT)
        .bind(voyage_id)
        .bind(i32::try_from(seq)?)
        .bind(point.ship_id())
        .bind(point.timestamp())
        .bind(position.latitude)
        .bind(position.longitude)
        .bind(point.speed())
        .bind(point.heading())
        .bind(point.fuel_consumption())
        .bind(point.engine_status().as_str())
        .bind(leg_km)
        .bind(point.notes())
        .bind(correlation_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn update_voyage_aggregates(conn: &mut PgConnection, voyage: &Voyage) -> Result<()> {
    let totals = voyage.totals();
    sqlx::query(queries::UPDATE_VOYAGE_AGGREGATES)
        .bind(voyage.id())
        .bind(totals.total_distance_km)
        .bind(voyage.average_speed())
        .bind(voyage.average_fuel_consumption())
        .bind(i32::try_from(totals.telemetry_count)?)
        .bind(totals.speed_sum)
        .bind(totals.fuel_sum)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Records the arrival of a completed voyage.
pub async fn complete_voyage(conn: &mut PgConnection, voyage: &Voyage) -> Result<()> {
    let (Some(arrival_time), Some(arrival_port)) = (voyage.arrival_time(), voyage.arrival_port())
    else {
        bail!("voyage {} is not completed", voyage.id());
    };

    let result = sqlx::query(queries::UPDATE_VOYAGE_ARRIVAL)
        .bind(voyage.id())
        .bind(arrival_time)
        .bind(arrival_port)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        bail!("voyage {} was already completed in storage", voyage.id());
    }
    Ok(())
}

/// Loads one voyage with its telemetry.
pub async fn load_voyage(pool: &DbPool, id: Uuid) -> Result<Option<Voyage>> {
    let row = sqlx::query_as::<_, VoyageRow>(queries::SELECT_VOYAGE)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(hydrate(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

pub async fn latest_voyage_for_ship(pool: &DbPool, ship_id: &str) -> Result<Option<VoyageRow>> {
    let row = sqlx::query_as::<_, VoyageRow>(queries::SELECT_LATEST_VOYAGE_FOR_SHIP)
        .bind(ship_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Voyages of one ship, optionally departing within `start..=end`.
pub async fn voyages_by_ship(
    pool: &DbPool,
    ship_id: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<Vec<VoyageRow>> {
    let rows = sqlx::query_as::<_, VoyageRow>(queries::SELECT_VOYAGES_BY_SHIP)
        .bind(ship_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Voyages of the whole fleet that departed within `start..=end`, whether or
/// not they have arrived.
pub async fn voyages_by_date_range(
    pool: &DbPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<VoyageRow>> {
    let rows = sqlx::query_as::<_, VoyageRow>(queries::SELECT_VOYAGES_BY_DATE_RANGE)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Turns stored rows into full voyages by fetching their telemetry in one query.
pub async fn hydrate(pool: &DbPool, rows: Vec<VoyageRow>) -> Result<Vec<Voyage>> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut conn = pool.acquire().await?;
    let mut telemetry = load_telemetry(&mut conn, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let points = telemetry.remove(&row.id).unwrap_or_default();
            Voyage::restore(row.record(), points)
        })
        .collect())
}
