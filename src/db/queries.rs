pub const LOCK_SHIP: &str = r#"
SELECT pg_advisory_xact_lock(hashtext($1));
"#;

pub const SELECT_ACTIVE_VOYAGE: &str = r#"
SELECT id, ship_id, departure_time, departure_port, arrival_time, arrival_port, notes,
       total_distance_km, average_speed, average_fuel_consumption, telemetry_count,
       speed_sum, fuel_sum
FROM voyages
WHERE ship_id = $1 AND arrival_time IS NULL
ORDER BY departure_time DESC
LIMIT 1
FOR UPDATE;
"#;

pub const SELECT_VOYAGE: &str = r#"
SELECT id, ship_id, departure_time, departure_port, arrival_time, arrival_port, notes,
       total_distance_km, average_speed, average_fuel_consumption, telemetry_count,
       speed_sum, fuel_sum
FROM voyages
WHERE id = $1;
"#;

pub const SELECT_LATEST_VOYAGE_FOR_SHIP: &str = r#"
SELECT id, ship_id, departure_time, departure_port, arrival_time, arrival_port, notes,
       total_distance_km, average_speed, average_fuel_consumption, telemetry_count,
       speed_sum, fuel_sum
FROM voyages
WHERE ship_id = $1
ORDER BY departure_time DESC
LIMIT 1;
"#;

pub const SELECT_VOYAGES_BY_SHIP: &str = r#"
SELECT id, ship_id, departure_time, departure_port, arrival_time, arrival_port, notes,
       total_distance_km, average_speed, average_fuel_consumption, telemetry_count,
       speed_sum, fuel_sum
FROM voyages
WHERE ship_id = $1
  AND ($2::timestamptz IS NULL OR departure_time >= $2)
  AND ($3::timestamptz IS NULL OR departure_time <= $3)
ORDER BY departure_time;
"#;

pub const SELECT_VOYAGES_BY_DATE_RANGE: &str = r#"
SELECT id, ship_id, departure_time, departure_port, arrival_time, arrival_port, notes,
       total_distance_km, average_speed, average_fuel_consumption, telemetry_count,
       speed_sum, fuel_sum
FROM voyages
WHERE departure_time >= $1 AND departure_time <= $2
ORDER BY departure_time;
"#;

pub const SELECT_TELEMETRY_FOR_VOYAGES: &str = r#"
SELECT voyage_id, seq, ship_id, timestamp, lat, lng, speed, heading, fuel_consumption,
       engine_status, distance_from_last_km, notes, correlation_id
FROM telemetry_points
WHERE voyage_id = ANY($1)
ORDER BY voyage_id, seq;
"#;

pub const SELECT_LAST_TELEMETRY_POINT: &str = r#"
SELECT voyage_id, seq, ship_id, timestamp, lat, lng, speed, heading, fuel_consumption,
       engine_status, distance_from_last_km, notes, correlation_id
FROM telemetry_points
WHERE voyage_id = $1
ORDER BY seq DESC
LIMIT 1;
"#;

pub const INSERT_VOYAGE: &str = r#"
INSERT INTO voyages (id, ship_id, departure_time, departure_port, notes)
VALUES ($1, $2, $3, $4, $5);
"#;

pub const INSERT_TELEMETRY_POINT: &str = r#"
INSERT INTO telemetry_points (
    voyage_id, seq, ship_id, timestamp, lat, lng, speed, heading, fuel_consumption,
    engine_status, distance_from_last_km, notes, correlation_id
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13);
"#;

pub const UPDATE_VOYAGE_AGGREGATES: &str = r#"
UPDATE voyages
SET total_distance_km = $2,
    average_speed = $3,
    average_fuel_consumption = $4,
    telemetry_count = $5,
    speed_sum = $6,
    fuel_sum = $7,
    updated_at = NOW()
WHERE id = $1;
"#;

pub const UPDATE_VOYAGE_ARRIVAL: &str = r#"
UPDATE voyages
SET arrival_time = $2,
    arrival_port = $3,
    updated_at = NOW()
WHERE id = $1 AND arrival_time IS NULL;
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_queries_filter_on_departure_only() {
        for sql in [SELECT_VOYAGES_BY_SHIP, SELECT_VOYAGES_BY_DATE_RANGE] {
            let filter = &sql[sql.find("WHERE").unwrap()..];
            assert!(!filter.contains("arrival_time"), "{sql}");
            assert!(filter.contains("departure_time <="), "{sql}");
        }
    }

    #[test]
    fn voyage_selects_read_running_sums() {
        for sql in [
            SELECT_ACTIVE_VOYAGE,
            SELECT_VOYAGE,
            SELECT_LATEST_VOYAGE_FOR_SHIP,
            SELECT_VOYAGES_BY_SHIP,
            SELECT_VOYAGES_BY_DATE_RANGE,
        ] {
            assert!(sql.contains("speed_sum, fuel_sum"), "{sql}");
        }
    }
}
