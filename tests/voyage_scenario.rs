use chrono::{Duration, TimeZone, Utc};
use portlog::models::event::{decode, EventKind, PayloadFormat};
use portlog::processor::transition::{apply_event, Transition};
use portlog::{haversine_km, EngineStatus, GeoPoint, TelemetryPoint, Voyage, VoyageErrorKind};

const SHIP: &str = "IMO9074729";

fn point(lat: f64, lon: f64, speed: f64, fuel: f64, hour: i64) -> TelemetryPoint {
    TelemetryPoint::new(
        SHIP,
        GeoPoint::new(lat, lon),
        speed,
        270.0,
        fuel,
        EngineStatus::Normal,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hour),
        None,
    )
}

#[test]
fn jakarta_to_surabaya() {
    let departure = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut voyage = Voyage::start_for_ship(SHIP, departure, "Jakarta", None);

    voyage.append_telemetry(point(-6.2, 106.8, 12.0, 5.0, 1)).unwrap();
    voyage.append_telemetry(point(-6.0, 106.5, 15.0, 6.0, 2)).unwrap();
    voyage.append_telemetry(point(-5.8, 106.0, 14.0, 5.5, 3)).unwrap();

    let expected = haversine_km(&GeoPoint::new(-6.2, 106.8), &GeoPoint::new(-6.0, 106.5))
        + haversine_km(&GeoPoint::new(-6.0, 106.5), &GeoPoint::new(-5.8, 106.0));
    assert!((voyage.total_distance_km() - expected).abs() < 1e-9);
    assert!((voyage.average_speed() - 13.67).abs() < 0.01);
    assert!((voyage.average_fuel_consumption() - 5.5).abs() < 1e-9);

    let arrival = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    voyage.complete(arrival, "Surabaya").unwrap();
    assert_eq!(voyage.trip_time(), Some(Duration::hours(24)));

    let err = voyage
        .append_telemetry(point(-5.5, 105.5, 10.0, 5.0, 25))
        .unwrap_err();
    assert_eq!(err.kind(), VoyageErrorKind::InvalidState);
    assert_eq!(voyage.telemetry().len(), 3);
}

#[test]
fn json_events_drive_a_voyage() {
    let payloads = [
        r#"{"event":"DEPARTURE","uuid":"7f1d8a4e-2b55-4c1e-9d57-0a6f1f1c2b01","data":{"SHIP_ID":"IMO9074729","TIMESTAMP":"2024-01-01T00:00:00Z","PORT":"Jakarta","LATITUDE":"-6.2","LONGITUDE":"106.8","SPEED":"12","FUEL_CONSUMPTION":"5"}}"#,
        r#"{"event":"TELEMETRY","data":{"SHIP_ID":"IMO9074729","TIMESTAMP":"2024-01-01 02:00:00","LATITUDE":"-6.0","LONGITUDE":"106.5","SPEED":"15","FUEL_CONSUMPTION":"6","ENGINE_STATUS":"NORMAL"}}"#,
        r#"{"event":"TELEMETRY","data":{"SHIP_ID":"IMO9074729","TIMESTAMP":"2024-01-01 03:00:00","LATITUDE":-5.8,"LONGITUDE":106.0,"SPEED":14,"FUEL_CONSUMPTION":5.5}}"#,
        r#"{"event":"ARRIVAL","data":{"SHIP_ID":"IMO9074729","TIMESTAMP":"2024-01-02T00:00:00Z","PORT":"Surabaya"}}"#,
    ];

    let mut active: Option<Voyage> = None;
    let mut completed = None;
    for payload in payloads {
        let event = decode(PayloadFormat::Json, payload.as_bytes()).unwrap();
        match apply_event(active.take(), &event).unwrap() {
            Transition::Started(v) | Transition::Appended { voyage: v, .. } => active = Some(v),
            Transition::Completed(v) => completed = Some(v),
            Transition::Ignored(reason) => panic!("unexpected ignore: {reason}"),
        }
    }

    let voyage = completed.expect("voyage should be completed");
    assert!(active.is_none());
    assert_eq!(voyage.telemetry().len(), 3);
    assert!((voyage.average_speed() - 13.67).abs() < 0.01);
    assert_eq!(voyage.arrival_port(), Some("Surabaya"));
    assert_eq!(voyage.trip_time(), Some(Duration::hours(24)));

    let late = decode(
        PayloadFormat::Json,
        br#"{"event":"TELEMETRY","data":{"SHIP_ID":"IMO9074729","TIMESTAMP":"2024-01-02 01:00:00","LATITUDE":"-5.5","LONGITUDE":"105.5"}}"#,
    )
    .unwrap();
    assert!(matches!(late.kind, EventKind::Telemetry(_)));
    assert!(matches!(apply_event(None, &late).unwrap(), Transition::Ignored(_)));
}
