//! Prints voyage summaries as JSON: a fleet or single-ship period summary,
//! or the details of one voyage.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use portlog::config::AppConfig;
use portlog::db::{self, voyages, DbPool};
use portlog::models::insight::{DateRange, Insight};
use portlog::Voyage;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "portlog-insight", about = "Summarise voyages stored by PortLog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Summarise completed voyages that departed within a period.
    Summary {
        /// Start of the period, RFC 3339.
        #[arg(long)]
        start: DateTime<Utc>,

        /// End of the period, RFC 3339.
        #[arg(long)]
        end: DateTime<Utc>,

        /// Restrict to one ship.
        #[arg(long)]
        ship: Option<String>,
    },

    /// Show the most recent voyage of a ship, at sea or arrived.
    Latest {
        #[arg(long)]
        ship: String,
    },

    /// Show one voyage by id.
    Show { id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_writer(std::io::stderr)
        .init();

    let pool = db::init_pool(&config.database_url, 2).await?;

    let output = match cli.command {
        Command::Summary { start, end, ship } => summary(&pool, start, end, ship.as_deref()).await?,
        Command::Latest { ship } => {
            let row = voyages::latest_voyage_for_ship(&pool, &ship)
                .await?
                .with_context(|| format!("ship {ship} has no voyages"))?;
            show(&pool, row.id).await?
        }
        Command::Show { id } => show(&pool, id).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

async fn summary(
    pool: &DbPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    ship: Option<&str>,
) -> anyhow::Result<Value> {
    let period = DateRange::new(start, end)?;
    let rows = match ship {
        Some(ship) => voyages::voyages_by_ship(pool, ship, Some(start), Some(end)).await?,
        None => voyages::voyages_by_date_range(pool, start, end).await?,
    };
    info!("Loaded {} voyages", rows.len());

    let fleet = voyages::hydrate(pool, rows).await?;
    Ok(serde_json::to_value(Insight::generate(period, &fleet))?)
}

async fn show(pool: &DbPool, id: Uuid) -> anyhow::Result<Value> {
    let voyage = voyages::load_voyage(pool, id)
        .await?
        .with_context(|| format!("voyage {id} not found"))?;
    Ok(voyage_details(&voyage))
}

fn voyage_details(voyage: &Voyage) -> Value {
    json!({
        "id": voyage.id(),
        "ship_id": voyage.ship_id(),
        "departure_time": voyage.departure_time(),
        "departure_port": voyage.departure_port(),
        "arrival_time": voyage.arrival_time(),
        "arrival_port": voyage.arrival_port(),
        "notes": voyage.notes(),
        "telemetry_count": voyage.telemetry_count(),
        "total_distance_km": voyage.total_distance_km(),
        "average_speed": voyage.average_speed(),
        "average_fuel_consumption": voyage.average_fuel_consumption(),
        "trip_hours": voyage.trip_time().map(|t| t.num_seconds() as f64 / 3600.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};

    #[test]
    fn latest_needs_a_ship() {
        assert!(Cli::try_parse_from(["portlog-insight", "latest"]).is_err());

        let cli = Cli::try_parse_from(["portlog-insight", "latest", "--ship", "IMO9074729"]).unwrap();
        assert!(matches!(cli.command, Command::Latest { ship } if ship == "IMO9074729"));
    }

    #[test]
    fn summary_takes_a_period() {
        let cli = Cli::try_parse_from([
            "portlog-insight",
            "summary",
            "--start",
            "2024-01-01T00:00:00Z",
            "--end",
            "2024-02-01T00:00:00Z",
        ])
        .unwrap();
        let Command::Summary { start, end, ship } = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(end - start, Duration::days(31));
        assert_eq!(ship, None);
    }

    #[test]
    fn show_parses_voyage_id() {
        let id = "7f1d8a4e-2b55-4c1e-9d57-0a6f1f1c2b01";
        let cli = Cli::try_parse_from(["portlog-insight", "show", id]).unwrap();
        assert!(matches!(cli.command, Command::Show { id: got } if got.to_string() == id));
        assert!(Cli::try_parse_from(["portlog-insight", "show", "not-a-uuid"]).is_err());
    }

    #[test]
    fn details_include_trip_hours_once_arrived() {
        let departure = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut voyage = Voyage::start_for_ship("IMO9074729", departure, "Jakarta", None);

        assert_eq!(voyage_details(&voyage)["trip_hours"], Value::Null);

        voyage.complete(departure + Duration::hours(30), "Surabaya").unwrap();
        let details = voyage_details(&voyage);
        assert_eq!(details["trip_hours"], 30.0);
        assert_eq!(details["arrival_port"], "Surabaya");
        assert_eq!(details["telemetry_count"], 0);
    }
}
