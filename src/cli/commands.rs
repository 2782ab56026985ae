use serde::Serialize;
use tracing::info;

use crate::cli::args::{Cli, Commands};
use crate::config::ClientConfig;
use crate::directory::StationDirectory;
use crate::error::Result;
use crate::models::{SensorData, SensorQuery, SensorType, Station};
use crate::processors::{GeoFilter, RiskFilter};
use crate::sensors::Sensor;
use crate::source::HttpSource;
use crate::utils::coordinates::DistanceModel;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = ClientConfig::load(cli.config.as_deref())?;
    // one session per command, dropped on every exit path
    let source = HttpSource::new(config.clone())?;

    match cli.command {
        Commands::List { sensor_types } => {
            let directory = StationDirectory::new(source);
            let progress = ProgressReporter::new_spinner("Fetching station catalogs...", false);
            let stations = directory.list_stations(&sensor_types).await?;
            progress.finish_and_clear();

            info!(stations = stations.len(), "directory listed");
            print_stations(&stations, cli.json)?;
        }

        Commands::Data {
            variable,
            sensor_type,
            grouping,
            samples,
            date_format,
        } => {
            let sensor_type: SensorType = sensor_type.parse()?;
            let mut sensor =
                Sensor::new(sensor_type, SensorQuery::new(variable, grouping, samples))
                    .with_config(&config);
            if let Some(format) = date_format {
                sensor = sensor.with_default_date_format(format);
            }

            let progress = ProgressReporter::new_spinner("Fetching sensor data...", false);
            let data = sensor.get_data(&source).await?;
            progress.finish_and_clear();

            match data {
                Some(data) => print_sensor_data(&data, cli.json)?,
                None => println!("No data available for {}", sensor.query()),
            }
        }

        Commands::Nearby {
            lat,
            lon,
            radius,
            sensor_types,
            spherical,
        } => {
            let model = if spherical {
                DistanceModel::Spherical
            } else {
                DistanceModel::Ellipsoidal
            };
            let filter = GeoFilter::new(lat, lon, radius)?.with_model(model);

            let directory = StationDirectory::new(source);
            let progress = ProgressReporter::new_spinner("Fetching station catalogs...", false);
            let within = directory.stations_within(&sensor_types, &filter).await?;
            progress.finish_and_clear();

            info!(within = within.len(), radius_km = radius, "radius query");

            if cli.json {
                print_json(&filter.distances(&within))?;
            } else {
                println!(
                    "{} stations within {:.1} km of ({:.4}, {:.4})",
                    within.len(),
                    radius,
                    lat,
                    lon
                );
                for station in &within {
                    let distance = filter.distance_to(station).unwrap_or(f64::NAN);
                    println!("{:>8.2} km  {}", distance, station_line(station));
                }
            }
        }

        Commands::Risk {
            level,
            comparison,
            sensor_types,
        } => {
            let filter = RiskFilter::parse(level, &comparison)?;

            let directory = StationDirectory::new(source);
            let progress = ProgressReporter::new_spinner("Fetching station catalogs...", false);
            let stations = directory.stations_by_risk(&sensor_types, filter).await?;
            progress.finish_and_clear();

            if !cli.json {
                println!(
                    "Stations with alarm level {} {}:",
                    filter.comparison, filter.level
                );
            }
            print_stations(&stations, cli.json)?;
        }

        Commands::Basin {
            basin_id,
            sensor_types,
        } => {
            let directory = StationDirectory::new(source);
            let progress = ProgressReporter::new_spinner("Fetching station catalogs...", false);
            let stations = directory.stations_in_basin(&sensor_types, basin_id).await?;
            progress.finish_and_clear();

            if !cli.json {
                println!("Stations in sub-basin {}:", basin_id);
            }
            print_stations(&stations, cli.json)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_stations(stations: &[Station], json: bool) -> Result<()> {
    if json {
        return print_json(stations);
    }

    if stations.is_empty() {
        println!("No stations found");
        return Ok(());
    }

    for station in stations {
        println!("{}", station_line(station));
    }
    println!("\n{} stations", stations.len());
    Ok(())
}

fn station_line(station: &Station) -> String {
    let id = station
        .id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    let sensor_type = station
        .sensor_type
        .map(|t| t.as_str())
        .unwrap_or("-");
    let coordinates = station
        .coordinates()
        .map(|(lat, lon)| format!("{:.4}, {:.4}", lat, lon))
        .unwrap_or_else(|| "no coordinates".to_string());
    let status = station
        .risk_level()
        .map(|level| level.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "{:<10} {:<40} {:<12} {:<22} {}",
        id, station.name, sensor_type, coordinates, status
    )
}

fn print_sensor_data(data: &SensorData, json: bool) -> Result<()> {
    if json {
        return print_json(data);
    }

    println!("{} ({} readings)", data.query, data.points.len());
    for point in &data.points {
        println!("{}  {:>10.2}", point.timestamp.format("%Y-%m-%d %H:%M"), point.value);
    }
    if let Some(latest) = data.latest() {
        println!("\nLatest: {:.2} at {}", latest.value, latest.timestamp);
    }
    Ok(())
}
