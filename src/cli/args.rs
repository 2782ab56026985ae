use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::{
    DEFAULT_RADIUS_KM, DEFAULT_RISK_SENSOR_TYPE, DEFAULT_SAMPLE_COUNT, DEFAULT_TIME_GROUPING,
    SENSOR_TYPE_ALL,
};

#[derive(Parser)]
#[command(name = "chj-saih")]
#[command(about = "Query stations and readings of the CHJ SAIH hydrological network")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stations of one or more sensor types
    List {
        #[arg(
            short = 't',
            long = "sensor-type",
            value_delimiter = ',',
            default_value = SENSOR_TYPE_ALL,
            help = "rain, flow, reservoir, temperature or all"
        )]
        sensor_types: Vec<String>,
    },

    /// Fetch the recent readings of a sensor variable
    Data {
        #[arg(help = "Sensor variable code, e.g. E01A01")]
        variable: String,

        #[arg(short = 't', long = "sensor-type", help = "rain, flow, reservoir or temperature")]
        sensor_type: String,

        #[arg(short = 'g', long, default_value = DEFAULT_TIME_GROUPING)]
        grouping: String,

        #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        samples: u32,

        #[arg(long, help = "Date format used when the payload declares none")]
        date_format: Option<String>,
    },

    /// Stations within a radius of a point
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        #[arg(short, long, default_value_t = DEFAULT_RADIUS_KM, help = "Radius in kilometres")]
        radius: f64,

        #[arg(
            short = 't',
            long = "sensor-type",
            value_delimiter = ',',
            default_value = SENSOR_TYPE_ALL
        )]
        sensor_types: Vec<String>,

        #[arg(long, help = "Use the spherical (haversine) distance model")]
        spherical: bool,
    },

    /// Stations at or above an alarm level
    Risk {
        #[arg(short, long, default_value_t = 2, allow_negative_numbers = true, help = "0 unknown, 1 normal, 2 warning, 3 critical")]
        level: i64,

        #[arg(long, default_value = "greater_equal", help = "equal or greater_equal")]
        comparison: String,

        #[arg(
            short = 't',
            long = "sensor-type",
            value_delimiter = ',',
            default_value = DEFAULT_RISK_SENSOR_TYPE
        )]
        sensor_types: Vec<String>,
    },

    /// Stations of one hydrological sub-basin
    Basin {
        #[arg(help = "Sub-basin (subcuenca) identifier")]
        basin_id: i64,

        #[arg(
            short = 't',
            long = "sensor-type",
            value_delimiter = ',',
            default_value = SENSOR_TYPE_ALL
        )]
        sensor_types: Vec<String>,
    },
}
