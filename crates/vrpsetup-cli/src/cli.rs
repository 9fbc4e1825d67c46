//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vrpsetup_types::OutputFormat;

#[derive(Parser)]
#[command(name = "vrpsetup")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Validate geocode and routing uploads and submit them to the job services")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Geocoding service URL (overrides config)
    #[arg(long, global = true, env = "GEOCODE_SERVICE_URL")]
    pub geocode_url: Option<String>,

    /// Routing service URL (overrides config)
    #[arg(long, global = true, env = "VRP_RPC_URL")]
    pub routing_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Geocode a CSV of zip codes
    Geocode {
        /// Path to zip code CSV file
        file: PathBuf,

        /// Where to write the geocoded CSV (default: <file>_geocoded.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Stack id sent with the job (overrides config)
        #[arg(long)]
        stack_id: Option<i64>,

        /// Validate and print the request body without sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Submit a CSV of demand points for route optimization
    Route {
        /// Path to demand CSV file (latitude, longitude and the unit column)
        file: PathBuf,

        /// Origin latitude
        #[arg(long, allow_hyphen_values = true)]
        origin_lat: String,

        /// Origin longitude (e.g. -94.6)
        #[arg(long, allow_hyphen_values = true)]
        origin_lon: String,

        /// Vehicle capacity, a positive integer
        #[arg(long, allow_hyphen_values = true)]
        capacity: String,

        /// Demand column the capacity is measured in
        #[arg(long)]
        unit: String,

        /// Validate and print the request body without sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set geocoding service URL
        #[arg(long)]
        set_geocode_url: Option<String>,

        /// Set routing service URL
        #[arg(long)]
        set_routing_url: Option<String>,

        /// Set stack id sent with geocode jobs
        #[arg(long)]
        set_stack_id: Option<i64>,

        /// Set required geocode columns (comma separated)
        #[arg(long, value_delimiter = ',')]
        set_geocode_fields: Option<Vec<String>>,

        /// Set default output format
        #[arg(long)]
        set_format: Option<OutputFormat>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_accepts_negative_longitude() {
        let cli = Cli::try_parse_from([
            "vrpsetup",
            "route",
            "demand.csv",
            "--origin-lat",
            "39.1",
            "--origin-lon",
            "-94.6",
            "--capacity",
            "12",
            "--unit",
            "pallets",
        ])
        .unwrap();
        match cli.command {
            Commands::Route {
                origin_lon,
                capacity,
                dry_run,
                ..
            } => {
                assert_eq!(origin_lon, "-94.6");
                assert_eq!(capacity, "12");
                assert!(!dry_run);
            }
            _ => panic!("expected route"),
        }
    }

    #[test]
    fn test_geocode_flags() {
        let cli = Cli::try_parse_from([
            "vrpsetup",
            "--format",
            "json",
            "geocode",
            "zips.csv",
            "--stack-id",
            "9",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Geocode {
                stack_id, dry_run, ..
            } => {
                assert_eq!(stack_id, Some(9));
                assert!(dry_run);
            }
            _ => panic!("expected geocode"),
        }
    }
}
