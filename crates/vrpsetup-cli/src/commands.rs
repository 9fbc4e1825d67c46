//! Command handlers

use crate::cli::{Cli, Commands};
use crate::output::{output_markers, output_request, output_route};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use vrpsetup_app::clients::{open_job_client, open_session};
use vrpsetup_app::config::Config;
use vrpsetup_types::{Flow, OutputFormat, Result};

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if cli.geocode_url.is_some() {
        config.geocode_url = cli.geocode_url.clone();
    }
    if cli.routing_url.is_some() {
        config.routing_url = cli.routing_url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout_secs = secs;
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Geocode {
            file,
            output,
            stack_id,
            dry_run,
        } => {
            if let Some(id) = stack_id {
                config.stack_id = *id;
            }
            cmd_geocode(&config, file, output.clone(), *dry_run, output_format).await
        }

        Commands::Route {
            file,
            origin_lat,
            origin_lon,
            capacity,
            unit,
            dry_run,
        } => {
            let form = RouteForm {
                origin_lat,
                origin_lon,
                capacity,
                unit,
            };
            cmd_route(&config, file, form, *dry_run, output_format).await
        }

        Commands::Config {
            show,
            set_geocode_url,
            set_routing_url,
            set_stack_id,
            set_geocode_fields,
            set_format,
            reset,
        } => cmd_config(
            *show,
            set_geocode_url.clone(),
            set_routing_url.clone(),
            *set_stack_id,
            set_geocode_fields.clone(),
            *set_format,
            *reset,
        ),
    }
}

/// Raw routing form values as typed on the command line
struct RouteForm<'a> {
    origin_lat: &'a str,
    origin_lon: &'a str,
    capacity: &'a str,
    unit: &'a str,
}

async fn cmd_geocode(
    config: &Config,
    file: &Path,
    output: Option<PathBuf>,
    dry_run: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let mut session = open_session(config, Flow::Geocode);
    let rows = session.select_path(file)?;
    eprintln!("Loaded {} rows from {}", rows, session.file_label());

    if dry_run {
        output_request(session.validate()?)?;
        return session.end_session();
    }

    let client = open_job_client(config)?;
    let pb = spinner(format!("Geocoding {} zip codes...", rows));
    let submitted = session.submit(&client).await.map(|markers| markers.clone());
    pb.finish_and_clear();
    let markers = submitted?;

    output_markers(output_format, &markers)?;

    match session.export_bytes()? {
        Some(bytes) => {
            let path = output.unwrap_or_else(|| default_export_path(file));
            std::fs::write(&path, bytes)?;
            eprintln!("Geocoded CSV written to: {}", path.display());
        }
        None => eprintln!("No geocodes returned, nothing exported"),
    }

    session.end_session()
}

async fn cmd_route(
    config: &Config,
    file: &Path,
    form: RouteForm<'_>,
    dry_run: bool,
    output_format: OutputFormat,
) -> Result<()> {
    let mut session = open_session(config, Flow::Routing);
    let rows = session.select_path(file)?;
    eprintln!("Loaded {} demand points from {}", rows, session.file_label());

    session.set_origin_latitude(form.origin_lat)?;
    session.set_origin_longitude(form.origin_lon)?;
    session.set_vehicle_capacity(form.capacity)?;
    session.set_vehicle_unit(form.unit);

    if dry_run {
        output_request(session.validate()?)?;
        return session.end_session();
    }

    let client = open_job_client(config)?;
    let pb = spinner(format!("Optimizing routes for {} demand points...", rows));
    let submitted = session.submit(&client).await.map(|markers| markers.clone());
    pb.finish_and_clear();
    let markers = submitted?;

    output_route(output_format, &markers, session.routing_solution())?;

    session.end_session()
}

fn cmd_config(
    show: bool,
    set_geocode_url: Option<String>,
    set_routing_url: Option<String>,
    set_stack_id: Option<i64>,
    set_geocode_fields: Option<Vec<String>>,
    set_format: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(url) = set_geocode_url {
        config.geocode_url = Some(url);
        modified = true;
    }

    if let Some(url) = set_routing_url {
        config.routing_url = Some(url);
        modified = true;
    }

    if let Some(stack_id) = set_stack_id {
        config.stack_id = stack_id;
        modified = true;
    }

    if let Some(fields) = set_geocode_fields {
        config.geocode_required_fields = fields
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        modified = true;
    }

    if let Some(format) = set_format {
        config.output_format = format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration saved");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// `zips.csv` -> `zips_geocoded.csv` next to the input
fn default_export_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    input.with_file_name(format!("{}_geocoded.csv", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_export_path() {
        assert_eq!(
            default_export_path(Path::new("/data/zips.csv")),
            PathBuf::from("/data/zips_geocoded.csv")
        );
        assert_eq!(
            default_export_path(Path::new("upload")),
            PathBuf::from("upload_geocoded.csv")
        );
    }

    #[tokio::test]
    async fn test_geocode_dry_run_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("zips.csv");
        std::fs::write(&file, "zip\n10001\n").unwrap();

        // No geocode URL configured, so any network attempt would fail
        let config = Config::default();
        cmd_geocode(&config, &file, None, true, OutputFormat::Json)
            .await
            .unwrap();
        assert!(!dir.path().join("zips_geocoded.csv").exists());
    }

    #[tokio::test]
    async fn test_route_rejects_fractional_capacity_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("demand.csv");
        std::fs::write(&file, "latitude,longitude,pallets\n40.71,-74.0,4\n").unwrap();

        let config = Config::default();
        let form = RouteForm {
            origin_lat: "39.1",
            origin_lon: "-94.6",
            capacity: "12.5",
            unit: "pallets",
        };
        let err = cmd_route(&config, &file, form, false, OutputFormat::Table)
            .await
            .unwrap_err();
        assert_eq!(
            err.rule(),
            Some(vrpsetup_types::ValidationRule::CapacityNotPositiveInteger)
        );
    }

    #[tokio::test]
    async fn test_geocode_without_url_fails_submission() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("zips.csv");
        std::fs::write(&file, "zip\n10001\n").unwrap();

        let err = cmd_geocode(&Config::default(), &file, None, false, OutputFormat::Table)
            .await
            .unwrap_err();
        assert!(
            matches!(err, vrpsetup_types::Error::Submission(ref m) if m.contains("geocode_url"))
        );
    }
}
