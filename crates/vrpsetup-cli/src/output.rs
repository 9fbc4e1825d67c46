//! Output formatting module

use serde_json::json;
use vrpsetup_domain::model::{GeoPoint, JobRequest, MarkerState, RoutingSolution};
use vrpsetup_types::{OutputFormat, Result};

/// Print the request body that would be sent
pub fn output_request(request: &JobRequest) -> Result<()> {
    let content = serde_json::to_string_pretty(request)?;
    println!("{}", content);
    Ok(())
}

pub fn output_markers(output_format: OutputFormat, markers: &MarkerState) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(markers)?;
        println!("{}", content);
    } else {
        print_marker_table(markers);
    }
    Ok(())
}

pub fn output_route(
    output_format: OutputFormat,
    markers: &MarkerState,
    solution: Option<&RoutingSolution>,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(&json!({
            "markers": markers,
            "solution": solution,
        }))?;
        println!("{}", content);
    } else {
        print_marker_table(markers);
        if let Some(solution) = solution {
            println!("\nSolution");
            println!("========");
            println!("{}", serde_json::to_string_pretty(&solution.0)?);
        }
    }
    Ok(())
}

fn print_marker_table(markers: &MarkerState) {
    println!("\nMarkers");
    println!("=======");

    if markers.is_empty() {
        println!("(none)");
        return;
    }

    if let Some(origin) = markers.origin {
        println!("Origin:     {}", format_point(&origin));
    }

    println!("{:>5}  {:>12}  {:>12}", "#", "Latitude", "Longitude");
    println!("{}", "-".repeat(33));
    for (i, point) in markers.destinations.iter().enumerate() {
        println!(
            "{:>5}  {:>12.6}  {:>12.6}",
            i + 1,
            point.latitude,
            point.longitude
        );
    }
    println!("{}", "-".repeat(33));
    println!("Destinations: {}", markers.destinations.len());
}

fn format_point(point: &GeoPoint) -> String {
    format!("{:.6}, {:.6}", point.latitude, point.longitude)
}
