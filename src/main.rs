//! # Solar Elevation Application Entry Point
//!
//! This binary crate wires the command line to the library pipeline: it merges
//! CLI flags over the config file, runs one request with the SPA solver and
//! writes the result as a text chart, a CSV table or a JSON bundle.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use solar_elevation_lib::config::{ChartConfig, Config, ExportConfig, LocationConfig};
use solar_elevation_lib::pipeline;
use solar_elevation_lib::renderer::render_ascii;
use solar_elevation_lib::report::{HighlightColumn, SolarReport};
use solar_elevation_lib::request::{parse_timestamp, RequestInputs};
use solar_elevation_lib::solver::SpaSolver;
use solar_elevation_lib::zone::{NauticalZoneResolver, Zone, ZoneResolver};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Text chart with tick labels and highlight markers
    Ascii,
    /// Table of time and elevation
    Csv,
    /// Rows, markers and tick plan as JSON
    Json,
}

/// Solar elevation over a time window, with highlighted times and angles.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Window start, e.g. "2024-06-21 00:00" (default: today 00:00)
    #[arg(long)]
    start: Option<String>,
    /// Window end (default: start of tomorrow)
    #[arg(long)]
    end: Option<String>,
    /// Minutes between samples
    #[arg(long, allow_negative_numbers = true)]
    interval: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    latitude: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    longitude: Option<f64>,
    /// Meters above sea level
    #[arg(long, allow_negative_numbers = true)]
    altitude: Option<f64>,
    /// UTC offset ("+09:00", "9") or IANA name ("Asia/Tokyo")
    #[arg(long, allow_hyphen_values = true)]
    timezone: Option<String>,
    /// Time to highlight (nearest sample); repeatable
    #[arg(long = "special-time")]
    special_times: Vec<String>,
    /// Elevation angle to highlight; repeatable
    #[arg(long = "special-angle", allow_hyphen_values = true)]
    special_angles: Vec<String>,
    /// Degrees either side of each special angle
    #[arg(long, allow_negative_numbers = true)]
    angle_threshold: Option<f64>,
    /// Minutes between x-axis ticks
    #[arg(long, allow_negative_numbers = true)]
    xtick_minutes: Option<i64>,
    /// Degrees between y-axis ticks
    #[arg(long, allow_negative_numbers = true)]
    ytick_degrees: Option<i64>,
    /// Config file with location and chart defaults (default: solar-config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Store this run's location, chart and export settings in the config file
    #[arg(long)]
    save_config: bool,
    #[arg(long, value_enum, default_value_t = Format::Ascii)]
    format: Format,
    /// Write to this file, or into this directory under the generated file name
    #[arg(long)]
    output: Option<PathBuf>,
    /// Add the Highlighted column to CSV output
    #[arg(long)]
    with_highlight: bool,
}

/// Merge CLI flags over config values.
fn request_inputs(args: &Args, config: &Config) -> Result<RequestInputs> {
    let latitude = args.latitude.unwrap_or(config.location.latitude);
    let longitude = args.longitude.unwrap_or(config.location.longitude);
    let timezone = args
        .timezone
        .clone()
        .or_else(|| config.location.timezone.clone());

    let zone = match timezone.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.parse::<Zone>()?,
        _ => NauticalZoneResolver.zone_for(latitude, longitude),
    };

    // Default window: today in the request zone, midnight to midnight
    let start = match &args.start {
        Some(start) => start.clone(),
        None => zone.at(&Utc::now()).format("%Y-%m-%d 00:00").to_string(),
    };
    let end = match &args.end {
        Some(end) => end.clone(),
        None => {
            let start = parse_timestamp("start", 1, &start, &zone)?;
            let next_day = start
                .date_naive()
                .succ_opt()
                .with_context(|| format!("no day follows start {start}"))?;
            next_day.format("%Y-%m-%d 00:00").to_string()
        }
    };

    Ok(RequestInputs {
        start,
        end,
        interval_minutes: args.interval.unwrap_or(config.chart.interval_minutes),
        latitude,
        longitude,
        altitude: args.altitude.unwrap_or(config.location.altitude),
        timezone,
        special_times: args.special_times.clone(),
        special_angles: args.special_angles.clone(),
        angle_threshold: args.angle_threshold.unwrap_or(config.chart.angle_threshold),
        xtick_minutes: args.xtick_minutes.unwrap_or(config.chart.xtick_minutes),
        ytick_degrees: args.ytick_degrees.unwrap_or(config.chart.ytick_degrees),
    })
}

/// This run's settings as a config file.
fn effective_config(inputs: &RequestInputs, include_highlight: bool) -> Config {
    Config {
        location: LocationConfig {
            latitude: inputs.latitude,
            longitude: inputs.longitude,
            altitude: inputs.altitude,
            timezone: inputs.timezone.clone(),
        },
        chart: ChartConfig {
            interval_minutes: inputs.interval_minutes,
            angle_threshold: inputs.angle_threshold,
            xtick_minutes: inputs.xtick_minutes,
            ytick_degrees: inputs.ytick_degrees,
        },
        export: ExportConfig { include_highlight },
    }
}

/// Write `config` to `path`, or to the default config file.
fn save_config(config: &Config, path: Option<&Path>) -> Result<()> {
    let saved = match path {
        Some(path) => config.save_to_path(path),
        None => config.save(),
    };
    saved.map_err(|e| anyhow::anyhow!("saving config: {e}"))
}

/// Render the report in the requested format.
fn render(report: &SolarReport, format: Format, column: HighlightColumn) -> Result<String> {
    Ok(match format {
        Format::Ascii => render_ascii(report),
        Format::Csv => report.to_csv_string(column)?,
        Format::Json => serde_json::to_string_pretty(report)? + "\n",
    })
}

/// Resolve `--output`: a directory gets the generated file name.
fn output_path(output: &Path, report: &SolarReport, format: Format) -> PathBuf {
    if !output.is_dir() {
        return output.to_path_buf();
    }
    let name = match format {
        Format::Csv => report.table_filename(),
        Format::Ascii => report.chart_filename("txt"),
        Format::Json => report.chart_filename("json"),
    };
    output.join(name)
}

/// Main application entry point.
fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the rendered output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("solar_elevation=info,solar_elevation_lib=info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let include_highlight = args.with_highlight || config.export.include_highlight;

    let inputs = request_inputs(&args, &config)?;
    let request = inputs.clone().into_request().context("invalid request")?;
    if args.save_config {
        save_config(&effective_config(&inputs, include_highlight), args.config.as_deref())?;
    }

    // Export and display both come from this one request-scoped report
    let report = pipeline::run(&request, &SpaSolver::new()).context("computing elevation series")?;

    let column = if include_highlight {
        HighlightColumn::Include
    } else {
        HighlightColumn::Omit
    };
    let rendered = render(&report, args.format, column)?;

    match &args.output {
        Some(output) => {
            let path = output_path(output, &report, args.format);
            fs::write(&path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => io::stdout().write_all(rendered.as_bytes())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_elevation_lib::ElevationError;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["solar-elevation"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = args(&[
            "--start",
            "2024-06-21 00:00",
            "--latitude",
            "-33.86",
            "--special-angle",
            "-6",
            "--special-time",
            "2024-06-21 12:00",
            "--interval",
            "5",
        ]);
        let inputs = request_inputs(&args, &Config::default()).unwrap();

        assert_eq!(inputs.latitude, -33.86);
        assert_eq!(inputs.longitude, Config::default().location.longitude);
        assert_eq!(inputs.interval_minutes, 5);
        assert_eq!(inputs.special_angles, vec!["-6".to_string()]);
        assert_eq!(inputs.end, "2024-06-22 00:00");
    }

    #[test]
    fn test_default_end_follows_local_start_date() {
        // 20:00 UTC is already the next day at +09:00
        let args = args(&["--start", "2024-06-21T20:00:00Z"]);
        let inputs = request_inputs(&args, &Config::default()).unwrap();
        assert_eq!(inputs.end, "2024-06-23 00:00");

        let request = inputs.into_request().unwrap();
        assert_eq!(request.start.to_rfc3339(), "2024-06-22T05:00:00+09:00");
        assert_eq!(request.end - request.start, chrono::Duration::hours(19));
    }

    #[test]
    fn test_malformed_start_is_an_error() {
        let args = args(&["--start", "2024-06-2€ 00:00"]);
        let err = request_inputs(&args, &Config::default()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ElevationError>(),
            Some(ElevationError::Parse { field: "start", .. })
        ));
    }

    #[test]
    fn test_save_config_stores_effective_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solar-config.toml");
        let path_arg = path.to_str().unwrap();
        let args = args(&[
            "--config",
            path_arg,
            "--latitude",
            "48.21",
            "--longitude",
            "16.37",
            "--timezone",
            "Europe/Vienna",
            "--interval",
            "5",
            "--save-config",
        ]);
        assert!(args.save_config);

        let inputs = request_inputs(&args, &Config::default()).unwrap();
        save_config(&effective_config(&inputs, true), args.config.as_deref()).unwrap();
        let saved = Config::load_from_path(&path);

        assert_eq!(saved.location.latitude, 48.21);
        assert_eq!(saved.location.timezone.as_deref(), Some("Europe/Vienna"));
        assert_eq!(saved.chart.interval_minutes, 5);
        assert_eq!(saved.chart.ytick_degrees, Config::default().chart.ytick_degrees);
        assert!(saved.export.include_highlight);
    }

    #[test]
    fn test_default_window_is_one_day() {
        let inputs = request_inputs(&args(&[]), &Config::default()).unwrap();
        let request = inputs.into_request().unwrap();
        assert_eq!(request.end - request.start, chrono::Duration::days(1));
    }

    #[test]
    fn test_output_path_for_directory() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = request_inputs(
            &args(&["--start", "2024-01-01 00:00", "--interval", "60"]),
            &Config::default(),
        )
        .unwrap();
        let report = pipeline::run(&inputs.into_request().unwrap(), &SpaSolver::new()).unwrap();

        let path = output_path(dir.path(), &report, Format::Csv);
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "2024-01-01_0000_2024-01-02_0000_60min_35.6895_139.6917_0.0_table.csv"
        );

        let explicit = dir.path().join("out.csv");
        assert_eq!(output_path(&explicit, &report, Format::Csv), explicit);
    }

    #[test]
    fn test_render_formats() {
        let inputs = request_inputs(
            &args(&["--start", "2024-01-01 00:00", "--interval", "30"]),
            &Config::default(),
        )
        .unwrap();
        let report = pipeline::run(&inputs.into_request().unwrap(), &SpaSolver::new()).unwrap();

        let csv = render(&report, Format::Csv, HighlightColumn::Omit).unwrap();
        assert!(csv.starts_with("Time,Solar Elevation Angle\n"));

        let json = render(&report, Format::Json, HighlightColumn::Omit).unwrap();
        let parsed: SolarReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rows.len(), 49);

        let chart = render(&report, Format::Ascii, HighlightColumn::Omit).unwrap();
        assert!(chart.contains("01-02 00:00"));
    }
}
