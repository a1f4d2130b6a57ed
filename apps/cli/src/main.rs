// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: check whether a delta printer's rods would hit a part while
//! printing it
//!
//! Usage:
//!   rodclash <model.stl> <pivots.cfg> [options]
//!
//! Exit status is 0 when the print is clear, 1 on a collision and 2 when the
//! model or pivot file cannot be used.

use anyhow::{anyhow, bail, Context};
use rodclash_engine::{grounded, load_mesh, load_pivots, simulate, AnchorMode, CollisionReport};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

mod config;

use config::Config;

#[derive(Debug, Clone, PartialEq)]
struct Options {
    model: PathBuf,
    pivots: PathBuf,
    layer_height: f64,
    calibration_offset: f64,
    mode: AnchorMode,
    ground: bool,
    json: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(Options),
    Help,
}

fn print_usage() {
    eprintln!("Usage: rodclash <model.stl> <pivots.cfg> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --layer-height MM        Layer height (default: $RODCLASH_LAYER_HEIGHT or 0.2)");
    eprintln!("  --alternate-anchors      Anchors move up with each layer");
    eprintln!("  --calibration-offset MM  Shift anchors inward (default: $RODCLASH_CALIBRATION_OFFSET or 0)");
    eprintln!("  --ground                 Drop the model onto the bed first");
    eprintln!("  --json                   Print the full report as JSON");
    eprintln!("  -h, --help               Show this help");
    eprintln!();
    eprintln!("Exit status: 0 clear, 1 collision, 2 error. Log level via RUST_LOG.");
}

fn millimetres(flag: &str, value: Option<&String>) -> anyhow::Result<f64> {
    let value = value.ok_or_else(|| anyhow!("{flag} needs a value"))?;
    let mm: f64 = value
        .parse()
        .with_context(|| format!("invalid {flag} value: {value}"))?;
    if !mm.is_finite() {
        bail!("invalid {flag} value: {value}");
    }
    Ok(mm)
}

fn parse_args(args: &[String], defaults: &Config) -> anyhow::Result<Command> {
    let mut positional = Vec::new();
    let mut layer_height = defaults.layer_height;
    let mut calibration_offset = defaults.calibration_offset;
    let mut mode = AnchorMode::Fixed;
    let mut ground = false;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--layer-height" => {
                i += 1;
                layer_height = millimetres("--layer-height", args.get(i))?;
            }
            "--calibration-offset" => {
                i += 1;
                calibration_offset = millimetres("--calibration-offset", args.get(i))?;
            }
            "--alternate-anchors" => mode = AnchorMode::FollowLayer,
            "--ground" => ground = true,
            "--json" => json = true,
            other if other.starts_with("--") => bail!("unknown option: {other}"),
            other => positional.push(PathBuf::from(other)),
        }
        i += 1;
    }

    let [model, pivots]: [PathBuf; 2] = positional
        .try_into()
        .map_err(|_| anyhow!("expected a model file and a pivot file"))?;

    Ok(Command::Run(Options {
        model,
        pivots,
        layer_height,
        calibration_offset,
        mode,
        ground,
        json,
    }))
}

fn run(options: &Options) -> anyhow::Result<CollisionReport> {
    let pivots = load_pivots(&options.pivots)
        .with_context(|| format!("loading pivots from {}", options.pivots.display()))?
        .with_calibration_offset(options.calibration_offset);

    let mut mesh = load_mesh(&options.model)
        .with_context(|| format!("loading model {}", options.model.display()))?;
    if options.ground {
        mesh = grounded(&mesh);
    }

    let report = simulate(&mesh, &pivots, options.layer_height, options.mode)?;
    Ok(report)
}

fn summary(report: &CollisionReport) -> String {
    match (report.height, report.column) {
        (Some(height), Some(column)) if report.collided => format!(
            "COLLISION at z = {height:.3} mm: column {column} (after {} layers)",
            report.layers_checked
        ),
        _ => format!("clear: no collision in {} layers", report.layers_checked),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_args(&args, &config) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            print_usage();
            return ExitCode::from(2);
        }
    };

    tracing::info!(
        model = %options.model.display(),
        pivots = %options.pivots.display(),
        layer_height = options.layer_height,
        calibration_offset = options.calibration_offset,
        mode = ?options.mode,
        "Starting collision check"
    );

    let report = match run(&options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    if options.json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(2);
            }
        }
    } else {
        println!("{}", summary(&report));
    }

    if report.collided {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
