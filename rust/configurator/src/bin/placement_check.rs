// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: validate (and optionally repair) the openings of a scene file.
//!
//! Usage:
//!   placement-check <scene.json> [options]

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use ifc_lite_configurator::{Scene, SceneReport, SessionConfig};
use ifc_lite_placement::SpanId;
use tracing_subscriber::EnvFilter;

struct Options {
    scene_path: PathBuf,
    config_path: Option<PathBuf>,
    correct: bool,
    distribute: Option<SpanId>,
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let options = parse_options(&args)?;
    init_logging(options.json_logs);

    let config = match &options.config_path {
        Some(path) => SessionConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::from_env().context("loading config from environment")?,
    };

    let scene = Scene::from_path(&options.scene_path)
        .with_context(|| format!("loading scene {}", options.scene_path.display()))?;

    tracing::info!(
        scene = %options.scene_path.display(),
        items = scene.items.len(),
        correct = options.correct,
        "checking scene"
    );

    let mut session = scene.into_session(config);

    let distribution = match &options.distribute {
        Some(span) => Some(
            session
                .distribute(span)
                .with_context(|| format!("distributing span {span}"))?,
        ),
        None => None,
    };

    let correction = options.correct.then(|| session.auto_correct());

    let mut report = SceneReport::from_session(&session);
    report.correction = correction;
    report.distribution = distribution;

    if report.advisory.is_valid() {
        tracing::info!("all openings valid");
    } else {
        for (id, violation) in &report.advisory.invalid_by_id {
            tracing::warn!(item = %id, %violation, "invalid placement");
        }
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_options(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options {
        scene_path: PathBuf::from(&args[1]),
        config_path: None,
        correct: false,
        distribute: None,
        json_logs: false,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    bail!("--config needs a path");
                };
                options.config_path = Some(PathBuf::from(path));
            }
            "--distribute" => {
                i += 1;
                let Some(span) = args.get(i) else {
                    bail!("--distribute needs a span id");
                };
                options.distribute = Some(SpanId::new(span.as_str()));
            }
            "--correct" => {
                options.correct = true;
            }
            "--json-logs" => {
                options.json_logs = true;
            }
            other => {
                print_usage();
                bail!("unknown option: {other}");
            }
        }
        i += 1;
    }

    Ok(options)
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ifc_lite_placement=debug"));

    // Logs go to stderr so stdout stays pure JSON.
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_usage() {
    eprintln!(
        "placement-check - validate door, window and skylight placement in a scene

Usage:
  placement-check <scene.json> [options]

Options:
  --config <path>       Session config JSON (default: PLACEMENT_CONFIG or built-in)
  --correct             Run the auto-corrector before reporting
  --distribute <span>   Distribute the items of <span> evenly before reporting
  --json-logs           Emit logs as JSON on stderr

The report (spans, items, advisory violations) is written to stdout as JSON."
    );
}
