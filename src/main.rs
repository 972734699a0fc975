use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use bluezone_planner::config::PlannerConfig;
use bluezone_planner::report::{self, MapSummary, ReportOptions};
use bluezone_planner::zone::geometry::{area, radius};
use bluezone_planner::zone::{Catalog, Map, Rebalance, ReferencePoint, Timeline};

#[derive(Parser, Debug)]
#[command(name = "bluezone", author, version, about = "Blue zone timelines and shrink rebalancing")]
struct Cli {
    /// JSON map catalog (defaults to BLUEZONE_CATALOG or the built-in maps)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog maps
    Maps,
    /// Print a map's breakpoints, or its zone at the given times
    Timeline {
        map: String,
        /// Query times in seconds
        #[arg(long = "at", num_args = 1..)]
        at: Vec<f64>,
    },
    /// Shrink multiplier that keeps area per player for a new player count
    Rebalance {
        map: String,
        #[arg(long)]
        players: u32,
        /// phase0 (map start) or phase1 (after first shrink); both if omitted
        #[arg(long)]
        reference: Option<ReferencePoint>,
    },
    /// Radius and area-per-player series for charting
    Report {
        /// Time axis step in seconds
        #[arg(long)]
        step: Option<f64>,
        /// Restrict to these maps
        #[arg(long = "map")]
        maps: Vec<String>,
        #[arg(long)]
        no_zones: bool,
        #[arg(long)]
        no_area: bool,
    },
}

#[derive(Debug, Serialize)]
struct ZoneSample {
    time: f64,
    size: f64,
    radius: f64,
    area: f64,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = PlannerConfig::load_or_default();
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path);
    }
    if let Command::Report { step: Some(step), .. } = &cli.command {
        config.sample_step = *step;
    }
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::builtin(),
    };
    info!("Catalog ready: {} maps", catalog.len());

    match cli.command {
        Command::Maps => {
            let summaries = catalog
                .iter()
                .map(MapSummary::for_map)
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&summaries)?;
        }
        Command::Timeline { map, at } => {
            let map = catalog.find(&map)?;
            let timeline = Timeline::for_map(map)?;
            if at.is_empty() {
                print_json(&timeline)?;
            } else {
                let sizes = timeline.sample_many_with_threshold(&at, config.parallel_threshold);
                let samples = at
                    .iter()
                    .zip(sizes)
                    .map(|(&time, size)| {
                        Ok(ZoneSample {
                            time,
                            size,
                            radius: radius(size)?,
                            area: area(size)?,
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                print_json(&samples)?;
            }
        }
        Command::Rebalance {
            map,
            players,
            reference,
        } => {
            let map = catalog.find(&map)?;
            let references = match reference {
                Some(reference) => vec![reference],
                None => ReferencePoint::ALL.to_vec(),
            };
            let records = references
                .into_iter()
                .map(|reference| Rebalance::compute(map, players, reference))
                .collect::<Result<Vec<_>, _>>()?;
            for record in &records {
                info!(
                    "{} {} -> {} players ({}): shrink {:.6}",
                    record.map, record.original_players, record.new_players, record.reference, record.required_shrink
                );
            }
            print_json(&records)?;
        }
        Command::Report {
            maps,
            no_zones,
            no_area,
            ..
        } => {
            let selected: Vec<Map> = if maps.is_empty() {
                catalog.maps().to_vec()
            } else {
                maps.iter()
                    .map(|name| catalog.find(name).cloned())
                    .collect::<Result<_, _>>()?
            };
            let options = ReportOptions {
                step: config.sample_step,
                include_zones: !no_zones,
                include_area_per_player: !no_area,
                parallel_threshold: config.parallel_threshold,
            };
            let report = report::build(&selected, &options)?;
            print_json(&report)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).context("Failed to write output")?;
    writeln!(out)?;
    Ok(())
}
