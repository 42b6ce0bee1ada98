use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::math::Vec2;
use markers::MarkerType;
use scene::terrain::{Heightfield, Terrain};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use viewer::headless::HeadlessProvider;
use viewer::{ClickOutcome, Container, HomeView, PickStrategy, SiteViewer, ViewerConfig};

/// Tiles reported pending when the headless scene starts streaming.
const INITIAL_PENDING_TILES: usize = 16;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless site viewer: place markers on terrain from the command line")]
struct Args {
    /// JSON config file (defaults apply to missing fields)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Terrain access token (overrides config and SITE_VIEWER_ACCESS_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Pick strategy: auto, depth or ellipsoid
    #[arg(long)]
    strategy: Option<PickStrategy>,

    /// Use the bare ellipsoid instead of the synthetic heightfield
    #[arg(long)]
    flat: bool,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place one marker per --at click
    Place {
        /// building, road, utility or measurement
        #[arg(long)]
        kind: MarkerType,

        /// Custom label (defaults to "<type> <ordinal>")
        #[arg(long, default_value = "")]
        label: String,

        /// Click position in viewport pixels, X,Y
        #[arg(long = "at", value_parser = parse_point, required = true)]
        at: Vec<(f64, f64)>,

        /// Clear all markers after placing
        #[arg(long)]
        clear: bool,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Serialize)]
struct Report {
    ready: bool,
    missed: usize,
    markers: Vec<MarkerReport>,
}

#[derive(Serialize)]
struct MarkerReport {
    id: String,
    #[serde(rename = "type")]
    kind: MarkerType,
    label: String,
    lon: f64,
    lat: f64,
    height: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => {
            let mut config = ViewerConfig::from_path(path)?;
            if config.access_token.is_empty() {
                config.access_token = ViewerConfig::from_env().access_token;
            }
            config
        }
        None => ViewerConfig::from_env(),
    };
    if let Some(token) = &args.token {
        config.access_token = token.clone();
    }
    if let Some(strategy) = args.strategy {
        config.pick_strategy = strategy;
    }

    match args.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Place {
            kind,
            label,
            at,
            clear,
        } => {
            let terrain = if args.flat {
                Terrain::ellipsoid()
            } else {
                synthetic_terrain(&config.home_view)
            };
            let container = Container::new("site-viewer", args.width, args.height);
            let report = run_placement(config, terrain, &container, kind, &label, &at, clear);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn run_placement(
    config: ViewerConfig,
    terrain: Terrain,
    container: &Container,
    kind: MarkerType,
    label: &str,
    clicks: &[(f64, f64)],
    clear: bool,
) -> Report {
    let token = config.access_token.clone();
    let viewer = SiteViewer::new(HeadlessProvider::new(terrain), config);
    pollster::block_on(viewer.initialize(container, &token));

    for pending in (0..=INITIAL_PENDING_TILES).rev() {
        viewer.on_tile_progress(pending);
    }
    let ready = viewer.is_ready();
    if !ready {
        warn!("viewer never became ready; no markers will be placed");
    }

    let mut missed = 0;
    for &(x, y) in clicks {
        viewer.begin_placement(kind, label);
        match viewer.on_left_click(Vec2::new(x, y)) {
            ClickOutcome::Placed(marker) => info!(id = %marker.id, label = %marker.label, "placed"),
            ClickOutcome::Missed(miss) => {
                missed += 1;
                info!(x, y, %miss, "missed");
            }
            ClickOutcome::PassedThrough => {}
        }
    }
    if clear {
        let removed = viewer.clear_markers();
        info!(removed, "cleared");
    }

    let markers = viewer
        .markers()
        .into_iter()
        .map(|marker| {
            let geo = marker.geodetic();
            MarkerReport {
                id: marker.id.to_string(),
                kind: marker.kind,
                label: marker.label,
                lon: geo.lon_deg(),
                lat: geo.lat_deg(),
                height: geo.alt_m,
            }
        })
        .collect();
    viewer.unmount();

    Report {
        ready,
        missed,
        markers,
    }
}

/// Rolling hills around the home view.
fn synthetic_terrain(home: &HomeView) -> Terrain {
    let span = 0.25;
    let bounds = [
        home.lon_deg - span,
        home.lat_deg - span,
        home.lon_deg + span,
        home.lat_deg + span,
    ];
    let heightfield = Heightfield::from_fn(bounds, 65, 65, |lon, lat| {
        let u = (lon - home.lon_deg) * 40.0;
        let v = (lat - home.lat_deg) * 40.0;
        (90.0 + 35.0 * u.sin() * v.cos()) as f32
    });
    Terrain::with_heightfield(heightfield)
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok((x, y))
}
