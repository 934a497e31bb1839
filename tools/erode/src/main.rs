//! Offline harness: builds an island, erodes it in batches and prints a JSON
//! report of what changed.
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use erosion_core::{find_tree_sites, ErosionSummary, GradientType, HeightStats, Island, IslandParams, SiteFilter};

/// Separates the placement stream from the erosion stream.
const TREE_SEED_SALT: u64 = 0x7EE5_0000_0000_0001;

#[derive(Parser, Debug)]
#[command(name = "erode", about = "Generate an island heightmap and run droplet erosion on it")]
struct Args {
    /// JSON file with island parameters; missing fields use defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map cells per side (overrides the config).
    #[arg(long)]
    size: Option<usize>,

    /// Random seed (overrides the config).
    #[arg(long)]
    seed: Option<u64>,

    /// Border shape: square, circle, diamond or star.
    #[arg(long)]
    gradient: Option<GradientType>,

    /// Total droplets to simulate.
    #[arg(short, long, default_value = "10000")]
    droplets: usize,

    /// Droplets per erosion call.
    #[arg(long, default_value = "500")]
    batch: usize,

    /// Tree sites to select after erosion (0 = skip).
    #[arg(long, default_value = "0")]
    trees: usize,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Report {
    params: IslandParams,
    before: HeightStats,
    after: HeightStats,
    erosion: ErosionSummary,
    tree_sites: usize,
    elapsed_ms: u64,
}

fn load_params(args: &Args) -> Result<IslandParams> {
    let mut params = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            IslandParams::from_json(&text)
                .with_context(|| format!("cannot parse config {}", path.display()))?
        }
        None => IslandParams::default(),
    };
    if let Some(size) = args.size {
        params.map_size = size;
    }
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    if let Some(gradient) = args.gradient {
        params.gradient = gradient;
    }
    Ok(params)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.batch == 0 {
        bail!("--batch must be at least 1");
    }

    let params = load_params(&args)?;
    let started = Instant::now();
    let mut island = Island::generate(params).context("island generation failed")?;
    let before = island.stats();

    let mut erosion = ErosionSummary::default();
    let mut remaining = args.droplets;
    while remaining > 0 {
        let n = remaining.min(args.batch);
        let batch = island.erode(n).context("erosion batch failed")?;
        erosion.merge(&batch);
        remaining -= n;
        log::info!("eroded {}/{} droplets", args.droplets - remaining, args.droplets);
    }

    let tree_sites = if args.trees > 0 {
        let mut rng = StdRng::seed_from_u64(island.params().seed ^ TREE_SEED_SALT);
        let sites = find_tree_sites(island.map(), args.trees, &mut rng, &SiteFilter::default());
        log::info!("placed {} of {} trees", sites.len(), args.trees);
        sites.len()
    } else {
        0
    };

    let report = Report {
        params: island.params().clone(),
        before,
        after: island.stats(),
        erosion,
        tree_sites,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
