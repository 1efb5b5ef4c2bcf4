/// Offline diagnostic harness: runs the terrain pipeline and prints a JSON
/// summary of the resulting field. Image export is owned by external
/// tooling; this binary only reports statistics.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use talus_core::{TerrainGenerator, TerrainParams};

#[derive(Parser, Debug)]
#[command(name = "talus-test", about = "Terrain pipeline diagnostic runner")]
struct Args {
    /// Working resolution (square grid) before upscaling.
    #[arg(short, long, default_value_t = 128)]
    size: usize,

    /// Seed for both noise synthesis and droplet spawning.
    #[arg(long, default_value_t = 42)]
    seed: i64,

    /// Upscale factor between working and simulation resolution.
    #[arg(short, long, default_value_t = 4)]
    factor: usize,

    /// Number of erosion drops (0 skips erosion).
    #[arg(short, long, default_value_t = 3000)]
    drops: u32,
}

#[derive(Serialize)]
struct Summary {
    width: usize,
    height: usize,
    seed: i64,
    drops: u32,
    min_elevation: f64,
    max_elevation: f64,
    mean_elevation: f64,
    generation_time_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let params = TerrainParams {
        seed: args.seed,
        width: args.size,
        height: args.size,
        upscale_factor: args.factor,
        num_drops: args.drops,
        ..TerrainParams::default()
    };

    let start = std::time::Instant::now();
    let field = TerrainGenerator::new().generate(&params)?;
    let elapsed = start.elapsed().as_millis() as u64;

    let mean = field.data.iter().sum::<f64>() / field.data.len() as f64;
    let summary = Summary {
        width: field.width,
        height: field.height,
        seed: args.seed,
        drops: args.drops,
        min_elevation: field.min_elevation(),
        max_elevation: field.max_elevation(),
        mean_elevation: mean,
        generation_time_ms: elapsed,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
