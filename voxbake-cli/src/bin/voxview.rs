/// voxview - print a binary grid file as a terminal height map
///
/// Usage: voxview <grid.bin> <WN>
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io;
use std::path::PathBuf;
use voxbake_cli::HeightMapRenderer;
use voxbake_core::OccupancyGrid;

#[derive(Parser, Debug)]
#[command(name = "voxview")]
#[command(about = "Show a voxbake binary grid as a top-down height map", long_about = None)]
struct Args {
    /// Binary grid written by voxbake
    grid: PathBuf,

    /// World grid edge length WN the file was written with
    world_size: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let bytes = fs::read(&args.grid)
        .with_context(|| format!("Failed to read grid file {}", args.grid.display()))?;
    let grid = OccupancyGrid::from_bytes(args.world_size, bytes).context("Not a voxbake grid")?;

    println!(
        "{}^3 grid, {} occupied cells",
        grid.world_size(),
        grid.occupied_count()
    );
    HeightMapRenderer::new(&grid).draw(&mut io::stdout())?;
    Ok(())
}
