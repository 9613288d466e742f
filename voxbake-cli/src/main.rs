/// voxbake - OBJ to occupancy grid converter
///
/// Usage:
///   voxbake <N> <WN> <mesh.obj> <ox> <oy> <oz> [output]
///
/// A `.h` output writes a firmware header of `set_voxel` calls, any other
/// path the raw `WN^3` byte grid. Set `RUST_LOG=debug` for details.
use anyhow::Result;
use clap::Parser;
use voxbake_cli::{run, Cli};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    run(&cli)?;
    Ok(())
}
