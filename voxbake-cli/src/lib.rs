/// Terminal front end for voxbake: argument handling, progress and preview
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use nalgebra::Vector3;
use std::io::{self, Write};
use std::path::PathBuf;
use voxbake_core::{
    export, obj, voxelize, voxelize_parallel, voxelize_with, Observer, OccupancyGrid,
    VoxelizeConfig,
};

pub mod renderer;

pub use renderer::HeightMapRenderer;

/// Output path used when none is given
pub const DEFAULT_OUTPUT: &str = "voxel_data.bin";

#[derive(Parser, Debug)]
#[command(name = "voxbake")]
#[command(about = "Voxelize an OBJ mesh into a world occupancy grid", long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Local grid resolution N along the longest mesh axis
    pub resolution: usize,

    /// World grid edge length WN
    pub world_size: usize,

    /// Input OBJ mesh
    pub mesh: PathBuf,

    /// World-grid x of the object center
    pub ox: i64,

    /// World-grid y of the object center
    pub oy: i64,

    /// World-grid z of the object center
    pub oz: i64,

    /// Output file; a `.h` extension writes a C header, anything else raw bytes
    #[arg(default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Spread faces across all cores
    #[arg(long)]
    pub parallel: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Print a top-down height map of the result
    #[arg(long)]
    pub preview: bool,
}

impl Cli {
    pub fn config(&self) -> Result<VoxelizeConfig> {
        let center = Vector3::new(self.ox, self.oy, self.oz);
        VoxelizeConfig::new(self.resolution, self.world_size, center)
            .context("Invalid grid parameters")
    }
}

/// Run one conversion as described by `cli`.
pub fn run(cli: &Cli) -> Result<OccupancyGrid> {
    let config = cli.config()?;
    let mesh = obj::load_obj(&cli.mesh)
        .with_context(|| format!("Failed to load mesh {}", cli.mesh.display()))?;
    println!("Total faces: {}", mesh.faces.len());

    let grid = if cli.parallel {
        voxelize_parallel(&mesh, &config)
    } else if cli.quiet {
        voxelize(&mesh, &config)
    } else {
        let mut progress = ProgressBar::new(io::stderr());
        let result = voxelize_with(&mesh, &config, &mut progress);
        progress.finish();
        result
    }
    .context("Voxelization failed")?;

    export::save(&grid, &cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!(
        "Converted OBJ to voxel grid ({}x{}x{})",
        cli.resolution, cli.resolution, cli.resolution
    );
    println!("World space size: {}", cli.world_size);
    println!("Object center position: ({}, {}, {})", cli.ox, cli.oy, cli.oz);
    println!("Output written to: {}", cli.output.display());

    if cli.preview {
        HeightMapRenderer::new(&grid).draw(&mut io::stdout())?;
    }
    Ok(grid)
}

/// Single-line face progress bar, redrawn in place
pub struct ProgressBar<W: Write> {
    writer: W,
    width: usize,
    last_percent: Option<usize>,
    broken: bool,
}

impl<W: Write> ProgressBar<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            width: 40,
            last_percent: None,
            broken: false,
        }
    }

    fn draw(&mut self, completed: usize, total: usize, percent: usize) -> io::Result<()> {
        let filled = self.width * percent / 100;
        let bar: String = "#".repeat(filled) + &"-".repeat(self.width - filled);
        queue!(
            self.writer,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print("Processing faces "),
            SetForegroundColor(Color::Cyan),
            Print(bar),
            ResetColor,
            Print(format!(" {:>3}% ({}/{})", percent, completed, total))
        )?;
        self.writer.flush()
    }

    /// End the progress line.
    pub fn finish(&mut self) {
        if self.last_percent.is_some() && !self.broken {
            if let Err(e) = writeln!(self.writer).and_then(|_| self.writer.flush()) {
                log::debug!("Progress output disabled: {}", e);
                self.broken = true;
            }
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Observer for ProgressBar<W> {
    fn face_done(&mut self, completed: usize, total: usize) {
        if self.broken || total == 0 {
            return;
        }
        let percent = completed * 100 / total;
        if self.last_percent == Some(percent) {
            return;
        }
        self.last_percent = Some(percent);
        if let Err(e) = self.draw(completed, total, percent) {
            log::debug!("Progress output disabled: {}", e);
            self.broken = true;
        }
    }
}
