//! Grid output: raw binary blob or a generated C header of `set_voxel` calls
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::grid::OccupancyGrid;

/// On-disk representation of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `WN^3` bytes in grid address order
    Binary,
    /// C header with one `set_voxel` statement per occupied cell
    Header,
}

impl OutputFormat {
    /// `.h` files get a header, everything else the binary blob.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("h") => OutputFormat::Header,
            _ => OutputFormat::Binary,
        }
    }
}

pub fn write_binary<W: Write>(grid: &OccupancyGrid, writer: &mut W) -> Result<()> {
    writer.write_all(grid.as_bytes())?;
    Ok(())
}

/// Write a header that rebuilds the grid through `set_voxel` at firmware start.
///
/// `name` becomes the include guard (`NAME_H`) and the loader function
/// (`load_name`); statements follow x-outer, z-middle, y-inner order.
pub fn write_header<W: Write>(grid: &OccupancyGrid, name: &str, writer: &mut W) -> Result<()> {
    let guard = format!("{}_H", name.to_uppercase());
    write!(
        writer,
        "#ifndef {guard}\n#define {guard}\n\n#include \"firmware/firmware.h\"\n\nvoid load_{name}() {{\n"
    )?;
    for cell in grid.occupied_cells() {
        writeln!(
            writer,
            "    set_voxel((v_pos){{ .x = {}, .y = {}, .z = {}}}, 1);",
            cell.x, cell.y, cell.z
        )?;
    }
    write!(writer, "}}\n\n#endif")?;
    Ok(())
}

/// C identifier derived from the output file stem.
pub fn header_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    c_identifier(&stem)
}

/// Replace every character that cannot appear in a C identifier with `_`.
pub fn c_identifier(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Write `grid` to `path`, picking the format from the extension.
pub fn save(grid: &OccupancyGrid, path: &Path) -> Result<OutputFormat> {
    let format = OutputFormat::from_path(path);
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        OutputFormat::Binary => write_binary(grid, &mut writer)?,
        OutputFormat::Header => write_header(grid, &header_name(path), &mut writer)?,
    }
    writer.flush()?;
    log::info!("Wrote {:?} grid to {}", format, path.display());
    Ok(format)
}
