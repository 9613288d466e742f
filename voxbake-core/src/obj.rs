//! Wavefront OBJ reader for vertex and face lists

use nom::{
    character::complete::{char, i64 as integer},
    combinator::{all_consuming, opt, rest},
    number::complete::double,
    sequence::{pair, preceded},
    IResult,
};

use std::path::Path;

use crate::error::{Result, VoxelError};
use crate::geometry::Mesh;

/// Read and parse an OBJ file.
pub fn load_obj(path: &Path) -> Result<Mesh> {
    let source = std::fs::read_to_string(path)?;
    parse_obj(&source)
}

/// Parse OBJ text into a mesh.
///
/// Only `v` and `f` lines are read; every other tag, blank line and
/// `#` comment is skipped. Face indices are converted to 0-based.
pub fn parse_obj(input: &str) -> Result<Mesh> {
    let mut mesh = Mesh::new();

    for (number, raw) in input.lines().enumerate() {
        let line_no = number + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let [x, y, z] = parse_vertex(tokens, line_no)?;
                mesh.add_vertex(x, y, z);
            }
            Some("f") => {
                let indices = tokens
                    .map(|token| parse_face_index(token, mesh.vertices.len(), line_no))
                    .collect::<Result<Vec<_>>>()?;
                mesh.add_face(indices);
            }
            _ => {}
        }
    }

    log::debug!(
        "Parsed OBJ: {} vertices, {} faces",
        mesh.vertices.len(),
        mesh.faces.len()
    );
    Ok(mesh)
}

fn parse_vertex<'a>(tokens: impl Iterator<Item = &'a str>, line_no: usize) -> Result<[f64; 3]> {
    let mut coords = [0.0; 3];
    let mut count = 0;
    for (slot, token) in coords.iter_mut().zip(tokens) {
        *slot = parse_coordinate(token)
            .ok_or_else(|| VoxelError::format(line_no, format!("invalid coordinate {token:?}")))?;
        count += 1;
    }
    if count < 3 {
        return Err(VoxelError::format(
            line_no,
            format!("vertex needs 3 coordinates, found {count}"),
        ));
    }
    Ok(coords)
}

fn parse_coordinate(token: &str) -> Option<f64> {
    all_consuming(double::<_, nom::error::Error<&str>>)(token)
        .ok()
        .map(|(_, value)| value)
        .filter(|value| value.is_finite())
}

/// `index[/texture[/normal]]`, keeping only the vertex index.
fn face_vertex(input: &str) -> IResult<&str, i64> {
    let (input, (index, _)) = pair(integer, opt(preceded(char('/'), rest)))(input)?;
    Ok((input, index))
}

fn parse_face_index(token: &str, vertex_count: usize, line_no: usize) -> Result<usize> {
    let index = all_consuming(face_vertex)(token)
        .map(|(_, index)| index)
        .map_err(|_| VoxelError::format(line_no, format!("invalid face index {token:?}")))?;

    match index {
        0 => Err(VoxelError::format(line_no, "face index 0 is not valid, OBJ indices start at 1")),
        i if i > 0 => Ok(i as usize - 1),
        // Relative reference: -1 is the most recent vertex
        i => {
            let back = i.unsigned_abs() as usize;
            vertex_count.checked_sub(back).ok_or_else(|| {
                VoxelError::format(
                    line_no,
                    format!("relative index {i} reaches before the first vertex"),
                )
            })
        }
    }
}
