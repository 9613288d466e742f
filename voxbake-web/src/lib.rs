/// voxbake Web - WASM bindings for in-browser voxelization
///
/// Exposes the OBJ to grid conversion to JavaScript. Grids come back as the
/// same `WN^3` byte layout the command line tool writes to disk.
use voxbake_core::nalgebra::Vector3;
use voxbake_core::{export, voxelize_obj, OccupancyGrid, VoxelizeConfig};
use wasm_bindgen::prelude::*;

fn convert(
    source: &str,
    resolution: u32,
    world_size: u32,
    ox: i32,
    oy: i32,
    oz: i32,
) -> Result<OccupancyGrid, JsValue> {
    let center = Vector3::new(ox as i64, oy as i64, oz as i64);
    let config = VoxelizeConfig::new(resolution as usize, world_size as usize, center)
        .map_err(to_js)?;
    voxelize_obj(source, &config).map_err(to_js)
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Voxelize OBJ text into a raw byte grid
#[wasm_bindgen(js_name = voxelizeObj)]
pub fn voxelize_obj_bytes(
    source: &str,
    resolution: u32,
    world_size: u32,
    ox: i32,
    oy: i32,
    oz: i32,
) -> Result<Vec<u8>, JsValue> {
    convert(source, resolution, world_size, ox, oy, oz).map(OccupancyGrid::into_bytes)
}

/// Voxelize OBJ text into a firmware header loading `load_<name>()`
#[wasm_bindgen(js_name = voxelizeObjHeader)]
pub fn voxelize_obj_header(
    source: &str,
    resolution: u32,
    world_size: u32,
    ox: i32,
    oy: i32,
    oz: i32,
    name: &str,
) -> Result<String, JsValue> {
    let grid = convert(source, resolution, world_size, ox, oy, oz)?;
    let mut out = Vec::new();
    let name = export::c_identifier(name);
    export::write_header(&grid, &name, &mut out).map_err(to_js)?;
    String::from_utf8(out).map_err(to_js)
}
