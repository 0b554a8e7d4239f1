//! Heightmap probe: cast one segment against a height map file.
//!
//! ```text
//! heightmap-probe <heightmap.json|heightmap.png> <x0 y0 z0> <x1 y1 z1>
//! ```
//!
//! PNG height maps use a cell size of 1. Set `RUST_LOG=debug` to see the
//! configuration and accelerator summaries.

use std::path::Path;
use std::process::ExitCode;

use heightmap_collision::{CollisionConfig, HeightMapData, HeightMapShape, Vec3};

const USAGE: &str = "usage: heightmap-probe <heightmap.json|heightmap.png> <x0 y0 z0> <x1 y1 z1>";

fn parse_point(args: &[String]) -> Result<Vec3, String> {
    let mut coords = [0.0f32; 3];
    for (slot, arg) in coords.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .map_err(|e| format!("invalid coordinate '{arg}': {e}"))?;
    }
    Ok(Vec3::from_array(coords))
}

fn load(path: &Path) -> Result<HeightMapData, String> {
    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    let data = if is_png {
        HeightMapData::load_image(path, 1.0)
    } else {
        HeightMapData::load(path)
    };
    data.map_err(|e| format!("failed to load {}: {e}", path.display()))
}

fn run(args: &[String]) -> Result<(), String> {
    if args.len() != 7 {
        return Err(USAGE.to_string());
    }

    let data = load(Path::new(&args[0]))?;
    let begin = parse_point(&args[1..4])?;
    let end = parse_point(&args[4..7])?;

    let shape = HeightMapShape::from_data(data, CollisionConfig::default())
        .map_err(|e| format!("invalid height map: {e}"))?;

    let aabb = shape.aabb();
    println!("Bounds: {:?} .. {:?}", aabb.min, aabb.max);
    let (grid_width, grid_depth) = shape.chunk_grid_size();
    if shape.accelerator().is_empty() {
        println!("Chunks: none (field fits in a single chunk)");
    } else {
        println!(
            "Chunks: {grid_width}x{grid_depth} of {} cells",
            shape.chunk_cells()
        );
    }
    println!();

    match shape.intersect_segment(begin, end) {
        Some(hit) => {
            println!("Hit at {:?}", hit.position);
            println!("  normal   {:?}", hit.normal);
            println!("  fraction {:.5}", hit.fraction);
        }
        None => println!("no hit"),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    println!("=== Heightmap Probe ===");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
