//! Print a structural summary of one map file.
//!
//! Run: `cargo run -p romap --features tools --bin inspect -- <file.rsw|file.gnd>`

use std::path::Path;
use std::process::ExitCode;

use romap_decode::{decode_ground, decode_world};

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: inspect <file.rsw|file.gnd>");
        return ExitCode::FAILURE;
    };

    let data = match std::fs::read(&path) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("failed to read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let extension = Path::new(&path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());

    let result = match extension.as_deref() {
        Some("rsw") => inspect_world(&data),
        Some("gnd") => inspect_ground(&data),
        _ => {
            eprintln!("unsupported file type (expected .rsw or .gnd): {path}");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("unsupported or corrupt file: {err}");
            ExitCode::FAILURE
        }
    }
}

fn inspect_world(data: &[u8]) -> Result<(), romap_decode::DecodeError> {
    let world = decode_world(data)?;
    println!("world descriptor, version {}", world.version);
    println!("  ini: {}", world.files.ini);
    println!("  gnd: {}", world.files.gnd);
    println!("  gat: {}", world.files.gat);
    if !world.files.src.is_empty() {
        println!("  src: {}", world.files.src);
    }
    println!(
        "  water: level {:.2}, type {}, wave height {:.2}",
        world.water.level, world.water.kind, world.water.wave_height
    );
    println!(
        "  light: longitude {}, latitude {}, opacity {:.2}",
        world.light.longitude, world.light.latitude, world.light.opacity
    );
    println!(
        "  bounds: top {} bottom {} left {} right {}",
        world.ground.top, world.ground.bottom, world.ground.left, world.ground.right
    );
    println!(
        "  objects: {} models, {} lights, {} sounds, {} effects",
        world.models.len(),
        world.lights.len(),
        world.sounds.len(),
        world.effects.len()
    );
    Ok(())
}

fn inspect_ground(data: &[u8]) -> Result<(), romap_decode::DecodeError> {
    let ground = decode_ground(data)?;
    println!("ground mesh, version {}", ground.version);
    println!(
        "  grid: {}x{} surfaces, zoom {:.1}",
        ground.width, ground.height, ground.zoom
    );
    println!(
        "  textures: {} unique of {} slots",
        ground.textures.len(),
        ground.texture_indices.len()
    );
    println!(
        "  lightmap: {} cells, {} bytes per cell",
        ground.lightmap.count, ground.lightmap.per_cell
    );
    println!("  tiles: {}", ground.tiles.len());
    Ok(())
}
