/// Example: Load a geometry file and print a summary of its contents
///
/// Usage: cargo run --example load_geometry -- path/to/file.off
///        cargo run --example load_geometry -- path/to/file.vtk

use std::env;
use std::io;
use std::path::Path;

use polygrid_core::{load_file, FileFormat, LoadedGeometry};

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <geometry-file>", args[0]);
        eprintln!("\nSupported extensions: .off, .vtk");
        return Ok(());
    }

    let path = Path::new(&args[1]);

    // Pick the grammar from the file extension
    let format = match path.extension().and_then(|ext| ext.to_str()) {
        Some("off") => FileFormat::Off,
        Some("vtk") => FileFormat::Vtk,
        other => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unrecognized geometry extension: {:?}", other),
            ))
        }
    };

    println!("Loading geometry file: {}", path.display());

    let loaded = load_file(path, format).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse: {}", e))
    })?;

    match loaded {
        LoadedGeometry::Polyhedron(poly) => {
            println!(
                "Loaded polyhedron: {} vertices, {} faces",
                poly.vertices.len(),
                poly.faces.len()
            );
        }
        LoadedGeometry::Geometry(geometry) => {
            println!("Loaded geometry with {} polyhedrons:", geometry.len());
            for ((id, poly), name) in geometry.iter().zip(geometry.names()) {
                println!(
                    "  #{} {}: {} vertices, {} faces",
                    id,
                    name,
                    poly.vertices.len(),
                    poly.faces.len()
                );
            }
        }
    }

    Ok(())
}
