/// Polygrid Core Library - Geometry-file ingestion
///
/// This library parses polyhedral geometry files (the OFF polyhedron
/// format and legacy VTK ASCII unstructured grids) into in-memory mesh
/// values for downstream rendering code. Parsing is synchronous and
/// whole-file; a parse call either returns a complete result or a single
/// fatal error.

pub mod error;
pub mod geometry;
pub mod lines;
pub mod off;
pub mod topology;
pub mod vtk;

// Re-export commonly used types
pub use error::{ParseError, Result};
pub use geometry::{Face, Geometry, Polyhedron, Vertex};
pub use topology::CellType;

use std::fs;
use std::path::Path;

/// Supported geometry file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Off,
    Vtk,
}

/// Result of loading a geometry file: an OFF file holds a single
/// polyhedron, a VTK file a whole geometry.
#[derive(Debug)]
pub enum LoadedGeometry {
    Polyhedron(Polyhedron),
    Geometry(Geometry),
}

/// Read a geometry file and parse it with the selected format grammar.
pub fn load_file<P: AsRef<Path>>(path: P, format: FileFormat) -> Result<LoadedGeometry> {
    let contents = fs::read_to_string(path)?;
    match format {
        FileFormat::Off => off::parse_str(&contents).map(LoadedGeometry::Polyhedron),
        FileFormat::Vtk => vtk::parse_str(&contents).map(LoadedGeometry::Geometry),
    }
}
