/// Cell topology table for the supported VTK cell types
use crate::geometry::Face;

const TRIANGLE_FACES: [Face; 1] = [Face::Triangle([0, 1, 2])];
const QUAD_FACES: [Face; 1] = [Face::Quad([0, 1, 2, 3])];
const TETRA_FACES: [Face; 4] = [
    Face::Triangle([0, 1, 2]),
    Face::Triangle([0, 3, 1]),
    Face::Triangle([0, 2, 3]),
    Face::Triangle([1, 3, 2]),
];
const VOXEL_FACES: [Face; 6] = [
    Face::Quad([0, 1, 3, 2]),
    Face::Quad([1, 3, 7, 5]),
    Face::Quad([5, 7, 6, 4]),
    Face::Quad([4, 0, 2, 6]),
    Face::Quad([6, 2, 3, 7]),
    Face::Quad([0, 1, 5, 4]),
];

/// The cell types of the legacy VTK unstructured-grid format that can be
/// reconstructed into polyhedra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    Triangle,
    Quad,
    Pixel,
    Tetra,
    Voxel,
}

impl CellType {
    /// Map a VTK integer type tag to a cell type. Unsupported tags map to
    /// `None`.
    pub fn from_tag(tag: usize) -> Option<Self> {
        match tag {
            5 => Some(CellType::Triangle),
            8 => Some(CellType::Pixel),
            9 => Some(CellType::Quad),
            10 => Some(CellType::Tetra),
            11 => Some(CellType::Voxel),
            _ => None,
        }
    }

    /// The VTK integer type tag of this cell type.
    pub fn tag(&self) -> usize {
        match self {
            CellType::Triangle => 5,
            CellType::Pixel => 8,
            CellType::Quad => 9,
            CellType::Tetra => 10,
            CellType::Voxel => 11,
        }
    }

    /// Number of points a cell of this type consumes.
    pub fn vertex_count(&self) -> usize {
        match self {
            CellType::Triangle => 3,
            CellType::Quad | CellType::Pixel | CellType::Tetra => 4,
            CellType::Voxel => 8,
        }
    }

    /// The boundary faces of this cell type, as cell-local vertex indices.
    pub fn faces(&self) -> &'static [Face] {
        match self {
            CellType::Triangle => &TRIANGLE_FACES,
            CellType::Quad | CellType::Pixel => &QUAD_FACES,
            CellType::Tetra => &TETRA_FACES,
            CellType::Voxel => &VOXEL_FACES,
        }
    }

    /// Prefix used when synthesizing a polyhedron name for a cell.
    pub fn name_prefix(&self) -> &'static str {
        match self {
            CellType::Triangle => "Triang",
            CellType::Quad => "Quad",
            CellType::Pixel => "Pixel",
            CellType::Tetra => "Tetra",
            CellType::Voxel => "Voxel",
        }
    }
}
