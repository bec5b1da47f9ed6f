/// Parser for the legacy VTK ASCII unstructured-grid format
use std::fs;
use std::path::Path;

use nom::{
    bytes::complete::tag,
    character::complete::{alpha1, digit1, multispace1},
    combinator::map_res,
    sequence::tuple,
    IResult,
};

use crate::error::{ParseError, Result};
use crate::geometry::{Geometry, Polyhedron, Vertex};
use crate::lines::LineCursor;
use crate::topology::CellType;

const HEADER_V2: &str = "# vtk DataFile Version 2.0";
const HEADER_V3: &str = "# vtk DataFile Version 3.0";

/// Parse progress through the blocks of an unstructured-grid file. Each
/// significant line is consumed by exactly one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectTitle,
    ExpectFormat,
    ExpectDataset,
    ExpectPointsDecl,
    ReadingPoints,
    ExpectCellsDecl,
    ReadingCells,
    ExpectTypesDecl,
    ReadingTypes,
    Done,
}

impl State {
    fn context(&self) -> &'static str {
        match self {
            State::ExpectTitle => "reading the title line",
            State::ExpectFormat => "reading the format marker",
            State::ExpectDataset => "reading the dataset kind",
            State::ExpectPointsDecl => "reading the POINTS declaration",
            State::ReadingPoints => "reading point coordinates",
            State::ExpectCellsDecl => "reading the CELLS declaration",
            State::ReadingCells => "reading cells",
            State::ExpectTypesDecl => "reading the CELL_TYPES declaration",
            State::ReadingTypes => "reading cell types",
            State::Done => "done",
        }
    }
}

/// A cell as read from the CELLS block: global point indices plus the
/// line it came from, kept for diagnostics. The cell type arrives later,
/// from the CELL_TYPES block.
struct RawCell {
    point_ids: Vec<usize>,
    line: usize,
}

/// Read and parse a VTK file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Geometry> {
    let contents = fs::read_to_string(path)?;
    parse_str(&contents)
}

/// Parse VTK file contents into a geometry, one polyhedron per cell.
///
/// Accepts version 2.0 and 3.0 ASCII unstructured grids. Any grammar
/// violation aborts the parse; no partial geometry is ever returned.
pub fn parse_str(input: &str) -> Result<Geometry> {
    let mut cursor = LineCursor::new(input);

    let (line, header) = cursor.next_raw().ok_or(ParseError::UnexpectedEof {
        context: "reading the version header",
    })?;
    if header != HEADER_V2 && header != HEADER_V3 {
        return Err(ParseError::MalformedHeader {
            line,
            expected: "a version 2.0 or 3.0 VTK DataFile header",
            found: header.to_string(),
        });
    }

    let mut state = State::ExpectTitle;
    let mut point_count = 0;
    let mut cell_count = 0;
    let mut points: Vec<Vertex> = Vec::new();
    let mut cells: Vec<RawCell> = Vec::new();
    let mut types: Vec<CellType> = Vec::new();

    while let Some((line, text)) = cursor.next_significant() {
        state = match state {
            // The title line carries arbitrary content.
            State::ExpectTitle => State::ExpectFormat,

            State::ExpectFormat => {
                if text != "ASCII" {
                    return Err(ParseError::MalformedHeader {
                        line,
                        expected: "ASCII",
                        found: text.to_string(),
                    });
                }
                State::ExpectDataset
            }

            State::ExpectDataset => {
                if text != "DATASET UNSTRUCTURED_GRID" {
                    return Err(ParseError::MalformedHeader {
                        line,
                        expected: "DATASET UNSTRUCTURED_GRID",
                        found: text.to_string(),
                    });
                }
                State::ExpectPointsDecl
            }

            State::ExpectPointsDecl => {
                point_count =
                    points_decl(text).ok_or(ParseError::MalformedDeclaration {
                        line,
                        what: "POINTS",
                    })?;
                points.reserve(point_count);
                if point_count == 0 {
                    State::ExpectCellsDecl
                } else {
                    State::ReadingPoints
                }
            }

            State::ReadingPoints => {
                points.push(point_line(line, text)?);
                if points.len() == point_count {
                    State::ExpectCellsDecl
                } else {
                    State::ReadingPoints
                }
            }

            State::ExpectCellsDecl => {
                cell_count = cells_decl(text).ok_or(ParseError::MalformedDeclaration {
                    line,
                    what: "CELLS",
                })?;
                cells.reserve(cell_count);
                if cell_count == 0 {
                    State::ExpectTypesDecl
                } else {
                    State::ReadingCells
                }
            }

            State::ReadingCells => {
                cells.push(cell_line(line, text)?);
                if cells.len() == cell_count {
                    State::ExpectTypesDecl
                } else {
                    State::ReadingCells
                }
            }

            State::ExpectTypesDecl => {
                // The declared count is positionally required but not
                // cross-checked against the CELLS count.
                cell_types_decl(text).ok_or(ParseError::MalformedDeclaration {
                    line,
                    what: "CELL_TYPES",
                })?;
                if cell_count == 0 {
                    State::Done
                } else {
                    State::ReadingTypes
                }
            }

            State::ReadingTypes => {
                types.push(type_line(line, text)?);
                if types.len() == cell_count {
                    State::Done
                } else {
                    State::ReadingTypes
                }
            }

            State::Done => {
                return Err(ParseError::MalformedRecord {
                    line,
                    what: format!("unexpected content after the CELL_TYPES block: {text:?}"),
                });
            }
        };
    }

    if state != State::Done {
        return Err(ParseError::UnexpectedEof {
            context: state.context(),
        });
    }

    build_geometry(&points, cells, types)
}

/// Unsigned decimal integer.
fn count(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(input)
}

/// `POINTS <n> <type>`. The data-type token is required but unused, and
/// trailing content is tolerated.
fn points_decl(line: &str) -> Option<usize> {
    let result: IResult<&str, (&str, &str, usize, &str, &str)> =
        tuple((tag("POINTS"), multispace1, count, multispace1, alpha1))(line);

    result.ok().map(|(_, (_, _, n, _, _))| n)
}

/// `CELLS <m>`. The total-size field of full legacy files is never
/// consumed, so `CELLS m size` matches as well.
fn cells_decl(line: &str) -> Option<usize> {
    let result: IResult<&str, (&str, &str, usize)> =
        tuple((tag("CELLS"), multispace1, count))(line);

    result.ok().map(|(_, (_, _, n))| n)
}

/// `CELL_TYPES <m>`.
fn cell_types_decl(line: &str) -> Option<usize> {
    let result: IResult<&str, (&str, &str, usize)> =
        tuple((tag("CELL_TYPES"), multispace1, count))(line);

    result.ok().map(|(_, (_, _, n))| n)
}

/// A point line: whitespace-separated coordinates, exactly three per
/// line. Token syntax is whatever `f64::from_str` accepts.
fn point_line(line: usize, text: &str) -> Result<Vertex> {
    let coords: Vec<f64> = text
        .split_whitespace()
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| ParseError::MalformedRecord {
            line,
            what: format!("invalid point coordinates {text:?}"),
        })?;

    match coords[..] {
        [x, y, z] => Ok(Vertex::new(x, y, z)),
        _ => Err(ParseError::MalformedRecord {
            line,
            what: format!("expected three coordinates per point, found {}", coords.len()),
        }),
    }
}

/// All maximal digit runs in a line, as integers. Cell and type records
/// are scanned this way, so any non-digit separator is accepted.
fn digit_runs(line: usize, text: &str) -> Result<Vec<usize>> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| {
            run.parse().map_err(|_| ParseError::MalformedRecord {
                line,
                what: format!("integer {run:?} out of range"),
            })
        })
        .collect()
}

/// A cell record: the per-cell point count followed by exactly that many
/// global point indices.
fn cell_line(line: usize, text: &str) -> Result<RawCell> {
    let runs = digit_runs(line, text)?;
    let (&declared, point_ids) =
        runs.split_first().ok_or_else(|| ParseError::MalformedRecord {
            line,
            what: format!("expected cell indices, found {text:?}"),
        })?;

    if point_ids.len() != declared {
        return Err(ParseError::MalformedRecord {
            line,
            what: format!("cell declares {declared} points but lists {}", point_ids.len()),
        });
    }

    Ok(RawCell {
        point_ids: point_ids.to_vec(),
        line,
    })
}

/// A type record: the first integer on the line is the type tag.
fn type_line(line: usize, text: &str) -> Result<CellType> {
    let runs = digit_runs(line, text)?;
    let &tag = runs.first().ok_or_else(|| ParseError::MalformedRecord {
        line,
        what: format!("expected a cell type tag, found {text:?}"),
    })?;

    CellType::from_tag(tag).ok_or(ParseError::UnsupportedCellType { line, tag })
}

/// Reconstruct one polyhedron per typed cell, in file order, and register
/// them under sequential IDs starting at 1.
fn build_geometry(points: &[Vertex], cells: Vec<RawCell>, types: Vec<CellType>) -> Result<Geometry> {
    let mut geometry = Geometry::new();
    let mut next_id = 1u32;

    for (cell, cell_type) in cells.into_iter().zip(types) {
        if cell.point_ids.len() != cell_type.vertex_count() {
            return Err(ParseError::MalformedRecord {
                line: cell.line,
                what: format!(
                    "{} cell expects {} points, found {}",
                    cell_type.name_prefix(),
                    cell_type.vertex_count(),
                    cell.point_ids.len()
                ),
            });
        }

        // Renumber: the cell's global point indices become the local
        // vertex table of its polyhedron, in cell order.
        let mut vertices = Vec::with_capacity(cell.point_ids.len());
        for &id in &cell.point_ids {
            let vertex = points.get(id).ok_or_else(|| ParseError::MalformedRecord {
                line: cell.line,
                what: format!("point index {id} out of range ({} points)", points.len()),
            })?;
            vertices.push(*vertex);
        }

        let name = cell_name(cell_type, &cell.point_ids);
        let polyhedron = Polyhedron::new(vertices, cell_type.faces().to_vec());
        geometry.add(polyhedron, name, next_id)?;
        next_id += 1;
    }

    Ok(geometry)
}

/// Registry name for a cell: its type prefix joined with the global point
/// indices it references, e.g. `Tetra-4-9-2-7`.
fn cell_name(cell_type: CellType, point_ids: &[usize]) -> String {
    let mut name = cell_type.name_prefix().to_string();
    for id in point_ids {
        name.push('-');
        name.push_str(&id.to_string());
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Face;
    use approx::assert_relative_eq;

    const TETRA_FILE: &str = "\
# vtk DataFile Version 2.0
Single tetrahedron
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 4 float
0 0 0
1 0 0
0 1 0
0 0 1
CELLS 1 5
4 0 1 2 3
CELL_TYPES 1
10
";

    #[test]
    fn test_parse_single_tetrahedron() {
        let geometry = parse_str(TETRA_FILE).unwrap();

        assert_eq!(geometry.len(), 1);
        let poly = geometry.get_by_name("Tetra-0-1-2-3").unwrap();
        assert_eq!(poly.vertices.len(), 4);
        assert_eq!(poly.faces.len(), 4);
        assert_eq!(poly.faces[1], Face::Triangle([0, 3, 1]));
        assert_relative_eq!(poly.vertices[3].z, 1.0);
        assert!(geometry.get_by_id(1).is_some());
    }

    #[test]
    fn test_version_3_header_accepted() {
        let input = TETRA_FILE.replace("Version 2.0", "Version 3.0");
        assert!(parse_str(&input).is_ok());
    }

    #[test]
    fn test_wrong_version_header() {
        let input = TETRA_FILE.replace("Version 2.0", "Version 4.2");
        let err = parse_str(&input).unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_binary_input_rejected() {
        let input = TETRA_FILE.replace("ASCII", "BINARY");
        let err = parse_str(&input).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedHeader {
                line: 3,
                expected: "ASCII",
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_dataset_kind() {
        let input = TETRA_FILE.replace("UNSTRUCTURED_GRID", "STRUCTURED_POINTS");
        let err = parse_str(&input).unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { line: 4, .. }));
    }

    #[test]
    fn test_voxel_cell() {
        let input = "\
# vtk DataFile Version 2.0
Unit voxel
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 8 float
0 0 0
1 0 0
0 1 0
1 1 0
0 0 1
1 0 1
0 1 1
1 1 1
CELLS 1 9
8 0 1 2 3 4 5 6 7
CELL_TYPES 1
11
";
        let geometry = parse_str(input).unwrap();
        let poly = geometry.get_by_name("Voxel-0-1-2-3-4-5-6-7").unwrap();
        assert_eq!(poly.vertices.len(), 8);
        assert_eq!(poly.faces.len(), 6);
        assert!(poly.faces.iter().all(|face| face.arity() == 4));
        assert_eq!(poly.faces[0], Face::Quad([0, 1, 3, 2]));
    }

    #[test]
    fn test_mixed_cells_keep_file_order() {
        let input = "\
# vtk DataFile Version 2.0
Mixed cells
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 5 float
0 0 0
1 0 0
0 1 0
1 1 0
0 0 1
CELLS 3 13
3 0 1 2
4 0 1 3 2
4 0 1 2 4
CELL_TYPES 3
5
8
10
";
        let geometry = parse_str(input).unwrap();
        assert_eq!(geometry.len(), 3);

        let ids: Vec<u32> = geometry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let names: Vec<&str> = geometry.names().collect();
        assert_eq!(names, vec!["Triang-0-1-2", "Pixel-0-1-3-2", "Tetra-0-1-2-4"]);

        // Triangle and pixel decompose into a single face, the
        // tetrahedron into four.
        assert_eq!(geometry.get_by_id(1).unwrap().faces.len(), 1);
        assert_eq!(geometry.get_by_id(2).unwrap().faces.len(), 1);
        assert_eq!(geometry.get_by_id(3).unwrap().faces.len(), 4);
    }

    #[test]
    fn test_cell_local_renumbering_keeps_global_names() {
        let input = "\
# vtk DataFile Version 2.0
Sparse references
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 10 float
0 0 0
1 1 1
2 2 2
3 3 3
4 4 4
5 5 5
6 6 6
7 7 7
8 8 8
9 9 9
CELLS 1 5
4 4 9 2 7
CELL_TYPES 1
10
";
        let geometry = parse_str(input).unwrap();
        let poly = geometry.get_by_name("Tetra-4-9-2-7").unwrap();

        // Local vertex table holds the referenced points in cell order.
        assert_relative_eq!(poly.vertices[0].x, 4.0);
        assert_relative_eq!(poly.vertices[1].x, 9.0);
        assert_relative_eq!(poly.vertices[2].x, 2.0);
        assert_relative_eq!(poly.vertices[3].x, 7.0);

        // Faces reference local positions only.
        for face in &poly.faces {
            assert!(face.indices().iter().all(|&index| index < 4));
        }
    }

    #[test]
    fn test_empty_cells_block() {
        let input = "\
# vtk DataFile Version 2.0
No cells
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 1 float
0 0 0
CELLS 0 0
CELL_TYPES 0
";
        let geometry = parse_str(input).unwrap();
        assert!(geometry.is_empty());
    }

    #[test]
    fn test_unsupported_cell_type() {
        let input = TETRA_FILE.replace("\n10\n", "\n99\n");
        let err = parse_str(&input).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnsupportedCellType { line: 13, tag: 99 }
        ));
    }

    #[test]
    fn test_point_count_shortfall_breaks_cells_line() {
        // POINTS declares 3 but only two coordinate lines follow; the
        // CELLS declaration is consumed as a point record and rejected.
        let input = "\
# vtk DataFile Version 2.0
Short points
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 3 float
0 0 0
1 0 0
CELLS 1 4
3 0 1 2
CELL_TYPES 1
5
";
        let err = parse_str(input).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRecord { line: 8, .. }));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let first = parse_str(TETRA_FILE).unwrap();
        let second = parse_str(TETRA_FILE).unwrap();

        assert_eq!(first.len(), second.len());
        let first_names: Vec<&str> = first.names().collect();
        let second_names: Vec<&str> = second.names().collect();
        assert_eq!(first_names, second_names);

        let first_ids: Vec<u32> = first.iter().map(|(id, _)| id).collect();
        let second_ids: Vec<u32> = second.iter().map(|(id, _)| id).collect();
        assert_eq!(first_ids, second_ids);

        let a = first.get_by_id(1).unwrap();
        let b = second.get_by_id(1).unwrap();
        assert_eq!(a.faces, b.faces);
        assert_eq!(a.vertices, b.vertices);
    }

    #[test]
    fn test_duplicate_cells_collide_on_name() {
        let input = "\
# vtk DataFile Version 2.0
Duplicate cells
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 3 float
0 0 0
1 0 0
0 1 0
CELLS 2 8
3 0 1 2
3 0 1 2
CELL_TYPES 2
5
5
";
        let err = parse_str(input).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateName { name } if name == "Triang-0-1-2"));
    }

    #[test]
    fn test_cell_index_count_mismatch() {
        let input = TETRA_FILE.replace("4 0 1 2 3", "4 0 1 2");
        let err = parse_str(&input).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRecord { line: 11, .. }));
    }

    #[test]
    fn test_cell_point_count_must_match_type() {
        // Three points with a tetra tag: rejected at build time.
        let input = TETRA_FILE
            .replace("4 0 1 2 3", "3 0 1 2")
            .replace("CELLS 1 5", "CELLS 1 4");
        let err = parse_str(&input).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRecord { line: 11, .. }));
    }

    #[test]
    fn test_point_index_out_of_range() {
        let input = TETRA_FILE.replace("4 0 1 2 3", "4 0 1 2 9");
        let err = parse_str(&input).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRecord { line: 11, .. }));
    }

    #[test]
    fn test_separator_agnostic_cell_records() {
        let input = TETRA_FILE.replace("4 0 1 2 3", "4, 0, 1, 2, 3");
        let geometry = parse_str(&input).unwrap();
        assert!(geometry.get_by_name("Tetra-0-1-2-3").is_some());
    }

    #[test]
    fn test_malformed_points_declaration() {
        let input = TETRA_FILE.replace("POINTS 4 float", "POINTS four float");
        let err = parse_str(&input).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedDeclaration {
                line: 5,
                what: "POINTS"
            }
        ));
    }

    #[test]
    fn test_missing_type_token_in_points_declaration() {
        let input = TETRA_FILE.replace("POINTS 4 float", "POINTS 4");
        let err = parse_str(&input).unwrap_err();
        assert!(matches!(err, ParseError::MalformedDeclaration { line: 5, .. }));
    }

    #[test]
    fn test_trailing_content_rejected() {
        let input = format!("{TETRA_FILE}POINT_DATA 4\n");
        let err = parse_str(&input).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRecord { line: 14, .. }));
    }

    #[test]
    fn test_truncated_file() {
        let input = "\
# vtk DataFile Version 2.0
Truncated
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 4 float
0 0 0
";
        let err = parse_str(input).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let input = "\
# vtk DataFile Version 2.0
Commented
ASCII

# dataset follows
DATASET UNSTRUCTURED_GRID
POINTS 3 float
0 0 0

1 0 0
# last point
0 1 0
CELLS 1 4
3 0 1 2
CELL_TYPES 1
5
";
        let geometry = parse_str(input).unwrap();
        assert_eq!(geometry.len(), 1);
        assert!(geometry.get_by_name("Triang-0-1-2").is_some());
    }
}
