/// Parser for the OFF polyhedron file format
use std::fs;
use std::path::Path;

use nom::{
    character::complete::{char, digit0, digit1, multispace1, one_of},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{pair, preceded, tuple},
    IResult,
};

use crate::error::{ParseError, Result};
use crate::geometry::{Face, Polyhedron, Vertex};
use crate::lines::LineCursor;

/// Read and parse an OFF file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Polyhedron> {
    let contents = fs::read_to_string(path)?;
    parse_str(&contents)
}

/// Parse OFF file contents into a single polyhedron.
///
/// Blank lines and `#` comments are skipped everywhere except the first
/// line, which must be the literal `OFF` marker. Any grammar violation
/// aborts the parse; no partial polyhedron is ever returned.
pub fn parse_str(input: &str) -> Result<Polyhedron> {
    let mut cursor = LineCursor::new(input);

    let (line, header) = cursor.next_raw().ok_or(ParseError::UnexpectedEof {
        context: "reading OFF header",
    })?;
    if header != "OFF" {
        return Err(ParseError::MalformedHeader {
            line,
            expected: "OFF",
            found: header.to_string(),
        });
    }

    let (line, text) = cursor.next_significant().ok_or(ParseError::UnexpectedEof {
        context: "reading vertex and face counts",
    })?;
    let (vertex_count, face_count) =
        count_line(text).ok_or(ParseError::MalformedDeclaration {
            line,
            what: "vertex/face count",
        })?;

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let (line, text) = cursor.next_significant().ok_or(ParseError::UnexpectedEof {
            context: "reading vertex coordinates",
        })?;
        vertices.push(
            vertex_line(text).ok_or_else(|| ParseError::MalformedRecord {
                line,
                what: format!("expected three coordinates, found {text:?}"),
            })?,
        );
    }

    let mut faces = Vec::with_capacity(face_count);
    for _ in 0..face_count {
        let (line, text) = cursor.next_significant().ok_or(ParseError::UnexpectedEof {
            context: "reading faces",
        })?;
        faces.push(face_line(line, text)?);
    }

    // Content after the declared faces is ignored.
    Ok(Polyhedron::new(vertices, faces))
}

/// Unsigned decimal integer.
fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(input)
}

/// Floating-point literal: optional leading `-`, integer part, optional
/// fraction, optional exponent. Stricter than `f64::from_str` (no leading
/// `+`, no bare `.5`, no inf/nan).
fn float_literal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit0)),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        str::parse,
    )(input)
}

/// The `V F E` count line. The edge count is accepted but unused, and
/// trailing content after the three integers is tolerated.
fn count_line(line: &str) -> Option<(usize, usize)> {
    let result: IResult<&str, (usize, usize, usize)> = tuple((
        index,
        preceded(multispace1, index),
        preceded(multispace1, index),
    ))(line);

    result
        .ok()
        .map(|(_, (vertices, faces, _edges))| (vertices, faces))
}

/// A vertex line: exactly three float literals.
fn vertex_line(line: &str) -> Option<Vertex> {
    let result: IResult<&str, (f64, f64, f64)> = all_consuming(tuple((
        float_literal,
        preceded(multispace1, float_literal),
        preceded(multispace1, float_literal),
    )))(line);

    result.ok().map(|(_, (x, y, z))| Vertex::new(x, y, z))
}

/// A face line: the arity `k` followed by exactly `k` vertex indices.
/// Indices are taken verbatim; they are not checked against the vertex
/// count.
fn face_line(line: usize, text: &str) -> Result<Face> {
    let parsed: IResult<&str, Vec<usize>> =
        all_consuming(separated_list1(multispace1, index))(text);
    let (_, tokens) = parsed.map_err(|_| ParseError::MalformedRecord {
        line,
        what: format!("expected face indices, found {text:?}"),
    })?;

    let arity = tokens[0];
    let indices = &tokens[1..];

    if arity != 3 && arity != 4 {
        return Err(ParseError::UnsupportedFaceArity { line, arity });
    }
    if indices.len() != arity {
        return Err(ParseError::MalformedRecord {
            line,
            what: format!("face declares {arity} vertices but lists {}", indices.len()),
        });
    }

    Ok(if arity == 3 {
        Face::Triangle([indices[0], indices[1], indices[2]])
    } else {
        Face::Quad([indices[0], indices[1], indices[2], indices[3]])
    })
}
