/// Polyhedral mesh values and the named geometry registry
use std::collections::HashMap;

use nalgebra::Point3;

use crate::error::{ParseError, Result};

/// A mesh vertex. Carries no identity beyond its position; polyhedra
/// address vertices by index.
pub type Vertex = Point3<f64>;

/// A planar polygon face, referencing vertices of the owning polyhedron
/// by index. Winding order is preserved exactly as read from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Triangle([usize; 3]),
    Quad([usize; 4]),
}

impl Face {
    /// The vertex indices of this face, in winding order.
    pub fn indices(&self) -> &[usize] {
        match self {
            Face::Triangle(indices) => indices,
            Face::Quad(indices) => indices,
        }
    }

    pub fn arity(&self) -> usize {
        self.indices().len()
    }
}

/// A reconstructed polyhedron: a vertex list plus the faces bounding it.
///
/// Face indices are local to `vertices` of the same polyhedron. Parsers
/// build a polyhedron once and never mutate it afterwards.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Polyhedron {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }
}

#[derive(Debug)]
struct Entry {
    id: u32,
    name: String,
    polyhedron: Polyhedron,
}

/// An ordered collection of named polyhedra with a secondary integer-ID
/// index.
///
/// Names and IDs are unique within a geometry; insertion order is
/// preserved for iteration. A geometry is populated by a single parse
/// call and read-only afterwards.
#[derive(Debug, Default)]
pub struct Geometry {
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<u32, usize>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a polyhedron under a unique name and ID.
    pub fn add(&mut self, polyhedron: Polyhedron, name: impl Into<String>, id: u32) -> Result<()> {
        let name = name.into();

        if self.by_name.contains_key(&name) {
            return Err(ParseError::DuplicateName { name });
        }
        if self.by_id.contains_key(&id) {
            return Err(ParseError::DuplicateId { id });
        }

        let index = self.entries.len();
        self.by_name.insert(name.clone(), index);
        self.by_id.insert(id, index);
        self.entries.push(Entry {
            id,
            name,
            polyhedron,
        });

        Ok(())
    }

    /// Look up a polyhedron by name. Missing names are not an error.
    pub fn get_by_name(&self, name: &str) -> Option<&Polyhedron> {
        self.by_name
            .get(name)
            .map(|&index| &self.entries[index].polyhedron)
    }

    /// Look up a polyhedron by its assigned ID.
    pub fn get_by_id(&self, id: u32) -> Option<&Polyhedron> {
        self.by_id
            .get(&id)
            .map(|&index| &self.entries[index].polyhedron)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(id, polyhedron)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Polyhedron)> {
        self.entries
            .iter()
            .map(|entry| (entry.id, &entry.polyhedron))
    }

    /// Iterate registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}
