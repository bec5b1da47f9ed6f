use thiserror::Error;

/// Errors raised while parsing geometry files or registering the results.
///
/// Every parse failure is fatal to the call that produced it; the caller
/// never receives a partial polyhedron or geometry. Line numbers are
/// 1-based and count every line of the source file, including blank and
/// comment lines.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found {found:?}")]
    MalformedHeader {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: malformed {what} declaration")]
    MalformedDeclaration { line: usize, what: &'static str },

    #[error("line {line}: {what}")]
    MalformedRecord { line: usize, what: String },

    #[error("line {line}: face with {arity} vertices not supported")]
    UnsupportedFaceArity { line: usize, arity: usize },

    #[error("line {line}: cell type {tag} not supported")]
    UnsupportedCellType { line: usize, tag: usize },

    #[error("polyhedron {name:?} already registered")]
    DuplicateName { name: String },

    #[error("polyhedron ID {id} already registered")]
    DuplicateId { id: u32 },

    #[error("unexpected end of file while {context}")]
    UnexpectedEof { context: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
