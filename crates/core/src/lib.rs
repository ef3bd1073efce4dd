//! Core shared types and errors for mesh loading.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Which attribute list a face index points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Position => "position",
            AttributeKind::TexCoord => "texture coordinate",
            AttributeKind::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Every way a mesh load can fail. Any of these aborts the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to access OBJ file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed OBJ line {line}: {reason} ('{text}')")]
    MalformedLine {
        line: usize,
        reason: String,
        text: String,
    },

    /// `line` is 0 when the reference does not come from a face line.
    #[error("OBJ {kind} index {index} out of range (len={len}) on line {line}")]
    IndexOutOfRange {
        line: usize,
        kind: AttributeKind,
        index: usize,
        len: usize,
    },

    #[error("OBJ needs {count} vertices on line {line}, more than a u32 index buffer can address")]
    TooManyVertices { line: usize, count: usize },
}

impl LoadError {
    pub fn malformed(line: usize, reason: impl Into<String>, text: &str) -> Self {
        LoadError::MalformedLine {
            line,
            reason: reason.into(),
            text: text.to_owned(),
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
