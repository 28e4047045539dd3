/// Load-time errors for mesh construction and parsing
use std::fmt;

/// Which index stream a bad triangle index belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Position,
    Texcoord,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Position => f.write_str("position"),
            IndexKind::Texcoord => f.write_str("texcoord"),
        }
    }
}

/// Errors raised while loading a mesh. All of them are fatal to startup.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A record keyword the reader does not understand
    UnknownRecord { line: usize, keyword: String },
    /// A known record whose fields could not be parsed
    Parse { line: usize, record: &'static str },
    /// A face used index 0, which does not exist in 1-based numbering
    ZeroIndex { line: usize },
    /// A triangle references past the end of its index stream
    IndexOutOfRange {
        triangle: usize,
        kind: IndexKind,
        index: u32,
        len: usize,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::UnknownRecord { line, keyword } => {
                write!(f, "line {}: unknown record type `{}`", line, keyword)
            }
            MeshError::Parse { line, record } => {
                write!(f, "line {}: malformed `{}` record", line, record)
            }
            MeshError::ZeroIndex { line } => {
                write!(f, "line {}: face indices are 1-based, found 0", line)
            }
            MeshError::IndexOutOfRange {
                triangle,
                kind,
                index,
                len,
            } => write!(
                f,
                "triangle {}: {} index {} out of range (len {})",
                triangle, kind, index, len
            ),
        }
    }
}

impl std::error::Error for MeshError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_line() {
        let err = MeshError::Parse {
            line: 7,
            record: "vt",
        };
        assert_eq!(err.to_string(), "line 7: malformed `vt` record");
    }
}
