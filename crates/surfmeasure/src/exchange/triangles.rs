use std::path::Path;

use log::debug;

use crate::config::BlankLines;
use crate::error::{AscError, AscResult};
use crate::exchange::{MEMORY_SOURCE, parse_records, parse_truncated, read_text, records};

/// The polygons of a `*_tri.asc` file.
///
/// Files store 1-based vertex indices, these are 0-based. Lines are usually
/// triangles but any polygon length is passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleData {
    pub faces: Vec<Vec<usize>>,
}

impl TriangleData {
    /// Parse the contents of a triangle file.
    pub fn from_string(data: &str, blank: BlankLines) -> AscResult<Self> {
        Self::parse(data, Path::new(MEMORY_SOURCE), blank)
    }

    fn parse(data: &str, source: &Path, blank: BlankLines) -> AscResult<Self> {
        let lines = records(data, source, 0, blank)?;
        let faces = parse_records(lines, |r| {
            r.tokens
                .iter()
                .map(|token| to_zero_based(token, source, r.line))
                .collect::<AscResult<Vec<usize>>>()
        })?;
        Ok(TriangleData { faces })
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Convert one 1-based index token to a 0-based index.
fn to_zero_based(token: &str, source: &Path, line: usize) -> AscResult<usize> {
    let value = parse_truncated(token, source, line)?;
    if value < 1 {
        return Err(AscError::Parse {
            path: source.to_path_buf(),
            line,
            token: token.to_string(),
            expected: "a 1-based vertex index",
        });
    }
    usize::try_from(value - 1).map_err(|_| AscError::Parse {
        path: source.to_path_buf(),
        line,
        token: token.to_string(),
        expected: "an index that fits in memory",
    })
}

/// Read a `*_tri.asc` file into 0-based polygons.
pub fn read_triangles(path: &Path, blank: BlankLines) -> AscResult<TriangleData> {
    let data = read_text(path)?;
    let triangles = TriangleData::parse(&data, path, blank)?;
    debug!(
        "read {} polygons from {}",
        triangles.faces.len(),
        path.display()
    );
    Ok(triangles)
}
