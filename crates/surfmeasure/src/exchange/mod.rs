//! Readers for the whitespace-delimited `.asc` text formats.
//!
//! Every format is one record per line. Lines are split up front and then
//! parsed in parallel since they are independent of each other, results are
//! collected back in file order.
pub mod surface;
pub mod triangles;

use std::path::Path;

use rayon::prelude::*;

use crate::config::BlankLines;
use crate::error::{AscError, AscResult};

pub use surface::{SurfaceData, SurfaceVertex, read_surface};
pub use triangles::{TriangleData, read_triangles};

/// The label used in errors for data that didn't come from a file.
pub(crate) const MEMORY_SOURCE: &str = "<memory>";

/// A single split line: its 1-based line number in the source and
/// its whitespace separated tokens.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Record<'a> {
    pub line: usize,
    pub tokens: Vec<&'a str>,
}

/// Split `data` into records, dropping the first `skip` physical lines.
///
/// Blank lines are dropped or reported depending on `blank`.
pub(crate) fn records<'a>(
    data: &'a str,
    source: &Path,
    skip: usize,
    blank: BlankLines,
) -> AscResult<Vec<Record<'a>>> {
    let mut records = Vec::new();
    for (index, raw) in data.lines().enumerate().skip(skip) {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.is_empty() {
            match blank {
                BlankLines::Skip => continue,
                BlankLines::Reject => {
                    return Err(AscError::BlankLine {
                        path: source.to_path_buf(),
                        line: index + 1,
                    });
                }
            }
        }
        records.push(Record {
            line: index + 1,
            tokens,
        });
    }
    Ok(records)
}

/// Parse every record with `parse` in parallel, keeping file order.
pub(crate) fn parse_records<T, F>(records: Vec<Record<'_>>, parse: F) -> AscResult<Vec<T>>
where
    T: Send,
    F: Fn(&Record<'_>) -> AscResult<T> + Sync + Send,
{
    records.into_par_iter().map(|r| parse(&r)).collect()
}

/// Read a whole text file, attaching the path to any failure.
pub(crate) fn read_text(path: &Path) -> AscResult<String> {
    std::fs::read_to_string(path).map_err(|e| AscError::io(path, e))
}

/// Parse a floating point token.
pub(crate) fn parse_float(token: &str, source: &Path, line: usize) -> AscResult<f64> {
    token.parse::<f64>().map_err(|_| AscError::Parse {
        path: source.to_path_buf(),
        line,
        token: token.to_string(),
        expected: "a number",
    })
}

/// Parse a token as a float and truncate it toward zero, the way the
/// vertex ids and polygon indices in these files have always been read.
pub(crate) fn parse_truncated(token: &str, source: &Path, line: usize) -> AscResult<i64> {
    let value = parse_float(token, source, line)?;
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return Err(AscError::Parse {
            path: source.to_path_buf(),
            line,
            token: token.to_string(),
            expected: "a finite integer value",
        });
    }
    Ok(value.trunc() as i64)
}

/// Parse a strict integer token, i.e. `7` but not `7.0`.
pub(crate) fn parse_integer(token: &str, source: &Path, line: usize) -> AscResult<i64> {
    token.parse::<i64>().map_err(|_| AscError::Parse {
        path: source.to_path_buf(),
        line,
        token: token.to_string(),
        expected: "an integer",
    })
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_records_skip_and_blank() {
        let data = "header\nsecond\n1 2\n   \n\n3 4 5\n";
        let source = Path::new(MEMORY_SOURCE);

        let parsed = records(data, source, 2, BlankLines::Skip).unwrap();
        assert_eq!(
            parsed,
            vec![
                Record {
                    line: 3,
                    tokens: vec!["1", "2"]
                },
                Record {
                    line: 6,
                    tokens: vec!["3", "4", "5"]
                },
            ]
        );

        match records(data, source, 2, BlankLines::Reject) {
            Err(AscError::BlankLine { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected a blank line error, got {other:?}"),
        }

        // blank header lines still count as header lines
        let parsed = records("\n\n9\n", source, 2, BlankLines::Reject).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].line, 3);
    }

    #[test]
    fn test_parse_numbers() {
        let source = Path::new(MEMORY_SOURCE);
        assert_eq!(parse_truncated("7", source, 1).unwrap(), 7);
        assert_eq!(parse_truncated("7.9", source, 1).unwrap(), 7);
        assert_eq!(parse_truncated("1e2", source, 1).unwrap(), 100);
        assert_eq!(parse_truncated("-2.5", source, 1).unwrap(), -2);
        assert!(parse_truncated("nan", source, 1).is_err());
        assert!(parse_truncated("inf", source, 1).is_err());
        assert!(parse_truncated("x", source, 1).is_err());

        assert_eq!(parse_integer("+12", source, 1).unwrap(), 12);
        assert!(parse_integer("12.0", source, 1).is_err());

        match parse_float("1,5", source, 4) {
            Err(AscError::Parse { line, token, .. }) => {
                assert_eq!(line, 4);
                assert_eq!(token, "1,5");
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }
}
