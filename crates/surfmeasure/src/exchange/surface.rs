use std::path::Path;

use log::debug;
use nalgebra::Point3;

use crate::config::BlankLines;
use crate::error::{AscError, AscResult};
use crate::exchange::{MEMORY_SOURCE, parse_float, parse_records, parse_truncated, read_text, records};

/// One line of a `*_surf.asc` file: `id x y z m1 m2 ... mk`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceVertex {
    /// The 1-based id which label files refer to.
    pub id: i64,
    pub position: Point3<f64>,
    /// Any number of measurement values, possibly none.
    pub measures: Vec<f64>,
}

impl SurfaceVertex {
    fn parse(tokens: &[&str], source: &Path, line: usize) -> AscResult<Self> {
        match tokens {
            [id, x, y, z, measures @ ..] => Ok(SurfaceVertex {
                id: parse_truncated(id, source, line)?,
                position: Point3::new(
                    parse_float(x, source, line)?,
                    parse_float(y, source, line)?,
                    parse_float(z, source, line)?,
                ),
                measures: measures
                    .iter()
                    .map(|m| parse_float(m, source, line))
                    .collect::<AscResult<Vec<f64>>>()?,
            }),
            _ => Err(AscError::MissingField {
                path: source.to_path_buf(),
                line,
                expected: 4,
                found: tokens.len(),
            }),
        }
    }
}

/// The vertex positions and measurement vectors of a surface file
/// as two parallel, identically indexed sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceData {
    pub points: Vec<Point3<f64>>,
    pub measurements: Vec<Vec<f64>>,
}

impl SurfaceData {
    /// Parse the contents of a surface file.
    pub fn from_string(data: &str, blank: BlankLines) -> AscResult<Self> {
        Self::parse(data, Path::new(MEMORY_SOURCE), blank)
    }

    fn parse(data: &str, source: &Path, blank: BlankLines) -> AscResult<Self> {
        let vertices = parse_vertices(data, source, blank)?;
        let (points, measurements) = vertices
            .into_iter()
            .map(|v| (v.position, v.measures))
            .unzip();
        Ok(SurfaceData {
            points,
            measurements,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Parse every vertex line including its id.
pub(crate) fn parse_vertices(
    data: &str,
    source: &Path,
    blank: BlankLines,
) -> AscResult<Vec<SurfaceVertex>> {
    let lines = records(data, source, 0, blank)?;
    parse_records(lines, |r| SurfaceVertex::parse(&r.tokens, source, r.line))
}

/// Read a `*_surf.asc` file into points and per-vertex measurements.
pub fn read_surface(path: &Path, blank: BlankLines) -> AscResult<SurfaceData> {
    let data = read_text(path)?;
    let surface = SurfaceData::parse(&data, path, blank)?;
    debug!(
        "read {} vertices from {}",
        surface.points.len(),
        path.display()
    );
    Ok(surface)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_surface_basic() {
        let data = "1 0 0 0 5.5\n2 1 0 0 6.5\n3 0 1 0 7.5\n";
        let surface = SurfaceData::from_string(data, BlankLines::Skip).unwrap();

        assert_eq!(
            surface.points,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ]
        );
        assert_eq!(surface.measurements, vec![vec![5.5], vec![6.5], vec![7.5]]);
    }

    #[test]
    fn test_surface_fixture() {
        let data = include_str!("../../../../test/data/sample_surf.asc");
        let surface = SurfaceData::from_string(data, BlankLines::Skip).unwrap();

        // one vertex for every line
        assert_eq!(surface.len(), data.lines().count());
        assert_eq!(surface.measurements.len(), surface.points.len());
        // every measurement vector has as many values as trailing tokens
        for (line, measures) in data.lines().zip(surface.measurements.iter()) {
            assert_eq!(measures.len(), line.split_whitespace().count() - 4);
        }
    }

    #[test]
    fn test_surface_variable_measures() {
        let data = "1 0 0 0\n2.0 1 2 3 4 5\n3 1e-1 -2 3.25 9\n";
        let surface = SurfaceData::from_string(data, BlankLines::Skip).unwrap();
        let lengths: Vec<usize> = surface.measurements.iter().map(|m| m.len()).collect();
        assert_eq!(lengths, vec![0, 2, 1]);
        assert_eq!(surface.points[2], Point3::new(0.1, -2.0, 3.25));

        let vertices = parse_vertices(data, Path::new(MEMORY_SOURCE), BlankLines::Skip).unwrap();
        let ids: Vec<i64> = vertices.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_surface_errors() {
        match SurfaceData::from_string("1 0 0 0\n2 1 0\n", BlankLines::Skip) {
            Err(AscError::MissingField { line, found, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(found, 3);
            }
            other => panic!("expected a missing field error, got {other:?}"),
        }

        match SurfaceData::from_string("1 0 0 0 abc\n", BlankLines::Skip) {
            Err(AscError::Parse { line, token, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(token, "abc");
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_surface_blank_lines() {
        let data = "1 0 0 0 1\n\n2 1 0 0 2\n  \n";
        let surface = SurfaceData::from_string(data, BlankLines::Skip).unwrap();
        assert_eq!(surface.len(), 2);

        assert!(matches!(
            SurfaceData::from_string(data, BlankLines::Reject),
            Err(AscError::BlankLine { line: 2, .. })
        ));
    }

    #[test]
    fn test_read_surface_missing() {
        let result = read_surface(Path::new("does/not/exist_surf.asc"), BlankLines::Skip);
        assert!(matches!(result, Err(AscError::Io { .. })));
    }
}
