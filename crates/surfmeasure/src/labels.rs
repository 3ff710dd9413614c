//! Region labels for surface vertices.
//!
//! A label file lists the vertex ids of one region (v1 or v2) after a
//! fixed size header. Merging two of them into a surface file appends one
//! extra column to every vertex line: `1` for v1, `2` for v2, `0` otherwise.
use std::fmt;
use std::path::{Path, PathBuf};

use ahash::AHashSet;
use itertools::Itertools;
use log::{debug, info};

use crate::config::{BlankLines, MergeOptions};
use crate::error::{AscError, AscResult};
use crate::exchange::{
    MEMORY_SOURCE, parse_integer, parse_records, parse_truncated, read_text, records,
};

/// The region a vertex belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionLabel {
    Unlabeled = 0,
    V1 = 1,
    V2 = 2,
}

impl RegionLabel {
    /// The token written into the merged file.
    pub fn as_str(self) -> &'static str {
        match self {
            RegionLabel::Unlabeled => "0",
            RegionLabel::V1 => "1",
            RegionLabel::V2 => "2",
        }
    }
}

impl fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The vertex ids of one labelled region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSet {
    ids: AHashSet<i64>,
}

impl LabelSet {
    /// Parse the contents of a label file, skipping `options.header_lines`.
    pub fn from_string(data: &str, options: &MergeOptions) -> AscResult<Self> {
        Self::parse(data, Path::new(MEMORY_SOURCE), options)
    }

    fn parse(data: &str, source: &Path, options: &MergeOptions) -> AscResult<Self> {
        let lines = records(data, source, options.header_lines, options.blank_lines)?;
        let ids = parse_records(lines, |r| parse_integer(r.tokens[0], source, r.line))?;
        Ok(ids.into_iter().collect())
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<i64> for LabelSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        LabelSet {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Load the vertex ids listed in a label file.
pub fn load_labels(path: &Path, options: &MergeOptions) -> AscResult<LabelSet> {
    let data = read_text(path)?;
    let labels = LabelSet::parse(&data, path, options)?;
    debug!("read {} label ids from {}", labels.len(), path.display());
    Ok(labels)
}

/// Pick the label for a vertex id, v1 wins when an id is in both sets.
pub fn classify(id: i64, v1: &LabelSet, v2: &LabelSet) -> RegionLabel {
    if v1.contains(id) {
        RegionLabel::V1
    } else if v2.contains(id) {
        RegionLabel::V2
    } else {
        RegionLabel::Unlabeled
    }
}

/// Append the region label to the already split fields of one surface line.
pub fn label_line(tokens: &[&str], label: RegionLabel) -> String {
    tokens.iter().copied().chain([label.as_str()]).join(" ")
}

fn merge_records(
    data: &str,
    source: &Path,
    blank: BlankLines,
    v1: &LabelSet,
    v2: &LabelSet,
) -> AscResult<String> {
    let lines = records(data, source, 0, blank)?;
    let merged = parse_records(lines, |r| {
        let id = parse_truncated(r.tokens[0], source, r.line)?;
        Ok((r.line, label_line(&r.tokens, classify(id, v1, v2))))
    })?;

    // skipped blank lines are copied as they are, one output line per input line
    let mut merged = merged.into_iter().peekable();
    let mut out = String::with_capacity(data.len() + 2 * merged.len());
    for (index, raw) in data.lines().enumerate() {
        match merged.next_if(|(line, _)| *line == index + 1) {
            Some((_, labelled)) => out.push_str(&labelled),
            None => out.push_str(raw),
        }
        out.push('\n');
    }
    Ok(out)
}

/// Append labels to the contents of a surface file in memory.
pub fn merge_labels_str(
    surface: &str,
    v1: &LabelSet,
    v2: &LabelSet,
    blank: BlankLines,
) -> AscResult<String> {
    merge_records(surface, Path::new(MEMORY_SOURCE), blank, v1, v2)
}

/// The path the merged file is written to: the surface file's directory
/// and its file name with `prefix` in front.
pub fn merged_path(surface: &Path, prefix: &str) -> AscResult<PathBuf> {
    let name = surface.file_name().ok_or_else(|| AscError::Io {
        path: surface.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
    })?;
    let mut file_name = std::ffi::OsString::from(prefix);
    file_name.push(name);
    Ok(surface.with_file_name(file_name))
}

/// Write a copy of `surface` with a v1/v2 region label appended to every line.
///
/// The output is written next to the input and any existing file there is
/// replaced. Nothing is written unless every input parsed.
///
/// Returns
/// --------
///   The path of the written file.
pub fn merge_labels(
    surface: &Path,
    v1_file: &Path,
    v2_file: &Path,
    options: &MergeOptions,
) -> AscResult<PathBuf> {
    let v1 = load_labels(v1_file, options)?;
    let v2 = load_labels(v2_file, options)?;

    let data = read_text(surface)?;
    let merged = merge_records(&data, surface, options.blank_lines, &v1, &v2)?;

    let output = merged_path(surface, &options.output_prefix)?;
    std::fs::write(&output, merged).map_err(|e| AscError::io(&output, e))?;

    info!(
        "merged {} v1 and {} v2 labels into {}",
        v1.len(),
        v2.len(),
        output.display()
    );
    Ok(output)
}
