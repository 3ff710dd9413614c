use std::path::Path;

use serde::Deserialize;

use crate::error::{AscError, AscResult};

/// What a reader does with a line that holds nothing but whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankLines {
    /// Drop the line as if it wasn't there.
    #[default]
    Skip,
    /// Fail with [`AscError::BlankLine`].
    Reject,
}

/// How measurement vectors of differing length are handled when they are
/// attached to a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaggedMeasures {
    /// Fail before the host sees anything.
    #[default]
    Error,
    /// The first vertex decides the attribute count: longer vectors are
    /// truncated and shorter ones padded with NaN.
    Pad,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportOptions {
    /// Name of the created mesh and object.
    pub object_name: String,
    /// Attributes are called `{attribute_prefix}1`, `{attribute_prefix}2`, ...
    pub attribute_prefix: String,
    pub surface_suffix: String,
    pub triangle_suffix: String,
    pub auto_smooth: bool,
    pub blank_lines: BlankLines,
    pub ragged_measures: RaggedMeasures,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            object_name: "brain".to_string(),
            attribute_prefix: "Measure".to_string(),
            surface_suffix: "surf.asc".to_string(),
            triangle_suffix: "tri.asc".to_string(),
            auto_smooth: true,
            blank_lines: BlankLines::Skip,
            ragged_measures: RaggedMeasures::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeOptions {
    /// Prepended to the surface file name to name the output.
    pub output_prefix: String,
    /// Lines at the top of a label file that never hold ids.
    pub header_lines: usize,
    pub blank_lines: BlankLines,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            output_prefix: "labels_".to_string(),
            header_lines: 2,
            blank_lines: BlankLines::Skip,
        }
    }
}

/// Settings for both the import and the label merge, usually read
/// from a TOML file with `[import]` and `[merge]` tables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// An `env_logger` filter such as `debug` or `surfmeasure=trace`.
    /// The library never reads it, a binary decides how it ranks
    /// against its own flags and `RUST_LOG`.
    pub log_level: Option<String>,
    pub import: ImportOptions,
    pub merge: MergeOptions,
}

impl Config {
    /// Parse a TOML document, any missing key keeps its default.
    pub fn from_toml(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(data)
    }

    /// Load a TOML config file.
    pub fn from_path(path: &Path) -> AscResult<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| AscError::io(path, e))?;
        Self::from_toml(&data).map_err(|e| AscError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
