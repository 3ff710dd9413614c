//! Import triangulated surfaces with per-vertex measurements and merge
//! region labels into raw surface files.
//!
//! The `.asc` readers live in [`exchange`], region labels in [`labels`] and
//! the import pipeline in [`import`], which talks to the application the
//! mesh ends up in only through the [`MeshHost`] trait.
pub mod attributes;
pub mod config;
pub mod error;
pub mod exchange;
pub mod host;
pub mod import;
pub mod labels;
pub mod mesh;
pub mod scene;

pub use config::{BlankLines, Config, ImportOptions, MergeOptions, RaggedMeasures};
pub use error::{AscError, AscResult};
pub use exchange::{SurfaceData, TriangleData, read_surface, read_triangles};
pub use host::MeshHost;
pub use import::{ImportOutcome, ImportSummary, SelectionError, build_mesh, import_files};
pub use labels::{LabelSet, RegionLabel, load_labels, merge_labels};
pub use mesh::PolyMesh;
pub use scene::Scene;
