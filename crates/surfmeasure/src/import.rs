//! Import a surface file and a triangle file into a [`MeshHost`].
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use nalgebra::Point3;
use thiserror::Error;

use crate::config::{ImportOptions, RaggedMeasures};
use crate::error::{AscError, AscResult};
use crate::exchange::{read_surface, read_triangles};
use crate::host::MeshHost;

/// Why a set of selected files can't be imported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("expected 2 files, got {0}")]
    WrongFileCount(usize),
    #[error("no selected file ends with `{0}`")]
    NoMatch(String),
    #[error("{count} selected files end with `{suffix}`")]
    Ambiguous { suffix: String, count: usize },
}

/// The two files an import reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSelection {
    pub surface: PathBuf,
    pub triangles: PathBuf,
}

/// Find the file with each role by its suffix.
pub fn select_files<P: AsRef<Path>>(
    paths: &[P],
    options: &ImportOptions,
) -> Result<ImportSelection, SelectionError> {
    if paths.len() != 2 {
        return Err(SelectionError::WrongFileCount(paths.len()));
    }

    let pick = |suffix: &str| -> Result<PathBuf, SelectionError> {
        let matches: Vec<&Path> = paths
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| p.to_string_lossy().ends_with(suffix))
            .collect();
        match matches.as_slice() {
            [single] => Ok(single.to_path_buf()),
            [] => Err(SelectionError::NoMatch(suffix.to_string())),
            _ => Err(SelectionError::Ambiguous {
                suffix: suffix.to_string(),
                count: matches.len(),
            }),
        }
    };

    Ok(ImportSelection {
        surface: pick(&options.surface_suffix)?,
        triangles: pick(&options.triangle_suffix)?,
    })
}

/// What an import did.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub object_name: String,
    pub vertices: usize,
    pub faces: usize,
    /// The names of the attached measurement attributes.
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Finished(ImportSummary),
    Cancelled(SelectionError),
}

impl ImportOutcome {
    /// The operator status a host reports for this outcome.
    pub fn status(&self) -> &'static str {
        match self {
            ImportOutcome::Finished(_) => "FINISHED",
            ImportOutcome::Cancelled(_) => "CANCELLED",
        }
    }
}

/// A mesh created in a host and the attributes attached to it.
#[derive(Debug)]
pub struct BuiltMesh<M> {
    pub mesh: M,
    pub attributes: Vec<String>,
}

/// Turn per-vertex measurement vectors into one column per measurement.
///
/// Nothing is attached, and an empty list is returned, unless there is
/// exactly one vector per point. The first vector decides how many
/// columns there are.
pub fn measure_columns(
    measurements: &[Vec<f64>],
    point_count: usize,
    ragged: RaggedMeasures,
) -> AscResult<Vec<Vec<f64>>> {
    if measurements.len() != point_count {
        debug!(
            "{} measurement vectors for {} points, no attributes attached",
            measurements.len(),
            point_count
        );
        return Ok(Vec::new());
    }
    let Some(first) = measurements.first() else {
        return Ok(Vec::new());
    };
    let dim = first.len();

    if let Some((vertex, found)) = measurements
        .iter()
        .map(|m| m.len())
        .enumerate()
        .find(|&(_, len)| len != dim)
    {
        match ragged {
            RaggedMeasures::Error => {
                return Err(AscError::RaggedMeasures {
                    vertex,
                    expected: dim,
                    found,
                });
            }
            RaggedMeasures::Pad => {
                warn!("vertex {vertex} has {found} measurements, using {dim} from the first vertex")
            }
        }
    }

    Ok((0..dim)
        .map(|column| {
            measurements
                .iter()
                .map(|m| m.get(column).copied().unwrap_or(f64::NAN))
                .collect()
        })
        .collect())
}

fn populate<H: MeshHost>(
    host: &mut H,
    mesh: &H::Mesh,
    columns: &[Vec<f64>],
    options: &ImportOptions,
) -> AscResult<Vec<String>> {
    let mut names = Vec::with_capacity(columns.len());
    for (i, values) in columns.iter().enumerate() {
        let name = format!("{}{}", options.attribute_prefix, i + 1);
        host.attach_point_scalar(mesh, &name, values)?;
        names.push(name);
    }
    host.finish_mesh(mesh, options.auto_smooth)?;
    host.link_and_activate(mesh)?;
    Ok(names)
}

/// Create a mesh called `name` in `host`, attach the measurements as
/// per-vertex attributes and make it the active object.
///
/// Ragged measurements are checked before anything is created. If the
/// host fails after the mesh was created it is discarded again.
pub fn build_mesh<H: MeshHost>(
    host: &mut H,
    name: &str,
    faces: &[Vec<usize>],
    points: &[Point3<f64>],
    measurements: &[Vec<f64>],
    options: &ImportOptions,
) -> AscResult<BuiltMesh<H::Mesh>> {
    let columns = measure_columns(measurements, points.len(), options.ragged_measures)?;

    let mesh = host.create_mesh(name, points, faces)?;
    match populate(host, &mesh, &columns, options) {
        Ok(attributes) => Ok(BuiltMesh { mesh, attributes }),
        Err(err) => {
            if let Err(discard) = host.discard_mesh(&mesh) {
                warn!("failed to discard mesh `{name}`: {discard:#}");
            }
            Err(err)
        }
    }
}

/// Import the selected surface and triangle files.
///
/// Returns `Cancelled` when the selection isn't exactly one surface
/// file and one triangle file, and an error if reading or building fails.
pub fn import_files<H: MeshHost, P: AsRef<Path>>(
    paths: &[P],
    host: &mut H,
    options: &ImportOptions,
) -> AscResult<ImportOutcome> {
    let selection = match select_files(paths, options) {
        Ok(selection) => selection,
        Err(reason) => {
            warn!("import cancelled: {reason}");
            return Ok(ImportOutcome::Cancelled(reason));
        }
    };

    let surface = read_surface(&selection.surface, options.blank_lines)?;
    let triangles = read_triangles(&selection.triangles, options.blank_lines)?;

    let built = build_mesh(
        host,
        &options.object_name,
        &triangles.faces,
        &surface.points,
        &surface.measurements,
        options,
    )?;

    info!(
        "imported `{}`: {} vertices, {} faces, {} attributes",
        options.object_name,
        surface.points.len(),
        triangles.faces.len(),
        built.attributes.len()
    );

    Ok(ImportOutcome::Finished(ImportSummary {
        object_name: options.object_name.clone(),
        vertices: surface.points.len(),
        faces: triangles.faces.len(),
        attributes: built.attributes,
    }))
}
