mod host;

pub use host::{PyHost, points_to_array};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use numpy::PyArray2;
use pyo3::prelude::*;

use surfmeasure::{Config, ImportOptions, MergeOptions};

/// Resolve the import options from an optional config file and an
/// optional object name, the name wins over the config.
pub fn import_options(name: Option<String>, config: Option<&Path>) -> Result<ImportOptions> {
    let mut options = match config {
        Some(path) => Config::from_path(path)?.import,
        None => ImportOptions::default(),
    };
    if let Some(name) = name {
        options.object_name = name;
    }
    Ok(options)
}

fn merge_options(config: Option<&Path>) -> Result<MergeOptions> {
    Ok(match config {
        Some(path) => Config::from_path(path)?.merge,
        None => MergeOptions::default(),
    })
}

/// (pyfunc) Read a `*_surf.asc` file into an `(n, 3)` vertex array and
/// a list of per-vertex measurement lists.
#[pyfunction(name = "read_surface")]
pub fn py_read_surface<'py>(
    py: Python<'py>,
    path: PathBuf,
) -> Result<(Bound<'py, PyArray2<f64>>, Vec<Vec<f64>>)> {
    let surface = surfmeasure::read_surface(&path, Default::default())?;
    Ok((points_to_array(py, &surface.points)?, surface.measurements))
}

/// (pyfunc) Read a `*_tri.asc` file into lists of 0-based vertex indices.
#[pyfunction(name = "read_triangles")]
pub fn py_read_triangles(path: PathBuf) -> Result<Vec<Vec<usize>>> {
    Ok(surfmeasure::read_triangles(&path, Default::default())?.faces)
}

/// (pyfunc) The vertex ids listed in a label file.
#[pyfunction(name = "load_labels", signature = (path, config = None))]
pub fn py_load_labels(path: PathBuf, config: Option<PathBuf>) -> Result<HashSet<i64>> {
    let labels = surfmeasure::load_labels(&path, &merge_options(config.as_deref())?)?;
    Ok(labels.iter().collect())
}

/// (pyfunc) Write `labels_<name>` next to the surface file and return its path.
#[pyfunction(name = "merge_labels", signature = (surf_file, v1_file, v2_file, config = None))]
pub fn py_merge_labels(
    surf_file: PathBuf,
    v1_file: PathBuf,
    v2_file: PathBuf,
    config: Option<PathBuf>,
) -> Result<PathBuf> {
    let options = merge_options(config.as_deref())?;
    Ok(surfmeasure::merge_labels(
        &surf_file, &v1_file, &v2_file, &options,
    )?)
}

/// (pyfunc) Import the two selected files through `host` and return the
/// operator status, `"FINISHED"` or `"CANCELLED"`.
#[pyfunction(name = "import_files", signature = (paths, host, name = None, config = None))]
pub fn py_import_files(
    paths: Vec<PathBuf>,
    host: Bound<'_, PyAny>,
    name: Option<String>,
    config: Option<PathBuf>,
) -> Result<&'static str> {
    let options = import_options(name, config.as_deref())?;
    let mut host = PyHost::new(host);
    let outcome = surfmeasure::import_files(&paths, &mut host, &options)?;
    Ok(outcome.status())
}

/// A Python module implemented in Rust.
#[pymodule]
fn surfmeasure_python(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_read_surface, m)?)?;
    m.add_function(wrap_pyfunction!(py_read_triangles, m)?)?;
    m.add_function(wrap_pyfunction!(py_load_labels, m)?)?;
    m.add_function(wrap_pyfunction!(py_merge_labels, m)?)?;
    m.add_function(wrap_pyfunction!(py_import_files, m)?)?;
    Ok(())
}
