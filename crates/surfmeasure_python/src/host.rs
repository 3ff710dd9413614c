use anyhow::Result;
use nalgebra::Point3;
use numpy::PyArray2;
use numpy::ndarray::Array2;
use pyo3::prelude::*;

use surfmeasure::MeshHost;

/// Convert points to an `(n, 3)` float array.
pub fn points_to_array<'py>(py: Python<'py>, points: &[Point3<f64>]) -> Result<Bound<'py, PyArray2<f64>>> {
    let flat: &[f64] = bytemuck::cast_slice(points);
    let arr = Array2::from_shape_vec((points.len(), 3), flat.to_vec())?;
    Ok(PyArray2::from_owned_array(py, arr))
}

/// A [`MeshHost`] backed by a Python object, usually the import operator
/// of an application add-on wrapping that application's data API.
///
/// The object needs `create_mesh(name, vertices, faces)` returning any
/// mesh handle, `attach_point_scalar(mesh, name, values)`,
/// `finish_mesh(mesh, auto_smooth)`, `link_and_activate(mesh)` and may
/// provide `discard_mesh(mesh)`.
pub struct PyHost<'py> {
    host: Bound<'py, PyAny>,
}

impl<'py> PyHost<'py> {
    pub fn new(host: Bound<'py, PyAny>) -> Self {
        Self { host }
    }
}

impl<'py> MeshHost for PyHost<'py> {
    type Mesh = Py<PyAny>;

    fn create_mesh(
        &mut self,
        name: &str,
        points: &[Point3<f64>],
        faces: &[Vec<usize>],
    ) -> Result<Py<PyAny>> {
        let py = self.host.py();
        let vertices = points_to_array(py, points)?;
        let mesh = self
            .host
            .call_method1("create_mesh", (name, vertices, faces.to_vec()))?;
        Ok(mesh.unbind())
    }

    fn attach_point_scalar(&mut self, mesh: &Py<PyAny>, name: &str, values: &[f64]) -> Result<()> {
        let py = self.host.py();
        self.host
            .call_method1("attach_point_scalar", (mesh.bind(py), name, values.to_vec()))?;
        Ok(())
    }

    fn finish_mesh(&mut self, mesh: &Py<PyAny>, auto_smooth: bool) -> Result<()> {
        let py = self.host.py();
        self.host
            .call_method1("finish_mesh", (mesh.bind(py), auto_smooth))?;
        Ok(())
    }

    fn link_and_activate(&mut self, mesh: &Py<PyAny>) -> Result<()> {
        let py = self.host.py();
        self.host
            .call_method1("link_and_activate", (mesh.bind(py),))?;
        Ok(())
    }

    fn discard_mesh(&mut self, mesh: &Py<PyAny>) -> Result<()> {
        let py = self.host.py();
        if self.host.hasattr("discard_mesh")? {
            self.host.call_method1("discard_mesh", (mesh.bind(py),))?;
        }
        Ok(())
    }
}
