use anyhow::Result;
use nalgebra::Point3;

/// The data API of the application a mesh is imported into.
///
/// Mesh storage, attribute storage, normals and scene membership all
/// belong to the host, the importer only decides what to hand over.
/// [`Scene`](crate::scene::Scene) is an in-process implementation.
pub trait MeshHost {
    /// Whatever the host uses to refer to a created mesh.
    type Mesh;

    /// Create a mesh data block from positions and 0-based polygons.
    /// It is not part of any scene yet.
    fn create_mesh(
        &mut self,
        name: &str,
        points: &[Point3<f64>],
        faces: &[Vec<usize>],
    ) -> Result<Self::Mesh>;

    /// Store one float per vertex under `name`.
    fn attach_point_scalar(&mut self, mesh: &Self::Mesh, name: &str, values: &[f64])
    -> Result<()>;

    /// Recompute normals once all data is in place.
    fn finish_mesh(&mut self, mesh: &Self::Mesh, auto_smooth: bool) -> Result<()>;

    /// Put the mesh into the active scene as the active, selected object.
    fn link_and_activate(&mut self, mesh: &Self::Mesh) -> Result<()>;

    /// Throw away a mesh whose import failed part way.
    fn discard_mesh(&mut self, _mesh: &Self::Mesh) -> Result<()> {
        Ok(())
    }
}
