use anyhow::{Result, anyhow};
use log::debug;
use nalgebra::Point3;

use crate::host::MeshHost;
use crate::mesh::PolyMesh;

/// An object linked into the scene, referring to one mesh data block.
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    // A human readable name, unique within the scene
    pub name: String,

    // the index into the Scene's meshes
    pub mesh: usize,

    pub selected: bool,
}

/// An in-process stand-in for a 3D application's data API.
///
/// Meshes are created as unlinked data blocks and only show up in
/// `nodes` once linked, the most recently linked node is the active one.
#[derive(Debug, Default)]
pub struct Scene {
    // mesh data blocks, `None` once discarded
    pub meshes: Vec<Option<PolyMesh>>,

    // A flat list of linked objects.
    pub nodes: Vec<SceneNode>,

    // The node index of the active object.
    pub active: Option<usize>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    /// The mesh behind a handle, if it hasn't been discarded.
    pub fn mesh(&self, handle: usize) -> Option<&PolyMesh> {
        self.meshes.get(handle).and_then(|m| m.as_ref())
    }

    fn mesh_mut(&mut self, handle: usize) -> Result<&mut PolyMesh> {
        self.meshes
            .get_mut(handle)
            .and_then(|m| m.as_mut())
            .ok_or_else(|| anyhow!("no mesh with handle {handle}"))
    }

    pub fn active_node(&self) -> Option<&SceneNode> {
        self.active.and_then(|i| self.nodes.get(i))
    }

    /// The mesh of the active object.
    pub fn active_mesh(&self) -> Option<&PolyMesh> {
        self.active_node().and_then(|n| self.mesh(n.mesh))
    }

    pub fn node_by_name(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// `name` if it is free, otherwise `name.001`, `name.002`, ...
    fn unique_name(&self, name: &str) -> String {
        if self.node_by_name(name).is_none() {
            return name.to_string();
        }
        (1..)
            .map(|i| format!("{name}.{i:03}"))
            .find(|candidate| self.node_by_name(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }

    pub fn add_node(&mut self, node: SceneNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        index
    }
}

impl MeshHost for Scene {
    type Mesh = usize;

    fn create_mesh(
        &mut self,
        name: &str,
        points: &[Point3<f64>],
        faces: &[Vec<usize>],
    ) -> Result<usize> {
        let mesh = PolyMesh::new(name, points.to_vec(), faces.to_vec())?;
        self.meshes.push(Some(mesh));
        Ok(self.meshes.len() - 1)
    }

    fn attach_point_scalar(&mut self, mesh: &usize, name: &str, values: &[f64]) -> Result<()> {
        self.mesh_mut(*mesh)?.add_scalar(name, values.to_vec())
    }

    fn finish_mesh(&mut self, mesh: &usize, auto_smooth: bool) -> Result<()> {
        self.mesh_mut(*mesh)?.calc_normals(auto_smooth);
        Ok(())
    }

    fn link_and_activate(&mut self, mesh: &usize) -> Result<()> {
        let base = self.mesh_mut(*mesh)?.name.clone();
        let name = self.unique_name(&base);

        for node in self.nodes.iter_mut() {
            node.selected = false;
        }
        let index = self.add_node(SceneNode {
            name,
            mesh: *mesh,
            selected: true,
        });
        self.active = Some(index);
        debug!("linked object `{}`", self.nodes[index].name);
        Ok(())
    }

    fn discard_mesh(&mut self, mesh: &usize) -> Result<()> {
        let slot = self
            .meshes
            .get_mut(*mesh)
            .ok_or_else(|| anyhow!("no mesh with handle {mesh}"))?;
        *slot = None;

        // node indices shift, keep pointing at the same active object
        let active = self.active_node().map(|n| n.name.clone());
        self.nodes.retain(|n| n.mesh != *mesh);
        self.active = active.and_then(|name| self.nodes.iter().position(|n| n.name == name));
        Ok(())
    }
}
