use std::sync::RwLock;

use anyhow::{Result, anyhow};
use log::warn;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use surfmeasure_macro::cache_access;

use crate::attributes::Attributes;

// The inner cache for the PolyMesh struct. Any method that uses
// the `#[cache_access]` macro will be stored here.
#[derive(Default, Debug, Clone)]
pub struct InnerCache {
    pub faces_cross: Option<Vec<Vector3<f64>>>,
    pub face_normals: Option<Vec<Vector3<f64>>>,
    pub vertex_normals: Option<Vec<Vector3<f64>>>,
    pub area: Option<f64>,
}

/// A polygon mesh as it is stored in a scene: vertices, arbitrary
/// polygons indexing them and named per-vertex attributes.
#[derive(Default, Debug)]
pub struct PolyMesh {
    pub name: String,
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Vec<usize>>,

    pub attributes_vertex: Attributes,

    // shade smooth across faces when rendered
    pub auto_smooth: bool,

    // the cached values computed for the mesh
    pub _cache: RwLock<InnerCache>,
}

impl Clone for PolyMesh {
    // don't copy the cache, it is cheap to rebuild
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            vertices: self.vertices.clone(),
            faces: self.faces.clone(),
            attributes_vertex: self.attributes_vertex.clone(),
            auto_smooth: self.auto_smooth,
            _cache: RwLock::new(InnerCache::default()),
        }
    }
}

impl PolyMesh {
    /// Create a mesh, checking that every face index refers to a vertex.
    ///
    /// Faces with fewer than three corners are kept but reported.
    pub fn new(name: &str, vertices: Vec<Point3<f64>>, faces: Vec<Vec<usize>>) -> Result<Self> {
        let count = vertices.len();
        if let Some((face, index)) = faces.iter().enumerate().find_map(|(i, f)| {
            f.iter().find(|&&v| v >= count).map(|&v| (i, v))
        }) {
            return Err(anyhow!(
                "face {face} references vertex {index} but the mesh has {count} vertices"
            ));
        }

        let degenerate = faces.iter().filter(|f| f.len() < 3).count();
        if degenerate > 0 {
            warn!("mesh `{name}` has {degenerate} faces with fewer than 3 vertices");
        }

        Ok(Self {
            name: name.to_string(),
            vertices,
            faces,
            ..Default::default()
        })
    }

    /// The vertex positions as a flat `[x0, y0, z0, x1, ...]` slice.
    pub fn flat_vertices(&self) -> &[f64] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Drop every cached value so it is recomputed on the next access.
    pub fn clear_cache(&self) {
        let mut cache = self
            ._cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *cache = InnerCache::default();
    }

    /// Recompute the normals and set smooth shading.
    pub fn calc_normals(&mut self, auto_smooth: bool) {
        self.clear_cache();
        self.auto_smooth = auto_smooth;
        self.vertex_normals();
    }

    /// The non-normalized polygon normal of every face using Newell's
    /// method, its length is twice the polygon area for planar faces.
    #[cache_access]
    pub fn faces_cross(&self) -> Vec<Vector3<f64>> {
        self.faces
            .par_iter()
            .map(|face| {
                face.iter()
                    .zip(face.iter().cycle().skip(1))
                    .map(|(&a, &b)| self.vertices[a].coords.cross(&self.vertices[b].coords))
                    .sum::<Vector3<f64>>()
            })
            .collect()
    }

    /// The unit normal of every face, zero for degenerate faces.
    #[cache_access]
    pub fn face_normals(&self) -> Vec<Vector3<f64>> {
        self.faces_cross()
            .par_iter()
            .map(|cross| cross.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros))
            .collect()
    }

    /// Area weighted unit normals for every vertex, zero for vertices
    /// that aren't used by any face.
    #[cache_access]
    pub fn vertex_normals(&self) -> Vec<Vector3<f64>> {
        let mut sums = vec![Vector3::zeros(); self.vertices.len()];
        for (face, cross) in self.faces.iter().zip(self.faces_cross().iter()) {
            for &index in face {
                sums[index] += cross;
            }
        }
        sums.into_iter()
            .map(|n| n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros))
            .collect()
    }

    /// The summed area of every face in the mesh.
    #[cache_access]
    pub fn area(&self) -> f64 {
        self.faces_cross().iter().map(|c| c.norm() / 2.0).sum()
    }

    /// Calculate an axis-aligned bounding box (AABB) for the mesh,
    /// or an error if the mesh is empty.
    pub fn bounds(&self) -> Result<(Point3<f64>, Point3<f64>)> {
        let Some(first) = self.vertices.first() else {
            return Err(anyhow!("Mesh has no vertices"));
        };

        let (mut lower, mut upper) = (*first, *first);
        for vertex in self.vertices.iter().skip(1) {
            // use componentwise min/max
            lower = lower.inf(vertex);
            upper = upper.sup(vertex);
        }

        Ok((lower, upper))
    }

    /// Store a scalar for every vertex under `name`.
    pub fn add_scalar(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        if values.len() != self.vertices.len() {
            return Err(anyhow!(
                "attribute `{name}` has {} values for {} vertices",
                values.len(),
                self.vertices.len()
            ));
        }
        self.attributes_vertex.insert_scalar(name, values)
    }

    pub fn scalar(&self, name: &str) -> Option<&[f64]> {
        self.attributes_vertex.scalar(name)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::relative_eq;

    fn triangle() -> PolyMesh {
        PolyMesh::new(
            "tri",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn test_mesh_normals() {
        let m = triangle();
        let normals = m.face_normals();
        assert_eq!(normals.len(), 1);
        assert!(relative_eq!(
            normals[0],
            Vector3::new(0.0, 0.0, 1.0),
            epsilon = 1e-12
        ));

        for n in m.vertex_normals() {
            assert!(relative_eq!(n, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12));
        }
        assert!(relative_eq!(m.area(), 0.5, epsilon = 1e-12));
    }

    #[test]
    fn test_mesh_quad() {
        let m = PolyMesh::new(
            "quad",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 2.0, 0.0),
                Point3::new(0.0, 2.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        )
        .unwrap();
        assert!(relative_eq!(m.area(), 4.0, epsilon = 1e-12));
        assert!(relative_eq!(
            m.face_normals()[0],
            Vector3::new(0.0, 0.0, 1.0),
            epsilon = 1e-12
        ));
    }

    #[test]
    fn test_mesh_cache_cleared() {
        let mut m = triangle();
        assert!(relative_eq!(m.area(), 0.5, epsilon = 1e-12));

        // move a vertex, the cached area is stale until recomputed
        m.vertices[1] = Point3::new(2.0, 0.0, 0.0);
        assert!(relative_eq!(m.area(), 0.5, epsilon = 1e-12));
        m.calc_normals(true);
        assert!(relative_eq!(m.area(), 1.0, epsilon = 1e-12));
        assert!(m.auto_smooth);
    }

    #[test]
    fn test_mesh_validation() {
        let points = vec![Point3::new(0.0, 0.0, 0.0); 3];
        assert!(PolyMesh::new("bad", points.clone(), vec![vec![0, 1, 3]]).is_err());

        // degenerate faces are allowed and have a zero normal
        let m = PolyMesh::new("line", points, vec![vec![0, 1]]).unwrap();
        assert_eq!(m.face_normals()[0], Vector3::zeros());
        assert_eq!(m.vertex_normals()[2], Vector3::zeros());
    }

    #[test]
    fn test_mesh_scalars() {
        let mut m = triangle();
        m.add_scalar("Measure1", vec![5.5, 6.5, 7.5]).unwrap();
        assert!(m.add_scalar("Measure2", vec![1.0]).is_err());
        assert_eq!(m.scalar("Measure1"), Some(&[5.5, 6.5, 7.5][..]));
    }

    #[test]
    fn test_mesh_bounds_flat() {
        let m = triangle();
        let bounds = m.bounds().unwrap();
        assert_eq!(bounds.0, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.1, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(
            m.flat_vertices(),
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
        assert!(PolyMesh::default().bounds().is_err());

        let copy = m.clone();
        assert_eq!(copy.vertices, m.vertices);
    }
}
