use super::{Aabb, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Flattened triangle mesh handed to callers after a build.
///
/// `vertices` and `normals` hold one `x, y, z` triple per vertex, `triangles`
/// holds three vertex indices per face (counter-clockwise seen from outside).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffer {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub triangles: Vec<u32>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append one face patch. Missing normals are computed from the
    /// area-weighted triangle normals of the patch.
    pub fn append(&mut self, positions: &[Point3], normals: Option<&[Vector3]>, triangles: &[[u32; 3]]) {
        let offset = self.vertex_count() as u32;

        for p in positions {
            self.vertices.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        }

        match normals {
            Some(n) if n.len() == positions.len() => {
                for v in n {
                    self.normals.extend_from_slice(&[v.x as f32, v.y as f32, v.z as f32]);
                }
            }
            _ => {
                let mut acc = vec![Vector3::zeros(); positions.len()];
                for tri in triangles {
                    let [a, b, c] = tri.map(|i| i as usize);
                    let n = (positions[b] - positions[a]).cross(&(positions[c] - positions[a]));
                    acc[a] += n;
                    acc[b] += n;
                    acc[c] += n;
                }
                for n in acc {
                    let n = n.try_normalize(1e-12).unwrap_or_else(Vector3::z);
                    self.normals.extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
                }
            }
        }

        for tri in triangles {
            self.triangles.extend(tri.iter().map(|i| i + offset));
        }
    }

    /// Concatenate another buffer onto this one.
    pub fn merge(&mut self, other: &MeshBuffer) {
        let offset = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.triangles.extend(other.triangles.iter().map(|i| i + offset));
    }

    pub fn position(&self, index: u32) -> Point3 {
        let i = index as usize * 3;
        Point3::new(
            self.vertices[i] as f64,
            self.vertices[i + 1] as f64,
            self.vertices[i + 2] as f64,
        )
    }

    pub fn positions(&self) -> impl Iterator<Item = Point3> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|c| Point3::new(c[0] as f64, c[1] as f64, c[2] as f64))
    }

    /// Corner positions of every triangle.
    pub fn triangle_corners(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.triangles
            .chunks_exact(3)
            .map(|t| [self.position(t[0]), self.position(t[1]), self.position(t[2])])
    }

    /// Box around the vertices that are actually referenced by triangles.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(self.triangles.iter().map(|&i| self.position(i)))
    }

    /// Enclosed volume by the divergence theorem. Only meaningful for
    /// closed, consistently oriented meshes.
    pub fn volume(&self) -> f64 {
        self.triangle_corners()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
            .sum()
    }

    pub fn surface_area(&self) -> f64 {
        self.triangle_corners()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }
}
