//! STL encoding of mesh buffers.

use super::{MeshBuffer, Point3, Vector3};
use std::fmt::Write as _;
use std::io::Cursor;

fn facet_normal([a, b, c]: &[Point3; 3]) -> Vector3 {
    (b - a).cross(&(c - a)).try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
}

/// Binary STL, one facet per mesh triangle.
pub fn to_stl_binary(mesh: &MeshBuffer) -> std::io::Result<Vec<u8>> {
    use stl_io::{write_stl, Normal, Triangle, Vertex};

    let triangles: Vec<Triangle> = mesh
        .triangle_corners()
        .map(|tri| {
            let n = facet_normal(&tri);
            Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            }
        })
        .collect();

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// ASCII STL with the given solid name.
pub fn to_stl_ascii(mesh: &MeshBuffer, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "solid {}", name);
    for tri in mesh.triangle_corners() {
        let n = facet_normal(&tri);
        let _ = writeln!(out, "  facet normal {:.6} {:.6} {:.6}", n.x, n.y, n.z);
        out.push_str("    outer loop\n");
        for p in &tri {
            let _ = writeln!(out, "      vertex {:.6} {:.6} {:.6}", p.x, p.y, p.z);
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }
    let _ = writeln!(out, "endsolid {}", name);
    out
}
