use serde::{Deserialize, Serialize};

/// Triangulated heightfield mesh as parallel per-vertex buffers.
///
/// Buffer lengths are coupled: `positions`, `uvs` and `normals` all have one
/// entry per vertex, and `indices` holds three entries per triangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshBuffers {
    pub positions: Vec<Vertex3D>,
    pub uvs: Vec<UV>,
    pub normals: Vec<Normal3D>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normal3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UV {
    pub u: f32,
    pub v: f32,
}

impl Vertex3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn sub(&self, other: &Vertex3D) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    pub fn cross(&self, other: &Vertex3D) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn normalize(&self) -> Normal3D {
        let length = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if length > 0.0001 {
            Normal3D {
                x: self.x / length,
                y: self.y / length,
                z: self.z / length,
            }
        } else {
            Normal3D::up()
        }
    }
}

impl Normal3D {
    /// The placeholder normal every generated vertex starts with (Y-up).
    pub fn up() -> Self {
        Self {
            x: 0.0,
            y: 1.0,
            z: 0.0,
        }
    }
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex positions for the debug-marker overlay.
    pub fn debug_points(&self) -> &[Vertex3D] {
        &self.positions
    }
}

/// Replace the uniform up normals with smooth per-vertex normals accumulated
/// from the actual triangle geometry.
///
/// This is an explicit opt-in pass; generation always leaves the placeholder
/// up normals in place.
pub fn recompute_smooth_normals(mesh: &mut MeshBuffers) {
    let mut accumulators: Vec<(f32, f32, f32)> = vec![(0.0, 0.0, 0.0); mesh.positions.len()];

    for triangle in mesh.indices.chunks_exact(3) {
        let i0 = triangle[0] as usize;
        let i1 = triangle[1] as usize;
        let i2 = triangle[2] as usize;

        let v0 = &mesh.positions[i0];
        let v1 = &mesh.positions[i1];
        let v2 = &mesh.positions[i2];

        let edge1 = v1.sub(v0);
        let edge2 = v2.sub(v0);
        let face_normal = edge1.cross(&edge2).normalize();

        for &i in &[i0, i1, i2] {
            accumulators[i].0 += face_normal.x;
            accumulators[i].1 += face_normal.y;
            accumulators[i].2 += face_normal.z;
        }
    }

    for (i, acc) in accumulators.iter().enumerate() {
        mesh.normals[i] = Vertex3D::new(acc.0, acc.1, acc.2).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_quad() -> MeshBuffers {
        // Two triangles spanning a unit cell in the XZ plane.
        MeshBuffers {
            positions: vec![
                Vertex3D::new(0.0, 0.0, 0.0),
                Vertex3D::new(1.0, 0.0, 0.0),
                Vertex3D::new(0.0, 0.0, 1.0),
                Vertex3D::new(1.0, 0.0, 1.0),
            ],
            uvs: vec![
                UV { u: 0.0, v: 0.0 },
                UV { u: 1.0, v: 0.0 },
                UV { u: 0.0, v: 1.0 },
                UV { u: 1.0, v: 1.0 },
            ],
            normals: vec![Normal3D::up(); 4],
            indices: vec![0, 2, 1, 1, 2, 3],
        }
    }

    #[test]
    fn test_cross_product() {
        let x = Vertex3D::new(1.0, 0.0, 0.0);
        let z = Vertex3D::new(0.0, 0.0, 1.0);
        let cross = z.cross(&x);

        assert_eq!(cross.y, 1.0);
        assert_eq!(cross.x, 0.0);
        assert_eq!(cross.z, 0.0);
    }

    #[test]
    fn test_normalize_degenerate_falls_back_to_up() {
        let zero = Vertex3D::new(0.0, 0.0, 0.0);
        assert_eq!(zero.normalize(), Normal3D::up());
    }

    #[test]
    fn test_smooth_normals_on_flat_mesh_point_up() {
        let mut mesh = flat_quad();
        recompute_smooth_normals(&mut mesh);

        for normal in &mesh.normals {
            assert!((normal.x).abs() < 1e-6);
            assert!((normal.y - 1.0).abs() < 1e-6);
            assert!((normal.z).abs() < 1e-6);
        }
    }

    #[test]
    fn test_counts() {
        let mesh = flat_quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.debug_points().len(), 4);
    }
}
