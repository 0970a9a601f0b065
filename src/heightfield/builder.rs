use super::grid::GridSpec;
use super::noise_field::{NoiseField, NoiseParams};
use crate::mesh::{MeshBuffers, Normal3D, Vertex3D, UV};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Converts a grid spec plus a noise field into triangulated mesh buffers.
pub struct HeightfieldMeshBuilder;

impl HeightfieldMeshBuilder {
    /// Generate vertex and index buffers for the full grid in one pass.
    ///
    /// Vertices are emitted in row-major order (`y` outer, `x` inner), one
    /// per lattice point, positioned at `(x, height, y)` with the height
    /// sampled from `noise`. Normals are the uniform up placeholder; callers
    /// wanting geometric normals run [`crate::mesh::recompute_smooth_normals`]
    /// afterwards.
    pub fn generate(grid: GridSpec, noise: &NoiseField) -> Result<MeshBuffers, GenerateError> {
        if !grid.is_valid() {
            return Err(GenerateError::InvalidArgument(format!(
                "grid dimensions must be at least 1x1, got {}x{}",
                grid.width, grid.length
            )));
        }

        let mut positions = Vec::with_capacity(grid.vertex_count());
        let mut uvs = Vec::with_capacity(grid.vertex_count());
        let mut normals = Vec::with_capacity(grid.vertex_count());

        for y in 0..=grid.length {
            for x in 0..=grid.width {
                let height = noise.height_at(x as f64, y as f64);

                positions.push(Vertex3D::new(x as f32, height as f32, y as f32));
                uvs.push(UV {
                    u: x as f32 / grid.width as f32,
                    v: y as f32 / grid.length as f32,
                });
                normals.push(Normal3D::up());
            }
        }

        // Indices follow directly from the row-major layout: no running
        // counter shared across the loops.
        let mut indices = Vec::with_capacity(grid.index_count());
        for y in 0..grid.length {
            for x in 0..grid.width {
                let vi = grid.vertex_index(x, y);

                indices.push(vi);
                indices.push(vi + grid.width + 1);
                indices.push(vi + 1);

                indices.push(vi + 1);
                indices.push(vi + grid.width + 1);
                indices.push(vi + grid.width + 2);
            }
        }

        debug!(
            vertices = positions.len(),
            indices = indices.len(),
            "generated heightfield mesh"
        );

        Ok(MeshBuffers {
            positions,
            uvs,
            normals,
            indices,
        })
    }
}

/// Host-facing generator holding the current configuration.
///
/// `configure` swaps parameters, `regenerate` produces a fresh mesh; the
/// hosting application decides when either happens (startup, a keypress,
/// a settings change). Each regeneration builds a new
/// `NoiseField` from the given seed, so the octave offsets are never reused
/// across calls.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    grid: GridSpec,
    params: NoiseParams,
}

impl TerrainGenerator {
    pub fn new(grid: GridSpec, params: NoiseParams) -> Self {
        Self { grid, params }
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn params(&self) -> NoiseParams {
        self.params
    }

    /// Replace the current grid and noise configuration.
    pub fn configure(&mut self, grid: GridSpec, params: NoiseParams) {
        self.grid = grid;
        self.params = params;
    }

    /// Build a fresh noise field from `seed` and generate the mesh.
    ///
    /// The seed is always explicit here; drawing it from system entropy is
    /// the caller's decision at the process boundary.
    pub fn regenerate(&self, seed: u64) -> Result<MeshBuffers, GenerateError> {
        let noise = NoiseField::seeded(self.params, seed);
        HeightfieldMeshBuilder::generate(self.grid, &noise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn generate(width: u32, length: u32) -> MeshBuffers {
        let noise = NoiseField::seeded(NoiseParams::default(), 12345);
        HeightfieldMeshBuilder::generate(GridSpec::new(width, length), &noise).unwrap()
    }

    #[test]
    fn test_buffer_sizes() {
        let mesh = generate(4, 3);
        assert_eq!(mesh.positions.len(), 5 * 4);
        assert_eq!(mesh.uvs.len(), 5 * 4);
        assert_eq!(mesh.normals.len(), 5 * 4);
        assert_eq!(mesh.indices.len(), 4 * 3 * 6);
    }

    #[test]
    fn test_two_by_two_scenario() {
        let mesh = generate(2, 2);
        assert_eq!(mesh.positions.len(), 9);
        assert_eq!(mesh.indices.len(), 24);

        // Center vertex (1,1) = index 4: interior valence is 6 with a fixed
        // cell diagonal.
        let center_uses = mesh.indices.iter().filter(|&&i| i == 4).count();
        assert_eq!(center_uses, 6);
    }

    #[test]
    fn test_indices_in_bounds() {
        let mesh = generate(7, 5);
        let vertex_count = mesh.positions.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < vertex_count));
    }

    #[test]
    fn test_uv_corners_and_range() {
        let mesh = generate(6, 4);

        for uv in &mesh.uvs {
            assert!((0.0..=1.0).contains(&uv.u));
            assert!((0.0..=1.0).contains(&uv.v));
        }

        let first = mesh.uvs.first().unwrap();
        let last = mesh.uvs.last().unwrap();
        assert_eq!((first.u, first.v), (0.0, 0.0));
        assert_eq!((last.u, last.v), (1.0, 1.0));
    }

    #[test]
    fn test_positions_follow_lattice() {
        let mesh = generate(3, 2);
        let grid = GridSpec::new(3, 2);

        for y in 0..=2 {
            for x in 0..=3 {
                let v = mesh.positions[grid.vertex_index(x, y) as usize];
                assert_eq!(v.x, x as f32);
                assert_eq!(v.z, y as f32);
            }
        }
    }

    #[test]
    fn test_vertex_valence() {
        // Interior vertices touch 6 triangles, edges 3, corners 1 or 2.
        let mesh = generate(3, 3);
        let grid = GridSpec::new(3, 3);

        let mut valence: HashMap<u32, usize> = HashMap::new();
        for &i in &mesh.indices {
            *valence.entry(i).or_default() += 1;
        }

        for y in 1..3 {
            for x in 1..3 {
                assert_eq!(valence[&grid.vertex_index(x, y)], 6);
            }
        }
        assert_eq!(valence[&grid.vertex_index(1, 0)], 3);
        assert_eq!(valence[&grid.vertex_index(0, 1)], 3);
        assert_eq!(valence[&grid.vertex_index(0, 0)], 1);
        assert_eq!(valence[&grid.vertex_index(3, 3)], 1);
        assert_eq!(valence[&grid.vertex_index(3, 0)], 2);
        assert_eq!(valence[&grid.vertex_index(0, 3)], 2);
    }

    #[test]
    fn test_every_cell_covered_twice() {
        let mesh = generate(4, 4);
        // Triangles sorted by their minimum index group two per cell anchor.
        let mut per_anchor: HashMap<u32, usize> = HashMap::new();
        for tri in mesh.indices.chunks_exact(3) {
            let anchor = *tri.iter().min().unwrap();
            *per_anchor.entry(anchor).or_default() += 1;
        }

        let grid = GridSpec::new(4, 4);
        // Each cell's two triangles share minimum index vi and vi+1.
        for y in 0..4 {
            for x in 0..4 {
                let vi = grid.vertex_index(x, y);
                assert!(per_anchor[&vi] >= 1);
            }
        }
        assert_eq!(mesh.indices.len() / 3, 32);
    }

    #[test]
    fn test_degenerate_grid_rejected() {
        let noise = NoiseField::seeded(NoiseParams::default(), 1);
        let result = HeightfieldMeshBuilder::generate(GridSpec::new(0, 3), &noise);
        assert!(matches!(result, Err(GenerateError::InvalidArgument(_))));
    }

    #[test]
    fn test_normals_are_uniform_up() {
        let mesh = generate(5, 5);
        assert!(mesh.normals.iter().all(|n| *n == Normal3D::up()));
    }

    #[test]
    fn test_regenerate_same_seed_is_reproducible() {
        let generator = TerrainGenerator::new(GridSpec::new(8, 8), NoiseParams::default());

        let a = generator.regenerate(77).unwrap();
        let b = generator.regenerate(77).unwrap();
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn test_regenerate_fresh_seed_changes_terrain() {
        let generator = TerrainGenerator::new(GridSpec::new(8, 8), NoiseParams::default());

        let a = generator.regenerate(1).unwrap();
        let b = generator.regenerate(2).unwrap();
        assert_ne!(a.positions, b.positions);
    }

    #[test]
    fn test_configure_replaces_settings() {
        let mut generator = TerrainGenerator::new(GridSpec::new(2, 2), NoiseParams::default());
        generator.configure(GridSpec::new(5, 6), NoiseParams::default());

        let mesh = generator.regenerate(3).unwrap();
        assert_eq!(mesh.positions.len(), 6 * 7);
    }
}
