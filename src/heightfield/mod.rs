/// Noise-driven heightfield generation.
///
/// `NoiseField` evaluates a fractal (multi-octave) Perlin height function
/// over a continuous 2D domain; `HeightfieldMeshBuilder` walks a regular
/// grid of lattice points and stitches the sampled heights into triangle
/// mesh buffers.
pub mod builder;
pub mod grid;
pub mod noise_field;

pub use builder::{GenerateError, HeightfieldMeshBuilder, TerrainGenerator};
pub use grid::GridSpec;
pub use noise_field::{NoiseField, NoiseParams};
