pub mod config;
pub mod export;
pub mod heightfield;
pub mod mesh;

pub use config::GeneratorConfig;
pub use heightfield::{GenerateError, GridSpec, NoiseField, NoiseParams, TerrainGenerator};
pub use mesh::MeshBuffers;
