use serde::{Deserialize, Serialize};

/// Dimensions of the heightfield lattice, counted in grid cells.
///
/// A grid of `width` x `length` cells carries `(width + 1) * (length + 1)`
/// vertices; both dimensions must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Cell columns (vertex columns minus one)
    pub width: u32,
    /// Cell rows (vertex rows minus one)
    pub length: u32,
}

impl GridSpec {
    pub fn new(width: u32, length: u32) -> Self {
        Self { width, length }
    }

    pub fn is_valid(&self) -> bool {
        self.width >= 1 && self.length >= 1
    }

    /// Vertices emitted by one generation pass.
    pub fn vertex_count(&self) -> usize {
        (self.width as usize + 1) * (self.length as usize + 1)
    }

    /// Triangle indices emitted by one generation pass (six per cell).
    pub fn index_count(&self) -> usize {
        self.width as usize * self.length as usize * 6
    }

    /// Row-major vertex index of lattice point `(x, y)`.
    pub fn vertex_index(&self, x: u32, y: u32) -> u32 {
        y * (self.width + 1) + x
    }
}
