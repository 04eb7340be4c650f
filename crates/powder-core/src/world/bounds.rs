//! Fixed world dimensions and coordinate keys

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Width and height of the world, fixed at construction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    pub width: u32,
    pub height: u32,
}

impl GridBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, coord: IVec2) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
    }

    /// Packed key `x * height + y`, or None outside the grid.
    ///
    /// Ascending keys walk columns left to right, each column bottom to top.
    pub fn key(&self, coord: IVec2) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.x as usize * self.height as usize + coord.y as usize)
    }

    /// Inverse of [`GridBounds::key`]
    pub fn coord(&self, key: usize) -> Option<IVec2> {
        if key >= self.area() {
            return None;
        }
        let height = self.height as usize;
        Some(IVec2::new((key / height) as i32, (key % height) as i32))
    }
}
