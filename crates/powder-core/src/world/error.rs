//! Grid and world errors

use glam::IVec2;
use powder_simulation::MaterialError;
use thiserror::Error;

use super::ParticleHandle;

/// Errors from occupancy and particle operations
///
/// Collisions are expected during play: callers on the tick path treat
/// `OutOfBounds` and `CellOccupied` as a no-op, not a failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("coordinate {0} is outside the grid")]
    OutOfBounds(IVec2),

    #[error("cell {0} is already occupied")]
    CellOccupied(IVec2),

    #[error("cell {0} holds no particle")]
    EmptyCell(IVec2),

    #[error("particle handle {0:?} is no longer live")]
    StaleHandle(ParticleHandle),

    #[error("grid bounds {width}x{height} must be non-zero")]
    InvalidBounds { width: u32, height: u32 },

    #[error(transparent)]
    Material(#[from] MaterialError),
}

pub type SimResult<T> = Result<T, SimError>;
