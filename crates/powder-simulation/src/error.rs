//! Registry errors

use thiserror::Error;

use crate::MaterialId;

/// Errors raised while building or querying the material registry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterialError {
    /// Lookup of an id that was never registered
    #[error("unknown material {0}")]
    UnknownMaterial(MaterialId),

    /// A second definition for an id that is already registered
    #[error("material {0} is already registered")]
    DuplicateMaterial(MaterialId),

    /// A tuning threshold or lifetime outside its valid range
    #[error("tuning value `{field}` = {value} is out of range")]
    InvalidTuning { field: &'static str, value: f32 },
}
