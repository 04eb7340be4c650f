//! Transition rules attached to material definitions
//!
//! A material changes in three data-driven ways:
//! - a [`Reaction`] with an orthogonal neighbour
//! - an [`AgeTransition`] once the particle is old enough
//! - an [`Emission`] that creates a new particle next to it

use serde::{Deserialize, Serialize};

use crate::{MaterialDef, MaterialId};

/// Which neighbours a reaction applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactsWith {
    /// Exactly this material
    Material(MaterialId),
    /// Any flammable material
    Flammable,
    /// Any material that is not acid resistant
    Dissolvable,
}

impl ReactsWith {
    pub fn matches(&self, other: &MaterialDef) -> bool {
        match self {
            ReactsWith::Material(id) => other.id == *id,
            ReactsWith::Flammable => other.flammable,
            ReactsWith::Dissolvable => !other.acid_resistant,
        }
    }
}

/// What happens to one side of a reaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Keep,
    Become(MaterialId),
    Destroy,
}

/// Reaction between a particle and one of its neighbours
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub with: ReactsWith,
    /// Outcome for the particle owning the reaction
    pub this: Outcome,
    /// Outcome for the matched neighbour
    pub other: Outcome,
    /// Probability per tick and per matching neighbour
    pub chance: f32,
}

/// Spontaneous change once a particle has lived `after_ticks` ticks
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgeTransition {
    pub after_ticks: u32,
    pub into: MaterialId,
    pub chance: f32,
}

/// New particle created at an offset from the emitter (e.g. smoke above fire)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    pub material: MaterialId,
    pub dx: i32,
    pub dy: i32,
    pub chance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reacts_with_material() {
        let water = MaterialDef {
            id: MaterialId::WATER,
            ..Default::default()
        };
        assert!(ReactsWith::Material(MaterialId::WATER).matches(&water));
        assert!(!ReactsWith::Material(MaterialId::SAND).matches(&water));
    }

    #[test]
    fn test_reacts_with_flammable() {
        let wood = MaterialDef {
            id: MaterialId::WOOD,
            flammable: true,
            ..Default::default()
        };
        let stone = MaterialDef {
            id: MaterialId::STONE,
            ..Default::default()
        };
        assert!(ReactsWith::Flammable.matches(&wood));
        assert!(!ReactsWith::Flammable.matches(&stone));
    }

    #[test]
    fn test_reacts_with_dissolvable() {
        let glass = MaterialDef {
            id: MaterialId::GLASS,
            acid_resistant: true,
            ..Default::default()
        };
        let sand = MaterialDef {
            id: MaterialId::SAND,
            ..Default::default()
        };
        assert!(!ReactsWith::Dissolvable.matches(&glass));
        assert!(ReactsWith::Dissolvable.matches(&sand));
    }
}
