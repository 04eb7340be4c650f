//! Material definitions and registry

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    AgeTransition, Emission, MaterialError, MaterialTuning, Outcome, Reaction, ReactsWith,
};

/// Identifier of a material in the registry
///
/// Empty cells are not a material; the grid stores them as `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u16);

impl MaterialId {
    pub const STONE: MaterialId = MaterialId(1);
    pub const SAND: MaterialId = MaterialId(2);
    pub const WATER: MaterialId = MaterialId(3);
    pub const WOOD: MaterialId = MaterialId(4);
    pub const FIRE: MaterialId = MaterialId(5);
    pub const SMOKE: MaterialId = MaterialId(6);
    pub const STEAM: MaterialId = MaterialId(7);
    pub const ACID: MaterialId = MaterialId(8);
    pub const GLASS: MaterialId = MaterialId(9);
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a material behaves physically
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorClass {
    /// Never moves (stone, wood, glass)
    SolidStatic,
    /// Falls, piles up (sand)
    SolidGranular,
    /// Falls and flows sideways (water, acid)
    Liquid,
    /// Rises (smoke, steam)
    Gas,
    /// Burns in place and transforms its surroundings (fire)
    Reactive,
}

/// Remaining ticks of a particle, or the default for a material
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifetime {
    Unlimited,
    Ticks(u32),
}

impl Lifetime {
    pub fn is_finite(self) -> bool {
        matches!(self, Lifetime::Ticks(_))
    }

    pub fn remaining(self) -> Option<u32> {
        match self {
            Lifetime::Unlimited => None,
            Lifetime::Ticks(n) => Some(n),
        }
    }

    /// Advance by one tick. Returns true once the lifetime is used up.
    pub fn tick(&mut self) -> bool {
        match self {
            Lifetime::Unlimited => false,
            Lifetime::Ticks(n) => {
                *n = n.saturating_sub(1);
                *n == 0
            }
        }
    }
}

/// Definition of a material's properties
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialDef {
    pub id: MaterialId,
    pub name: String,
    pub behavior: BehaviorClass,

    /// Base color (RGBA) for the presentation layer
    pub color: [u8; 4],

    /// Relative density - heavier granular/liquid particles sink through lighter fluids
    pub density: f32,

    /// Lifetime a freshly created particle starts with
    pub lifetime: Lifetime,

    pub flammable: bool,
    pub acid_resistant: bool,

    /// Neighbour reactions, tried in order
    pub reactions: Vec<Reaction>,
    pub decay: Option<AgeTransition>,
    pub emission: Option<Emission>,
}

impl Default for MaterialDef {
    fn default() -> Self {
        Self {
            id: MaterialId(0),
            name: "unknown".to_string(),
            behavior: BehaviorClass::SolidStatic,
            color: [255, 0, 255, 255], // Magenta for missing materials
            density: 1.0,
            lifetime: Lifetime::Unlimited,
            flammable: false,
            acid_resistant: false,
            reactions: Vec::new(),
            decay: None,
            emission: None,
        }
    }
}

/// Registry of all materials
#[derive(Debug, Clone)]
pub struct Materials {
    materials: Vec<Option<MaterialDef>>,
}

impl Materials {
    /// Built-in materials with default tuning
    pub fn new() -> Self {
        Self::with_tuning(&MaterialTuning::default())
    }

    /// Registry with no materials at all
    pub fn empty() -> Self {
        Self {
            materials: Vec::new(),
        }
    }

    /// Built-in materials using the given thresholds
    pub fn with_tuning(tuning: &MaterialTuning) -> Self {
        let mut materials = Self::empty();
        materials.register_defaults(tuning);
        materials
    }

    fn register_defaults(&mut self, tuning: &MaterialTuning) {
        self.insert(MaterialDef {
            id: MaterialId::STONE,
            name: "stone".to_string(),
            behavior: BehaviorClass::SolidStatic,
            color: [128, 128, 128, 255],
            density: 2.5,
            acid_resistant: true,
            ..Default::default()
        });

        // Sand fused by fire becomes glass
        self.insert(MaterialDef {
            id: MaterialId::SAND,
            name: "sand".to_string(),
            behavior: BehaviorClass::SolidGranular,
            color: [194, 178, 128, 255],
            density: 1.5,
            reactions: vec![Reaction {
                with: ReactsWith::Material(MaterialId::FIRE),
                this: Outcome::Become(MaterialId::GLASS),
                other: Outcome::Keep,
                chance: tuning.sand.vitrify_chance,
            }],
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: MaterialId::WATER,
            name: "water".to_string(),
            behavior: BehaviorClass::Liquid,
            color: [64, 164, 223, 200],
            density: 1.0,
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: MaterialId::WOOD,
            name: "wood".to_string(),
            behavior: BehaviorClass::SolidStatic,
            color: [139, 90, 43, 255],
            density: 0.6,
            flammable: true,
            reactions: vec![Reaction {
                with: ReactsWith::Material(MaterialId::FIRE),
                this: Outcome::Become(MaterialId::FIRE),
                other: Outcome::Keep,
                chance: tuning.wood.ignite_chance,
            }],
            ..Default::default()
        });

        // Water is checked before fuel so a doused flame never spreads first
        self.insert(MaterialDef {
            id: MaterialId::FIRE,
            name: "fire".to_string(),
            behavior: BehaviorClass::Reactive,
            color: [255, 100, 0, 255],
            density: 0.0001,
            lifetime: Lifetime::Ticks(tuning.fire.lifetime),
            reactions: vec![
                Reaction {
                    with: ReactsWith::Material(MaterialId::WATER),
                    this: Outcome::Become(MaterialId::STEAM),
                    other: Outcome::Destroy,
                    chance: tuning.fire.extinguish_chance,
                },
                Reaction {
                    with: ReactsWith::Flammable,
                    this: Outcome::Keep,
                    other: Outcome::Become(MaterialId::FIRE),
                    chance: tuning.fire.spread_chance,
                },
            ],
            emission: Some(Emission {
                material: MaterialId::SMOKE,
                dx: 0,
                dy: 1,
                chance: tuning.fire.smoke_chance,
            }),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: MaterialId::SMOKE,
            name: "smoke".to_string(),
            behavior: BehaviorClass::Gas,
            color: [60, 60, 60, 150],
            density: 0.001,
            lifetime: Lifetime::Ticks(tuning.smoke.lifetime),
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: MaterialId::STEAM,
            name: "steam".to_string(),
            behavior: BehaviorClass::Gas,
            color: [200, 200, 200, 100],
            density: 0.0006,
            lifetime: Lifetime::Ticks(tuning.steam.lifetime),
            decay: Some(AgeTransition {
                after_ticks: tuning.steam.condense_after,
                into: MaterialId::WATER,
                chance: tuning.steam.condense_chance,
            }),
            ..Default::default()
        });

        // Acid is used up by whatever it dissolves
        self.insert(MaterialDef {
            id: MaterialId::ACID,
            name: "acid".to_string(),
            behavior: BehaviorClass::Liquid,
            color: [0, 255, 0, 200],
            density: 1.1,
            acid_resistant: true,
            reactions: vec![Reaction {
                with: ReactsWith::Dissolvable,
                this: Outcome::Destroy,
                other: Outcome::Destroy,
                chance: tuning.acid.dissolve_chance,
            }],
            ..Default::default()
        });

        self.insert(MaterialDef {
            id: MaterialId::GLASS,
            name: "glass".to_string(),
            behavior: BehaviorClass::SolidStatic,
            color: [200, 220, 255, 150],
            density: 2.5,
            acid_resistant: true,
            ..Default::default()
        });
    }

    fn insert(&mut self, material: MaterialDef) {
        let id = material.id.0 as usize;

        // Ensure vec is large enough
        if self.materials.len() <= id {
            self.materials.resize(id + 1, None);
        }

        self.materials[id] = Some(material);
    }

    /// Add a material. Registration happens at startup; ids are never replaced.
    pub fn register(&mut self, material: MaterialDef) -> Result<(), MaterialError> {
        if self.contains(material.id) {
            return Err(MaterialError::DuplicateMaterial(material.id));
        }
        log::debug!("Registered material {} ({})", material.name, material.id);
        self.insert(material);
        Ok(())
    }

    /// Get material definition by ID
    pub fn get(&self, id: MaterialId) -> Result<&MaterialDef, MaterialError> {
        self.materials
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(MaterialError::UnknownMaterial(id))
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        self.get(id).is_ok()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&MaterialDef> {
        self.iter().find(|def| def.name == name)
    }

    /// Get color for a material
    pub fn color(&self, id: MaterialId) -> Result<[u8; 4], MaterialError> {
        self.get(id).map(|def| def.color)
    }

    /// Registered materials in id order
    pub fn iter(&self) -> impl Iterator<Item = &MaterialDef> {
        self.materials.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Materials {
    fn default() -> Self {
        Self::new()
    }
}
