//! Initial world contents, re-applied on reset

use glam::IVec2;
use powder_simulation::{MaterialError, MaterialId, Materials};
use serde::{Deserialize, Serialize};

use super::{Grid, GridBounds};

/// One shape of material placed at setup
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutFeature {
    /// Full-height column at `x`
    Column { x: i32, material: MaterialId },
    /// Full-width row at `y`
    Row { y: i32, material: MaterialId },
    /// Filled rectangle, corners inclusive
    Rect {
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
        material: MaterialId,
    },
    Cell { x: i32, y: i32, material: MaterialId },
}

impl LayoutFeature {
    pub fn material(&self) -> MaterialId {
        match *self {
            LayoutFeature::Column { material, .. }
            | LayoutFeature::Row { material, .. }
            | LayoutFeature::Rect { material, .. }
            | LayoutFeature::Cell { material, .. } => material,
        }
    }

    /// In-bounds cells covered by this feature
    pub fn cells(&self, bounds: GridBounds) -> Vec<IVec2> {
        let width = bounds.width as i32;
        let height = bounds.height as i32;
        let (min, max) = match *self {
            LayoutFeature::Column { x, .. } => (IVec2::new(x, 0), IVec2::new(x, height - 1)),
            LayoutFeature::Row { y, .. } => (IVec2::new(0, y), IVec2::new(width - 1, y)),
            LayoutFeature::Rect {
                min_x,
                min_y,
                max_x,
                max_y,
                ..
            } => (IVec2::new(min_x, min_y), IVec2::new(max_x, max_y)),
            LayoutFeature::Cell { x, y, .. } => (IVec2::new(x, y), IVec2::new(x, y)),
        };

        let min = min.max(IVec2::ZERO);
        let max = max.min(IVec2::new(width - 1, height - 1));
        (min.x..=max.x)
            .flat_map(|x| (min.y..=max.y).map(move |y| IVec2::new(x, y)))
            .filter(|coord| bounds.contains(*coord))
            .collect()
    }
}

/// Ordered list of features; where two overlap the first one wins
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldLayout {
    pub features: Vec<LayoutFeature>,
}

impl Default for WorldLayout {
    /// Stone column at x = 25 crossing a sand row at y = 25
    fn default() -> Self {
        Self {
            features: vec![
                LayoutFeature::Column {
                    x: 25,
                    material: MaterialId::STONE,
                },
                LayoutFeature::Row {
                    y: 25,
                    material: MaterialId::SAND,
                },
            ],
        }
    }
}

impl WorldLayout {
    pub fn empty() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    pub fn with_feature(mut self, feature: LayoutFeature) -> Self {
        self.features.push(feature);
        self
    }

    /// Every placement the layout makes, in application order
    pub fn placements(&self, bounds: GridBounds) -> Vec<(IVec2, MaterialId)> {
        self.features
            .iter()
            .flat_map(|feature| {
                let material = feature.material();
                feature
                    .cells(bounds)
                    .into_iter()
                    .map(move |coord| (coord, material))
            })
            .collect()
    }

    /// Every feature must name a registered material
    pub fn validate(&self, materials: &Materials) -> Result<(), MaterialError> {
        for feature in &self.features {
            materials.get(feature.material())?;
        }
        Ok(())
    }

    /// Place the layout into `grid`, skipping cells already taken
    ///
    /// Returns the number of particles created.
    pub fn apply(&self, grid: &mut Grid, materials: &Materials) -> usize {
        let mut placed = 0;
        for (coord, material) in self.placements(grid.bounds()) {
            let def = match materials.get(material) {
                Ok(def) => def,
                Err(err) => {
                    log::warn!("Skipping layout cell {coord}: {err}");
                    continue;
                }
            };
            if grid.spawn(coord, def).is_ok() {
                placed += 1;
            }
        }
        placed
    }
}
