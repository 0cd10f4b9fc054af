//! Collision Layers
//!
//! ## Layers (битовая маска):
//! - Bit 0 (0b1 = 1): Ground (платформы, стены - по ним работает ground probe)
//! - Bit 1 (0b10 = 2): Actors (игрок)
//! - Bit 2 (0b100 = 4): Triggers (hazards, монеты)
//!
//! Raycast фильтр: `ray.layers.intersects(collider.layers)`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub struct CollisionLayers(pub u32);

impl CollisionLayers {
    pub const NONE: Self = Self(0);
    pub const GROUND: Self = Self(0b1);
    pub const ACTORS: Self = Self(0b10);
    pub const TRIGGERS: Self = Self(0b100);
    pub const ALL: Self = Self(u32::MAX);

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for CollisionLayers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_filter() {
        let mask = CollisionLayers::GROUND | CollisionLayers::TRIGGERS;
        assert!(mask.intersects(CollisionLayers::GROUND));
        assert!(!mask.intersects(CollisionLayers::ACTORS));
        assert!(!CollisionLayers::NONE.intersects(CollisionLayers::ALL));
    }
}
