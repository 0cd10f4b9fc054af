//! Player events

use bevy::prelude::*;

use crate::physics::ContactTag;

/// Событие: игрок умер (hazard contact)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerDied {
    pub entity: Entity,
    /// Что убило (Enemy / Spike)
    pub cause: ContactTag,
}

/// Событие: выстрел recoil оружия
///
/// Consumers: host (звук, muzzle flash), headless лог.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct RecoilFired {
    pub entity: Entity,
    pub impulse: Vec2,
    pub ammo_left: u32,
}
