//! Trigger контакты (host → ECS)
//!
//! Host сообщает о входе в trigger volume через `TriggerContact`.
//! ECS решает что это значит (смерть, pickup) в `StepSet::Resolve`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Категория (tag) сущности, с которой случился контакт
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum ContactTag {
    Enemy,
    Spike,
    Coin,
}

impl ContactTag {
    /// Контакт с этим tag убивает игрока
    pub fn is_hazard(self) -> bool {
        matches!(self, ContactTag::Enemy | ContactTag::Spike)
    }
}

/// Trigger volume (круг вокруг Transform)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct TriggerVolume {
    pub radius: f32,
    pub tag: ContactTag,
}

/// Событие: `entity` вошёл в trigger `other`
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TriggerContact {
    pub entity: Entity,
    pub other: Entity,
    pub tag: ContactTag,
}
