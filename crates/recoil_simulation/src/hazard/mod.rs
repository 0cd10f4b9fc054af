//! Hazard domain - враги и шипы
//!
//! Hazard = TriggerVolume с тегом Enemy/Spike. Контакт с игроком убивает
//! (см. `player::death`). Враги дополнительно патрулируют вокруг anchor.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::PatrolTuning;
use crate::physics::ContactTag;
use crate::session::GameState;
use crate::StepSet;

/// Тип hazard'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Enemy,
    Spike,
}

impl HazardKind {
    pub fn tag(self) -> ContactTag {
        match self {
            HazardKind::Enemy => ContactTag::Enemy,
            HazardKind::Spike => ContactTag::Spike,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hazard {
    pub kind: HazardKind,
}

/// Патруль: туда-обратно по x вокруг фиксированного anchor
///
/// `direction` всегда ±1. Дистанция от anchor не превышает `range`
/// больше чем на один шаг движения.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HazardPatrol {
    pub anchor: Vec2,
    pub direction: f32,
    pub speed: f32,
    pub range: f32,
}

impl HazardPatrol {
    pub fn new(anchor: Vec2, tuning: &PatrolTuning) -> Self {
        Self {
            anchor,
            direction: 1.0,
            speed: tuning.speed,
            range: tuning.distance,
        }
    }
}

/// Один шаг патруля. Возвращает true, если направление развернулось.
pub fn advance_patrol(patrol: &mut HazardPatrol, transform: &mut Transform, delta: f32) -> bool {
    transform.translation.x += patrol.direction * patrol.speed * delta;

    let distance = transform.translation.truncate().distance(patrol.anchor);
    if distance < patrol.range {
        return false;
    }

    // Разворот только если ещё движемся "наружу": иначе на границе
    // патруль дрожал бы туда-обратно каждый шаг
    let outward = (transform.translation.x - patrol.anchor.x) * patrol.direction > 0.0;
    if !outward {
        return false;
    }

    patrol.direction = -patrol.direction;
    transform.scale.x = -transform.scale.x;
    true
}

/// Система: патруль всех hazard'ов (StepSet::Control)
pub fn patrol_hazards(
    time: Res<Time>,
    session: Res<GameState>,
    mut patrols: Query<(&mut HazardPatrol, &mut Transform)>,
) {
    if session.is_game_over() {
        return;
    }

    let delta = time.delta_secs();

    for (mut patrol, mut transform) in patrols.iter_mut() {
        advance_patrol(&mut patrol, &mut transform, delta);
    }
}

/// Hazard Plugin
pub struct HazardPlugin;

impl Plugin for HazardPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Hazard>()
            .register_type::<HazardPatrol>();

        app.add_systems(Update, patrol_hazards.in_set(StepSet::Control));
    }
}
