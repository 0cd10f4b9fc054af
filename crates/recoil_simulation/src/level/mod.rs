//! Level domain - layout уровня и spawn сессии
//!
//! Всё, что спавнится для сессии, помечено `SessionEntity`: restart
//! удаляет эти entities целиком и спавнит уровень заново из `LevelLayout`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraFollow, CameraProjection, MainCamera};
use crate::config::PlatformerConfig;
use crate::hazard::{Hazard, HazardKind, HazardPatrol};
use crate::input::InputEdges;
use crate::physics::{
    BodyDesc, CollisionLayers, ContactTag, Physics, PhysicsBody, PhysicsPort, TriggerVolume,
};
use crate::pickup::Coin;
use crate::player::{AimPivot, GroundProbe, Player, PlayerController, RecoilWeapon};

/// Радиус trigger volume монеты
const COIN_RADIUS: f32 = 0.3;

/// Marker: entity живёт ровно одну сессию (despawn на restart)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SessionEntity;

/// Статичный прямоугольник уровня
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformSpec {
    pub center: Vec2,
    pub size: Vec2,
}

impl PlatformSpec {
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.size)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HazardSpec {
    pub position: Vec2,
    pub kind: HazardKind,
    /// true = патрулирует вокруг `position` (PatrolTuning из конфига)
    #[serde(default)]
    pub patrol: bool,
    pub radius: f32,
}

/// Layout уровня (часть `PlatformerConfig`)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelLayout {
    pub player_spawn: Vec2,
    pub platforms: Vec<PlatformSpec>,
    pub hazards: Vec<HazardSpec>,
    pub coins: Vec<Vec2>,
}

impl Default for LevelLayout {
    fn default() -> Self {
        let platform = |center: Vec2, size: Vec2| PlatformSpec { center, size };

        Self {
            player_spawn: Vec2::ZERO,
            platforms: vec![
                // Пол: верхняя грань на y = -0.5
                platform(Vec2::new(0.0, -1.0), Vec2::new(40.0, 1.0)),
                // Стены и потолок
                platform(Vec2::new(-20.5, 14.5), Vec2::new(1.0, 32.0)),
                platform(Vec2::new(20.5, 14.5), Vec2::new(1.0, 32.0)),
                platform(Vec2::new(0.0, 30.5), Vec2::new(42.0, 1.0)),
                // Полка над стартом
                platform(Vec2::new(5.0, 1.25), Vec2::new(3.0, 0.5)),
            ],
            hazards: vec![
                HazardSpec {
                    position: Vec2::new(8.0, 0.0),
                    kind: HazardKind::Enemy,
                    patrol: true,
                    radius: 0.5,
                },
                HazardSpec {
                    position: Vec2::new(-6.0, -0.25),
                    kind: HazardKind::Spike,
                    patrol: false,
                    radius: 0.3,
                },
            ],
            coins: vec![Vec2::new(3.0, 0.0), Vec2::new(5.0, 2.2), Vec2::new(-3.0, 1.0)],
        }
    }
}

/// Спавн уровня: платформы, игрок, hazards, монеты, камера
///
/// Тела, sensors и статичная геометрия регистрируются в physics host сразу
/// (entity id зарезервирован `Commands::spawn`). Возвращает игрока.
pub fn spawn_level(
    commands: &mut Commands,
    config: &PlatformerConfig,
    physics: &mut dyn PhysicsPort,
) -> Entity {
    let layout = &config.level;

    for spec in &layout.platforms {
        physics.insert_static(spec.rect(), CollisionLayers::GROUND);

        commands.spawn((
            Name::new("Platform"),
            SessionEntity,
            Transform::from_translation(spec.center.extend(0.0)),
        ));
    }

    // Игрок
    let player = commands
        .spawn((
            Name::new("Player"),
            Player,
            SessionEntity,
            PhysicsBody,
            Transform::from_translation(layout.player_spawn.extend(0.0)),
            PlayerController::from_tuning(&config.player),
            RecoilWeapon::from_tuning(&config.player),
            GroundProbe::from_tuning(&config.player),
            InputEdges::default(),
            AimPivot::default(),
        ))
        .id();

    physics.insert_body(
        player,
        BodyDesc {
            position: layout.player_spawn,
            half_extents: config.player.half_extents,
            mass: config.player.mass,
        },
    );

    // Hazards
    for spec in &layout.hazards {
        let mut hazard = commands.spawn((
            Name::new(format!("{:?}", spec.kind)),
            SessionEntity,
            Hazard { kind: spec.kind },
            TriggerVolume {
                radius: spec.radius,
                tag: spec.kind.tag(),
            },
            Transform::from_translation(spec.position.extend(0.0)),
        ));

        if spec.patrol {
            hazard.insert(HazardPatrol::new(spec.position, &config.patrol));
        }

        physics.insert_trigger(hazard.id(), spec.position, spec.radius);
    }

    // Монеты
    for position in &layout.coins {
        let coin = commands
            .spawn((
                Name::new("Coin"),
                SessionEntity,
                Coin,
                TriggerVolume {
                    radius: COIN_RADIUS,
                    tag: ContactTag::Coin,
                },
                Transform::from_translation(position.extend(0.0)),
            ))
            .id();

        physics.insert_trigger(coin, *position, COIN_RADIUS);
    }

    // Камера: сразу на игроке
    commands.spawn((
        Name::new("MainCamera"),
        SessionEntity,
        MainCamera,
        CameraFollow::new(player, &config.camera),
        CameraProjection::from_tuning(&config.camera),
        Transform::from_translation(layout.player_spawn.extend(config.camera.depth)),
    ));

    crate::log(&format!(
        "Level spawned: {} platforms, {} hazards, {} coins",
        layout.platforms.len(),
        layout.hazards.len(),
        layout.coins.len()
    ));

    player
}

/// Startup система: первая сессия
pub fn spawn_initial_level(
    mut commands: Commands,
    config: Res<PlatformerConfig>,
    mut physics: ResMut<Physics>,
) {
    spawn_level(&mut commands, &config, physics.port_mut());
}
