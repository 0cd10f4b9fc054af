//! Player controller - один шаг движения/прицела/отдачи
//!
//! Порядок шага:
//! 1. Friction profile (по grounded прошлого шага)
//! 2. Horizontal movement (только x velocity, y не трогаем)
//! 3. Ground probe (raycast вниз)
//! 4. Jump (edge + grounded)
//! 5. Aim (cursor → world → unit vector, pivot angle)
//! 6. Fire (edge + тело в host'е + ammo > 0 + валидный aim → импульс против прицела)
//! 7. Recharge (grounded → полный магазин)
//!
//! Смерть обрабатывается отдельно (`death.rs`, StepSet::Resolve).

use bevy::prelude::*;

use super::components::{AimPivot, Dead, GroundProbe, Player, PlayerController, RecoilWeapon};
use super::events::RecoilFired;
use crate::camera::{CameraProjection, MainCamera};
use crate::input::{InputEdges, PlayerInput};
use crate::physics::{FrictionMode, Physics, PhysicsPort};
use crate::session::GameState;

/// Input одного шага после edge detection
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlStep {
    pub horizontal: f32,
    /// Jump нажат на этом шаге (rising edge)
    pub jump_pressed: bool,
    /// Fire нажат на этом шаге (rising edge)
    pub fire_pressed: bool,
    /// Курсор в world координатах (None = нет курсора или камеры)
    pub cursor_world: Option<Vec2>,
}

/// Что произошло за шаг (для events/логов)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    pub jumped: bool,
    /// Импульс отдачи, если выстрел случился
    pub recoil: Option<Vec2>,
    /// Патроны сразу после выстрела (до recharge этого же шага)
    pub ammo_left: u32,
}

/// Один шаг контроллера для одного игрока
///
/// Позиция читается, но не пишется: двигаем тело только через port.
#[allow(clippy::too_many_arguments)]
pub fn step_controller(
    entity: Entity,
    position: Vec2,
    controller: &mut PlayerController,
    weapon: &mut RecoilWeapon,
    probe: &GroundProbe,
    pivot: Option<&mut AimPivot>,
    step: &ControlStep,
    physics: &mut dyn PhysicsPort,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    // 1. Friction: на земле обычное трение, в воздухе без трения
    controller.friction = if controller.grounded {
        FrictionMode::Grounded
    } else {
        FrictionMode::Airborne
    };
    physics.set_friction(entity, controller.friction);

    // 2. Horizontal movement
    let axis = if step.horizontal.is_finite() {
        step.horizontal.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    if axis != 0.0 {
        if let Some(velocity) = physics.linear_velocity(entity) {
            physics.set_linear_velocity(entity, Vec2::new(axis * controller.speed, velocity.y));
        }
    }

    // 3. Ground probe
    controller.grounded = probe
        .origin(position)
        .map(|origin| {
            physics
                .raycast(origin, Vec2::NEG_Y, probe.distance, probe.layers)
                .is_some()
        })
        .unwrap_or(false);

    // 4. Jump
    if step.jump_pressed && controller.grounded {
        physics.apply_impulse(entity, Vec2::Y * controller.jump_force);
        outcome.jumped = true;
    }

    // 5. Aim
    let aim = step
        .cursor_world
        .map(|cursor| (cursor - position).normalize_or_zero())
        .filter(|direction| *direction != Vec2::ZERO);

    if let Some(direction) = aim {
        controller.aim = direction;

        if let Some(pivot) = pivot {
            pivot.angle_degrees = direction.y.atan2(direction.x).to_degrees();
        }
    }

    // 6. Fire (recoil). Без тела в host'е импульсу некуда идти - патрон не тратим
    let has_body = physics.linear_velocity(entity).is_some();
    if step.fire_pressed && has_body {
        if let Some(direction) = aim {
            if weapon.try_fire() {
                let impulse = weapon.recoil_impulse(direction);
                physics.apply_impulse(entity, impulse);
                outcome.recoil = Some(impulse);
                outcome.ammo_left = weapon.current_ammo();
            }
        }
    }

    // 7. Recharge (каждый grounded шаг, не только при приземлении)
    if controller.grounded {
        weapon.recharge();
    }

    outcome
}

/// Система: player controller (StepSet::Control)
///
/// Весь шаг пропускается после game over. Edge detectors тоже не
/// обновляются - нажатия во время game over не "копятся".
#[allow(clippy::type_complexity)]
pub fn drive_player_controller(
    session: Res<GameState>,
    input: Res<PlayerInput>,
    mut physics: ResMut<Physics>,
    cameras: Query<(&Transform, &CameraProjection), With<MainCamera>>,
    mut players: Query<
        (
            Entity,
            &Transform,
            &mut PlayerController,
            &mut RecoilWeapon,
            &GroundProbe,
            &mut InputEdges,
            Option<&mut AimPivot>,
        ),
        (With<Player>, Without<Dead>),
    >,
    mut fired: EventWriter<RecoilFired>,
) {
    if session.is_game_over() {
        return;
    }

    // Screen → world через main camera (нет камеры/курсора → нет прицела)
    let cursor_world = input.cursor.and_then(|screen| {
        let (camera_transform, projection) = cameras.iter().next()?;
        Some(projection.screen_to_world(camera_transform.translation.truncate(), screen))
    });

    for (entity, transform, mut controller, mut weapon, probe, mut edges, pivot) in
        players.iter_mut()
    {
        let step = ControlStep {
            horizontal: input.horizontal,
            jump_pressed: edges.jump.update(input.jump),
            fire_pressed: edges.fire.update(input.fire),
            cursor_world,
        };

        let outcome = step_controller(
            entity,
            transform.translation.truncate(),
            &mut controller,
            &mut weapon,
            probe,
            pivot.map(|pivot| pivot.into_inner()),
            &step,
            physics.port_mut(),
        );

        if let Some(impulse) = outcome.recoil {
            fired.write(RecoilFired {
                entity,
                impulse,
                ammo_left: outcome.ammo_left,
            });
        }
    }
}
