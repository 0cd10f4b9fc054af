//! Camera domain - follow камера с опережением к курсору
//!
//! View position = `Transform` камеры. Камера смещается от игрока на
//! единичный вектор в сторону курсора и догоняет цель экспоненциально
//! (`lerp` с фиксированным α каждый шаг).

use bevy::prelude::*;

use crate::config::CameraTuning;
use crate::input::PlayerInput;
use crate::player::drive_player_controller;
use crate::session::GameState;
use crate::StepSet;

/// Marker: камера, через которую проецируется курсор
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MainCamera;

/// Orthographic проекция: пиксели экрана ↔ world units
///
/// Экран: origin в левом верхнем углу, y вниз. World: y вверх.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CameraProjection {
    pub viewport: Vec2,
    pub pixels_per_unit: f32,
}

impl CameraProjection {
    pub fn from_tuning(tuning: &CameraTuning) -> Self {
        Self {
            viewport: tuning.viewport,
            pixels_per_unit: tuning.pixels_per_unit,
        }
    }

    /// Screen (pixels) → world для камеры в позиции `view`
    pub fn screen_to_world(&self, view: Vec2, screen: Vec2) -> Vec2 {
        let half = self.viewport * 0.5;
        let offset = Vec2::new(screen.x - half.x, half.y - screen.y);
        view + offset / self.pixels_per_unit
    }
}

/// Follow камера
///
/// `target = None` (или entity удалён) → камера стоит.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CameraFollow {
    pub target: Option<Entity>,
    /// α ∈ (0, 1): доля пути к цели за шаг
    pub smoothing: f32,
    /// Фиксированная z
    pub depth: f32,
}

impl CameraFollow {
    pub fn new(target: Entity, tuning: &CameraTuning) -> Self {
        Self {
            target: Some(target),
            smoothing: tuning.smoothing,
            depth: tuning.depth,
        }
    }
}

/// Новая позиция камеры за один шаг
///
/// Курсор отсутствует или совпадает с игроком → смещения нет.
pub fn follow_target(
    view: Vec3,
    player: Vec2,
    cursor_world: Option<Vec2>,
    smoothing: f32,
    depth: f32,
) -> Vec3 {
    let lead = cursor_world
        .map(|cursor| (cursor - player).normalize_or_zero())
        .unwrap_or(Vec2::ZERO);

    let target = (player + lead).extend(depth);
    view.lerp(target, smoothing)
}

/// Система: камера следует за target (StepSet::Control, после контроллера)
pub fn follow_player(
    session: Res<GameState>,
    input: Res<PlayerInput>,
    targets: Query<&Transform, Without<CameraFollow>>,
    mut cameras: Query<(&mut Transform, &CameraFollow, Option<&CameraProjection>)>,
) {
    if session.is_game_over() {
        return;
    }

    for (mut transform, follow, projection) in cameras.iter_mut() {
        let Some(target) = follow.target else {
            continue;
        };
        let Ok(target_transform) = targets.get(target) else {
            continue;
        };

        let player = target_transform.translation.truncate();
        let view = transform.translation.truncate();
        let cursor_world = input
            .cursor
            .zip(projection)
            .map(|(screen, projection)| projection.screen_to_world(view, screen));

        transform.translation = follow_target(
            transform.translation,
            player,
            cursor_world,
            follow.smoothing,
            follow.depth,
        );
    }
}

/// Camera Plugin
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CameraProjection>()
            .register_type::<CameraFollow>();

        app.add_systems(
            Update,
            follow_player
                .after(drive_player_controller)
                .in_set(StepSet::Control),
        );
    }
}
