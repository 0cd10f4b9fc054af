//! Scripted input для headless прогона (seeded, детерминированный)

use bevy::prelude::*;
use rand::Rng;

use super::PlayerInput;
use crate::config::PlatformerConfig;
use crate::DeterministicRng;

/// Вероятности событий input на один шаг
#[derive(Resource, Debug, Clone)]
pub struct ScriptedInput {
    pub axis_change_chance: f64,
    pub jump_chance: f64,
    pub fire_chance: f64,
    pub cursor_change_chance: f64,
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self {
            axis_change_chance: 0.05,
            jump_chance: 0.04,
            fire_chance: 0.02,
            cursor_change_chance: 0.05,
        }
    }
}

/// Система: случайный (но воспроизводимый по seed) input игрока
pub fn drive_scripted_input(
    mut rng: ResMut<DeterministicRng>,
    script: Res<ScriptedInput>,
    config: Res<PlatformerConfig>,
    mut input: ResMut<PlayerInput>,
) {
    let rng = &mut rng.rng;

    if rng.gen_bool(script.axis_change_chance) {
        input.horizontal = [-1.0, 0.0, 1.0][rng.gen_range(0..3)];
    }

    // Кнопки "зажаты" на один шаг - edge detector увидит нажатие
    input.jump = rng.gen_bool(script.jump_chance);
    input.fire = rng.gen_bool(script.fire_chance);

    if input.cursor.is_none() || rng.gen_bool(script.cursor_change_chance) {
        let viewport = config.camera.viewport;
        input.cursor = Some(Vec2::new(
            rng.gen_range(0.0..viewport.x),
            rng.gen_range(0.0..viewport.y),
        ));
    }
}
