//! Session systems: таймер, freeze на game over, HUD, reload

use bevy::prelude::*;

use super::events::RestartRequested;
use super::hud::Hud;
use super::state::GameState;
use crate::config::PlatformerConfig;
use crate::input::PlayerInput;
use crate::level::{spawn_level, SessionEntity};
use crate::physics::Physics;

/// Система: тикаем таймер сессии (virtual time, после game over стоит)
pub fn tick_session_clock(time: Res<Time>, mut state: ResMut<GameState>) {
    if state.is_game_over() {
        return;
    }

    state.tick(time.delta_secs());
}

/// Система: game over → пауза virtual time + summary в HUD
///
/// Смотрит на сам флаг `GameState`, а не на событие: game over,
/// выставленный мимо `SessionControl`, замораживает мир так же.
/// Пауза = физика и таймер больше не двигаются (delta = 0),
/// Update продолжает крутиться (restart должен отработать).
pub fn freeze_on_game_over(
    state: Res<GameState>,
    mut time: ResMut<Time<Virtual>>,
    hud: Option<ResMut<Hud>>,
) {
    if !state.is_game_over() || time.is_paused() {
        return;
    }

    time.pause();

    if let Some(mut hud) = hud {
        hud.reveal_summary(state.score(), state.elapsed_secs());
    }
}

/// Система: обновление HUD текстов при изменении GameState
pub fn refresh_hud(state: Res<GameState>, hud: Option<ResMut<Hud>>) {
    if !state.is_changed() {
        return;
    }

    let Some(mut hud) = hud else {
        return;
    };

    hud.show_score(state.score());
    hud.show_timer(state.elapsed_secs());
}

/// Система: перезагрузка сессии "с нуля"
///
/// 1. Despawn всех SessionEntity
/// 2. Очистка physics host
/// 3. Reset GameState / HUD / input, unpause времени
/// 4. Spawn уровня заново из конфига
#[allow(clippy::too_many_arguments)]
pub fn reload_session(
    mut commands: Commands,
    mut requests: EventReader<RestartRequested>,
    mut state: ResMut<GameState>,
    mut time: ResMut<Time<Virtual>>,
    mut physics: ResMut<Physics>,
    mut input: ResMut<PlayerInput>,
    hud: Option<ResMut<Hud>>,
    config: Res<PlatformerConfig>,
    session_entities: Query<Entity, With<SessionEntity>>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    for entity in session_entities.iter() {
        commands.entity(entity).despawn();
    }

    physics.port_mut().clear();
    state.reset();
    *input = PlayerInput::default();
    time.unpause();

    if let Some(mut hud) = hud {
        hud.reset();
    }

    let player = spawn_level(&mut commands, &config, physics.port_mut());

    crate::log_info(&format!("Session restarted (player {:?})", player));
}
