//! SessionControl - внешние переходы сессии для любых систем
//!
//! Pickup'ы, смерть игрока, UI retry используют этот SystemParam вместо
//! прямой записи в `GameState`: переходы сразу рассылают events.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::events::{GameOver, PointScored, RestartRequested};
use super::state::GameState;

#[derive(SystemParam)]
pub struct SessionControl<'w> {
    state: ResMut<'w, GameState>,
    game_over: EventWriter<'w, GameOver>,
    points: EventWriter<'w, PointScored>,
    restart: EventWriter<'w, RestartRequested>,
}

impl SessionControl<'_> {
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// +1 очко (no-op после game over)
    pub fn add_point(&mut self) -> bool {
        if !self.state.add_point() {
            return false;
        }

        self.points.write(PointScored {
            score: self.state.score(),
        });
        true
    }

    /// Идемпотентно: повторный вызов не шлёт второй GameOver
    pub fn trigger_game_over(&mut self) -> bool {
        if !self.state.trigger_game_over() {
            return false;
        }

        let event = GameOver {
            final_score: self.state.score(),
            elapsed_secs: self.state.elapsed_secs(),
        };

        crate::log_info(&format!(
            "Game over: score {} in {:.2}s",
            event.final_score, event.elapsed_secs
        ));

        self.game_over.write(event);
        true
    }

    /// Перезагрузка применяется в начале следующего шага (`StepSet::Restart`)
    pub fn restart(&mut self) {
        self.restart.write(RestartRequested);
    }
}
