//! Session domain - score, таймер, game over / restart
//!
//! Содержит:
//! - GameState (resource: score, elapsed, is_over)
//! - SessionControl (SystemParam: add_point / trigger_game_over / restart)
//! - Hud (тексты для UI host)
//! - GameOver / RestartRequested / PointScored events

use bevy::prelude::*;

pub mod control;
pub mod events;
pub mod hud;
pub mod state;
pub mod systems;

pub use control::SessionControl;
pub use events::{GameOver, PointScored, RestartRequested};
pub use hud::{GameOverPanel, Hud};
pub use state::{format_time, GameState};

use crate::StepSet;

/// Session Plugin
///
/// Порядок:
/// - StepSet::Restart: reload_session
/// - StepSet::Session: tick_session_clock → freeze_on_game_over → refresh_hud
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameState>()
            .init_resource::<Hud>()
            .add_event::<GameOver>()
            .add_event::<RestartRequested>()
            .add_event::<PointScored>();

        app.add_systems(Update, systems::reload_session.in_set(StepSet::Restart));

        app.add_systems(
            Update,
            (
                systems::tick_session_clock,
                systems::freeze_on_game_over,
                systems::refresh_hud,
            )
                .chain()
                .in_set(StepSet::Session),
        );
    }
}
