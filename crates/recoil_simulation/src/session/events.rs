//! Session events

use bevy::prelude::*;

/// Событие: сессия закончилась (отправляется ровно один раз за сессию)
///
/// Consumers: freeze времени, HUD summary, host (звук, UI).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct GameOver {
    pub final_score: u32,
    pub elapsed_secs: f32,
}

/// Запрос на перезагрузку сессии (UI retry, headless runner)
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RestartRequested;

/// Событие: игрок получил очко
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointScored {
    pub score: u32,
}
