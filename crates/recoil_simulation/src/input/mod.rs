//! Input domain - per-step sampling игрока
//!
//! Host пишет в `PlayerInput` текущее состояние ("нажато сейчас").
//! Edge-triggered действия (прыжок, выстрел) выделяются `EdgeTrigger`,
//! который помнит значение прошлого шага.

use bevy::prelude::*;

pub mod script;

pub use script::{drive_scripted_input, ScriptedInput};

/// Сэмпл input на текущий шаг (пишет host)
///
/// # Fields
/// - `horizontal`: ось [-1, 1] (A/D, стрелки, стик)
/// - `jump`: jump кнопка зажата сейчас
/// - `fire`: fire кнопка зажата сейчас
/// - `cursor`: позиция курсора в пикселях экрана (None = курсора нет)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub horizontal: f32,
    pub jump: bool,
    pub fire: bool,
    pub cursor: Option<Vec2>,
}

/// Edge detector: true только на переходе not-pressed → pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct EdgeTrigger {
    previous: bool,
}

impl EdgeTrigger {
    pub fn update(&mut self, pressed: bool) -> bool {
        let rising = pressed && !self.previous;
        self.previous = pressed;
        rising
    }
}

/// Edge detectors игрока (jump / fire)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct InputEdges {
    pub jump: EdgeTrigger,
    pub fire: EdgeTrigger,
}
