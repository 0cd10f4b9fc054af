//! HUD тексты (score, таймер, game over панель)
//!
//! UI host читает `Hud` и рисует как хочет. Каждый target optional:
//! `None` = UI элемент не подключён, запись пропускается.

use bevy::prelude::*;

use super::state::format_time;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Hud {
    pub score_text: Option<String>,
    pub timer_text: Option<String>,
    pub game_over_panel: Option<GameOverPanel>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameOverPanel {
    pub visible: bool,
    pub final_score_text: Option<String>,
    pub final_time_text: Option<String>,
}

impl Default for Hud {
    fn default() -> Self {
        let mut hud = Self {
            score_text: Some(String::new()),
            timer_text: Some(String::new()),
            game_over_panel: Some(GameOverPanel {
                visible: false,
                final_score_text: Some(String::new()),
                final_time_text: Some(String::new()),
            }),
        };
        hud.reset();
        hud
    }
}

impl Hud {
    /// HUD без подключённых элементов (все обновления no-op)
    pub fn unbound() -> Self {
        Self {
            score_text: None,
            timer_text: None,
            game_over_panel: None,
        }
    }

    pub fn show_score(&mut self, score: u32) {
        if let Some(text) = self.score_text.as_mut() {
            *text = score_label(score);
        }
    }

    pub fn show_timer(&mut self, elapsed_secs: f32) {
        if let Some(text) = self.timer_text.as_mut() {
            *text = format_time(elapsed_secs);
        }
    }

    /// Показать панель game over с финальными значениями
    pub fn reveal_summary(&mut self, score: u32, elapsed_secs: f32) {
        let Some(panel) = self.game_over_panel.as_mut() else {
            return;
        };

        panel.visible = true;

        if let Some(text) = panel.final_score_text.as_mut() {
            *text = score_label(score);
        }
        if let Some(text) = panel.final_time_text.as_mut() {
            *text = format!("Time: {}", format_time(elapsed_secs));
        }
    }

    /// Состояние старта сессии: панель скрыта, нули в счётчиках
    pub fn reset(&mut self) {
        if let Some(panel) = self.game_over_panel.as_mut() {
            panel.visible = false;
        }
        self.show_score(0);
        self.show_timer(0.0);
    }
}

fn score_label(score: u32) -> String {
    format!("Coins: {}", score)
}
