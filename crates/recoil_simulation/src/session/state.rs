//! GameState: score, таймер, флаг game over

use bevy::prelude::*;

/// Состояние одной сессии (от старта до restart)
///
/// Инварианты:
/// - `is_over` переходит false → true один раз, сбрасывается только restart'ом
/// - после game over score и elapsed заморожены
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct GameState {
    score: u32,
    elapsed_secs: f32,
    is_over: bool,
}

impl GameState {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    pub fn is_game_over(&self) -> bool {
        self.is_over
    }

    /// +1 очко. Возвращает false если сессия уже закончена.
    pub fn add_point(&mut self) -> bool {
        if self.is_over {
            return false;
        }

        self.score = self.score.saturating_add(1);
        true
    }

    /// Идемпотентный переход в game over. true только при первом вызове.
    pub fn trigger_game_over(&mut self) -> bool {
        if self.is_over {
            return false;
        }

        self.is_over = true;
        true
    }

    /// Продвинуть таймер (только пока сессия идёт)
    pub fn tick(&mut self, delta_secs: f32) {
        if self.is_over || !delta_secs.is_finite() || delta_secs <= 0.0 {
            return;
        }

        self.elapsed_secs += delta_secs;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Секунды → "MM:SS"
///
/// minutes = floor(t / 60), seconds = floor(t mod 60), оба минимум 2 цифры.
/// Сессии ≥ 100 минут дают больше цифр в минутах ("100:00"), без обрезки.
pub fn format_time(seconds: f32) -> String {
    let t = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };

    let minutes = (t / 60.0).floor() as u64;
    let secs = (t % 60.0).floor() as u64;

    format!("{:02}:{:02}", minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_examples() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(65.0), "01:05");
        assert_eq!(format_time(125.7), "02:05");
        assert_eq!(format_time(59.99), "00:59");
    }

    #[test]
    fn test_format_time_long_session_widens() {
        assert_eq!(format_time(6000.0), "100:00");
    }

    #[test]
    fn test_format_time_garbage_input() {
        assert_eq!(format_time(-3.0), "00:00");
        assert_eq!(format_time(f32::NAN), "00:00");
    }

    #[test]
    fn test_add_point_counts() {
        let mut state = GameState::default();
        for _ in 0..7 {
            assert!(state.add_point());
        }
        assert_eq!(state.score(), 7);
    }

    #[test]
    fn test_game_over_freezes_score_and_timer() {
        let mut state = GameState::default();
        state.add_point();
        state.tick(1.5);

        assert!(state.trigger_game_over());

        assert!(!state.add_point());
        state.tick(10.0);

        assert_eq!(state.score(), 1);
        assert_eq!(state.elapsed_secs(), 1.5);
    }

    #[test]
    fn test_trigger_game_over_idempotent() {
        let mut once = GameState::default();
        once.add_point();
        once.trigger_game_over();

        let mut twice = once.clone();
        assert!(!twice.trigger_game_over());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_tick_ignores_negative_delta() {
        let mut state = GameState::default();
        state.tick(0.5);
        state.tick(-1.0);
        assert_eq!(state.elapsed_secs(), 0.5);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = GameState::default();
        state.add_point();
        state.tick(3.0);
        state.trigger_game_over();

        state.reset();
        assert_eq!(state, GameState::default());
        assert!(!state.is_game_over());
    }
}
