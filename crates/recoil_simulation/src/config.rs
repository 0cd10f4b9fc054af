//! Tunables симуляции (data-driven)
//!
//! Все магнитуды (скорость, прыжок, отдача, патруль, сглаживание камеры,
//! гравитация, трение) живут здесь, а не в коде систем.
//! Источник: TOML файл или `Default`.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::LevelLayout;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(io::Error),
    #[error(transparent)]
    Toml(toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Корневой конфиг (вставляется как Resource)
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformerConfig {
    /// Шагов симуляции в секунду для headless прогона
    pub frame_rate: f64,
    pub player: PlayerTuning,
    pub patrol: PatrolTuning,
    pub camera: CameraTuning,
    pub physics: PhysicsTuning,
    pub level: LevelLayout,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            player: PlayerTuning::default(),
            patrol: PatrolTuning::default(),
            camera: CameraTuning::default(),
            physics: PhysicsTuning::default(),
            level: LevelLayout::default(),
        }
    }
}

impl PlatformerConfig {
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let mut file = File::open(path).map_err(ConfigError::Io)?;

        let mut buf = String::new();
        file.read_to_string(&mut buf).map_err(ConfigError::Io)?;

        Self::from_toml_str(&buf)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Проверка диапазонов (отказ на старте вместо тихого мусора в симуляции)
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be > 0 (got {value})")))
            }
        }

        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "frame_rate must be > 0 (got {})",
                self.frame_rate
            )));
        }

        positive("player.speed", self.player.speed)?;
        positive("player.jump_force", self.player.jump_force)?;
        positive("player.recoil_force", self.player.recoil_force)?;
        positive("player.air_multiplier", self.player.air_multiplier)?;
        positive("player.ground_distance", self.player.ground_distance)?;
        positive("player.mass", self.player.mass)?;
        positive("player.half_extents.x", self.player.half_extents.x)?;
        positive("player.half_extents.y", self.player.half_extents.y)?;

        if self.player.max_ammo == 0 {
            return Err(ConfigError::Invalid("player.max_ammo must be >= 1".into()));
        }

        positive("patrol.speed", self.patrol.speed)?;
        positive("patrol.distance", self.patrol.distance)?;

        let smoothing = self.camera.smoothing;
        if !(smoothing > 0.0 && smoothing < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.smoothing must be in (0, 1) (got {smoothing})"
            )));
        }
        positive("camera.pixels_per_unit", self.camera.pixels_per_unit)?;
        positive("camera.viewport.x", self.camera.viewport.x)?;
        positive("camera.viewport.y", self.camera.viewport.y)?;

        if !(0.0..=1.0).contains(&self.physics.ground_friction) {
            return Err(ConfigError::Invalid(format!(
                "physics.ground_friction must be in [0, 1] (got {})",
                self.physics.ground_friction
            )));
        }

        for (i, platform) in self.level.platforms.iter().enumerate() {
            positive(&format!("level.platforms[{i}].size.x"), platform.size.x)?;
            positive(&format!("level.platforms[{i}].size.y"), platform.size.y)?;
        }
        for (i, hazard) in self.level.hazards.iter().enumerate() {
            positive(&format!("level.hazards[{i}].radius"), hazard.radius)?;
        }

        Ok(())
    }

    pub fn step_seconds(&self) -> f64 {
        1.0 / self.frame_rate
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerTuning {
    /// Горизонтальная скорость (units/sec)
    pub speed: f32,
    /// Импульс прыжка
    pub jump_force: f32,
    /// Базовый импульс отдачи оружия
    pub recoil_force: f32,
    /// Множитель отдачи
    pub air_multiplier: f32,
    /// Длина ground probe луча
    pub ground_distance: f32,
    /// Смещение ground probe от центра игрока (None = probe не настроен)
    pub probe_offset: Option<Vec2>,
    pub max_ammo: u32,
    pub mass: f32,
    pub half_extents: Vec2,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            jump_force: 5.0,
            recoil_force: 5.0,
            air_multiplier: 4.0,
            ground_distance: 0.2,
            probe_offset: Some(Vec2::new(0.0, -0.5)),
            max_ammo: 3,
            mass: 1.0,
            half_extents: Vec2::splat(0.5),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatrolTuning {
    pub speed: f32,
    /// Дистанция от anchor в каждую сторону
    pub distance: f32,
}

impl Default for PatrolTuning {
    fn default() -> Self {
        Self {
            speed: 2.0,
            distance: 3.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraTuning {
    /// Доля пути к target за один шаг
    pub smoothing: f32,
    /// Фиксированная z камеры
    pub depth: f32,
    /// Размер viewport в пикселях (для screen → world)
    pub viewport: Vec2,
    pub pixels_per_unit: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            smoothing: 0.1,
            depth: -10.0,
            viewport: Vec2::new(1280.0, 720.0),
            pixels_per_unit: 64.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsTuning {
    pub gravity: Vec2,
    /// Коэффициент трения профиля `FrictionMode::Grounded`
    pub ground_friction: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            ground_friction: 0.4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PlatformerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.player.max_ammo, 3);
        assert_eq!(config.player.speed, 5.0);
        assert_eq!(config.camera.smoothing, 0.1);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PlatformerConfig::from_toml_str(
            r#"
            frame_rate = 30.0

            [player]
            speed = 7.5
            max_ammo = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.frame_rate, 30.0);
        assert_eq!(config.player.speed, 7.5);
        assert_eq!(config.player.max_ammo, 5);
        // Не указано → default
        assert_eq!(config.player.jump_force, 5.0);
        assert_eq!(config.patrol.distance, 3.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = PlatformerConfig::from_toml_str("[player]\nsped = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_smoothing_out_of_range_rejected() {
        let err = PlatformerConfig::from_toml_str("[camera]\nsmoothing = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_ammo_rejected() {
        let err = PlatformerConfig::from_toml_str("[player]\nmax_ammo = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_shipped_config_parses() {
        let config =
            PlatformerConfig::from_toml_str(include_str!("../../../config/platformer.toml"))
                .unwrap();

        assert_eq!(config.level.platforms.len(), 5);
        assert_eq!(config.level.hazards.len(), 2);
        assert_eq!(config.level.coins.len(), 4);
        assert_eq!(config.player.probe_offset, Some(Vec2::new(0.0, -0.5)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PlatformerConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
