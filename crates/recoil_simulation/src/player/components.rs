//! Player компоненты: контроллер, recoil оружие, ground probe, aim pivot

use bevy::prelude::*;

use crate::config::PlayerTuning;
use crate::physics::{CollisionLayers, FrictionMode};

/// Marker component для player-controlled entity
///
/// Single-player: ровно один entity с этим компонентом на сессию.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Компонент-маркер: игрок мёртв (one-way до restart)
///
/// Тело уже удалено из physics host, controller/contacts его пропускают.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Состояние контроллера игрока
///
/// `grounded` пересчитывается каждый шаг ground probe'ом.
/// `friction` - профиль, выбранный в начале шага (по прошлому `grounded`).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PlayerController {
    /// Горизонтальная скорость (units/sec)
    pub speed: f32,
    /// Импульс прыжка
    pub jump_force: f32,
    pub grounded: bool,
    pub friction: FrictionMode,
    /// Последнее валидное направление прицела (unit vector)
    pub aim: Vec2,
}

impl PlayerController {
    pub fn from_tuning(tuning: &PlayerTuning) -> Self {
        Self {
            speed: tuning.speed,
            jump_force: tuning.jump_force,
            grounded: false,
            friction: FrictionMode::Airborne,
            aim: Vec2::X,
        }
    }
}

/// Recoil оружие: не стреляет снарядами, толкает игрока против прицела
///
/// Инвариант: 0 ≤ current_ammo ≤ max_ammo
/// Recharge: полный магазин на каждом grounded шаге.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct RecoilWeapon {
    pub max_ammo: u32,
    current_ammo: u32,
    pub base_force: f32,
    pub air_multiplier: f32,
}

impl RecoilWeapon {
    pub fn new(max_ammo: u32, base_force: f32, air_multiplier: f32) -> Self {
        Self {
            max_ammo,
            current_ammo: max_ammo,
            base_force,
            air_multiplier,
        }
    }

    pub fn from_tuning(tuning: &PlayerTuning) -> Self {
        Self::new(tuning.max_ammo, tuning.recoil_force, tuning.air_multiplier)
    }

    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    /// Для тестов и host сценариев (clamp к max_ammo)
    pub fn with_ammo(mut self, ammo: u32) -> Self {
        self.current_ammo = ammo.min(self.max_ammo);
        self
    }

    /// Списать патрон. false если магазин пуст (ничего не меняется).
    pub fn try_fire(&mut self) -> bool {
        if self.current_ammo == 0 {
            return false;
        }

        self.current_ammo -= 1;
        true
    }

    pub fn recharge(&mut self) {
        self.current_ammo = self.max_ammo;
    }

    /// Импульс отдачи для направления прицела (против прицела)
    pub fn recoil_impulse(&self, aim: Vec2) -> Vec2 {
        -aim * (self.base_force * self.air_multiplier)
    }
}

/// Ground probe: короткий луч вниз от anchor
///
/// `anchor = None` - probe не настроен: игрок никогда не grounded,
/// прыжок и recharge не работают, но ничего не падает.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct GroundProbe {
    /// Смещение от позиции игрока
    pub anchor: Option<Vec2>,
    pub distance: f32,
    pub layers: CollisionLayers,
}

impl GroundProbe {
    pub fn from_tuning(tuning: &PlayerTuning) -> Self {
        Self {
            anchor: tuning.probe_offset,
            distance: tuning.ground_distance,
            layers: CollisionLayers::GROUND,
        }
    }

    pub fn origin(&self, position: Vec2) -> Option<Vec2> {
        self.anchor.map(|offset| position + offset)
    }
}

/// Pivot оружия (визуал): угол в градусах, 0 = вправо, против часовой
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AimPivot {
    pub angle_degrees: f32,
}
