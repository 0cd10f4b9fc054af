//! Recoil Simulation Core
//!
//! ECS-симуляция 2D платформера на Bevy 0.16 (headless, без рендера).
//!
//! HOST BOUNDARY:
//! - ECS = game rules (controller, patrol, camera follow, session state)
//! - Host = physics integration, raycasts, trigger callbacks, rendering, UI
//!
//! Host подключается через `PhysicsPort` (physics, sensors), `PlayerInput`
//! (input) и читает `GameState` / `Hud`. `HeadlessHostPlugin` - host для
//! тестов и headless прогона (rapier2d physics + scripted input).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod camera;
pub mod config;
pub mod hazard;
pub mod input;
pub mod level;
pub mod logger;
pub mod physics;
pub mod pickup;
pub mod player;
pub mod session;

// Re-export базовых типов для удобства
pub use camera::{CameraFollow, CameraPlugin, CameraProjection, MainCamera};
pub use config::{ConfigError, PlatformerConfig};
pub use hazard::{Hazard, HazardKind, HazardPatrol, HazardPlugin};
pub use input::{EdgeTrigger, InputEdges, PlayerInput, ScriptedInput};
pub use level::{spawn_level, LevelLayout, SessionEntity};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{
    BodyDesc, CollisionLayers, ContactTag, FrictionMode, HeadlessHostPlugin, Physics, PhysicsBody,
    PhysicsPlugin, PhysicsPort, RapierPhysics, RayHit, TriggerContact, TriggerVolume,
};
pub use pickup::{Coin, PickupPlugin};
pub use player::{
    AimPivot, Dead, GroundProbe, Player, PlayerController, PlayerDied, PlayerPlugin, RecoilFired,
    RecoilWeapon,
};
pub use session::{
    format_time, GameOver, GameState, Hud, PointScored, RestartRequested, SessionControl,
    SessionPlugin,
};

/// Порядок шага симуляции (один шаг на frame, `Update`)
///
/// Все системы, которые читают/пишут `GameState`, упорядочены этим chain -
/// гонок на флаге game over нет.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepSet {
    /// Перезагрузка сессии по RestartRequested
    Restart,
    /// Host пишет PlayerInput
    Input,
    /// Player controller → hazard patrol → camera follow
    Control,
    /// Sensors ← Transform, physics step, transform sync, trigger contacts
    Physics,
    /// Реакция на контакты (смерть, монеты)
    Resolve,
    /// Таймер сессии, freeze на game over, HUD
    Session,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Physics host не входит: либо `HeadlessHostPlugin`, либо внешний движок
/// вставляет свой `Physics` resource.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlatformerConfig>()
            .configure_sets(
                Update,
                (
                    StepSet::Restart,
                    StepSet::Input,
                    StepSet::Control,
                    StepSet::Physics,
                    StepSet::Resolve,
                    StepSet::Session,
                )
                    .chain(),
            )
            .add_plugins((
                SessionPlugin,
                PhysicsPlugin,
                PlayerPlugin,
                HazardPlugin,
                CameraPlugin,
                PickupPlugin,
            ))
            .add_systems(Startup, level::spawn_initial_level);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время шагает ровно на `1 / frame_rate` за `app.update()` (первый update
/// даёт delta = 0), поэтому прогоны с одинаковым seed идентичны.
pub fn create_headless_app(seed: u64, config: PlatformerConfig) -> App {
    let mut app = App::new();
    init_logger();

    let step = Duration::from_secs_f64(config.step_seconds());

    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(config)
        .add_plugins((SimulationPlugin, HeadlessHostPlugin { scripted_input: true }));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
