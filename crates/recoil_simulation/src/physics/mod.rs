//! Physics boundary (host-owned rigid bodies)
//!
//! Архитектура:
//! - Host владеет телами: integration, collisions, raycasts
//! - ECS управляет телами только через `PhysicsPort` (velocity, impulse, friction)
//! - `Transform` игрока - зеркало позиции тела, пишется только в `integrate_bodies`
//! - Trigger volumes живут в host'е как sensors; позиция из `Transform`,
//!   вход тела в sensor → `TriggerContact`
//!
//! Headless прогон: `RapierPhysics` (rapier2d pipeline).

use bevy::prelude::*;

pub mod contact;
pub mod host;
pub mod layers;
pub mod rapier;

pub use contact::{ContactTag, TriggerContact, TriggerVolume};
pub use host::HeadlessHostPlugin;
pub use layers::CollisionLayers;
pub use rapier::RapierPhysics;

use crate::StepSet;

/// Профиль трения тела
///
/// `Grounded` = обычное трение, `Airborne` = без трения
/// (в воздухе тело не "прилипает" к вертикальным стенам).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum FrictionMode {
    #[default]
    Grounded,
    Airborne,
}

/// Результат raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    pub distance: f32,
    pub normal: Vec2,
}

/// Описание dynamic тела при регистрации в host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub position: Vec2,
    pub half_extents: Vec2,
    pub mass: f32,
}

/// Минимальный интерфейс physics host
///
/// Все операции над отсутствующим телом - no-op (None для запросов).
pub trait PhysicsPort: Send + Sync + 'static {
    fn insert_body(&mut self, entity: Entity, desc: BodyDesc);
    fn remove_body(&mut self, entity: Entity);
    /// Статичная геометрия уровня (платформы, стены)
    fn insert_static(&mut self, rect: Rect, layers: CollisionLayers);

    /// Sensor круг: тела, входящие в него, репортятся через `drain_trigger_enters`
    fn insert_trigger(&mut self, entity: Entity, position: Vec2, radius: f32);
    fn move_trigger(&mut self, entity: Entity, position: Vec2);
    fn remove_trigger(&mut self, entity: Entity);
    /// (body, trigger) пары, вошедшие в контакт за step'ы с прошлого вызова
    fn drain_trigger_enters(&mut self) -> Vec<(Entity, Entity)>;

    /// Полная очистка (reload сессии)
    fn clear(&mut self);

    fn body_position(&self, entity: Entity) -> Option<Vec2>;
    fn linear_velocity(&self, entity: Entity) -> Option<Vec2>;
    fn set_linear_velocity(&mut self, entity: Entity, velocity: Vec2);
    /// Мгновенный импульс (Δv = impulse / mass)
    fn apply_impulse(&mut self, entity: Entity, impulse: Vec2);
    fn set_friction(&mut self, entity: Entity, mode: FrictionMode);

    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<RayHit>;

    /// Один шаг integration (external движок может интегрировать сам → no-op)
    fn step(&mut self, dt: f32);
}

/// Physics host resource (boxed port)
#[derive(Resource, Deref, DerefMut)]
pub struct Physics(pub Box<dyn PhysicsPort>);

impl Physics {
    pub fn new(port: impl PhysicsPort) -> Self {
        Self(Box::new(port))
    }

    pub fn port_mut(&mut self) -> &mut dyn PhysicsPort {
        self.0.as_mut()
    }
}

/// Маркер: у entity есть тело в physics host (Transform синхронизируется)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PhysicsBody;

/// Система: physics step + синхронизация Transform ← body position
///
/// При паузе virtual time (game over) delta = 0 → тела стоят.
pub fn integrate_bodies(
    time: Res<Time>,
    mut physics: ResMut<Physics>,
    mut bodies: Query<(Entity, &mut Transform), With<PhysicsBody>>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    physics.step(delta);

    for (entity, mut transform) in bodies.iter_mut() {
        let Some(position) = physics.body_position(entity) else {
            continue;
        };

        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

/// Система: sensors в host'е следуют за `Transform` (патруль двигает врага)
pub fn sync_trigger_volumes(
    mut physics: ResMut<Physics>,
    volumes: Query<(Entity, &Transform), (With<TriggerVolume>, Changed<Transform>)>,
) {
    for (entity, transform) in volumes.iter() {
        physics.move_trigger(entity, transform.translation.truncate());
    }
}

/// Система: trigger enter пары из host'а → `TriggerContact` с тегом volume
///
/// Пара без `TriggerVolume` (entity уже despawned) пропускается.
pub fn emit_trigger_contacts(
    mut physics: ResMut<Physics>,
    volumes: Query<&TriggerVolume>,
    mut contacts: EventWriter<TriggerContact>,
) {
    for (entity, other) in physics.drain_trigger_enters() {
        let Ok(volume) = volumes.get(other) else {
            crate::log_warning(&format!(
                "Trigger enter {:?} → {:?}: volume is gone",
                entity, other
            ));
            continue;
        };

        contacts.write(TriggerContact {
            entity,
            other,
            tag: volume.tag,
        });
    }
}

/// Physics Plugin (host-agnostic часть)
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TriggerVolume>()
            .add_event::<TriggerContact>();

        app.add_systems(
            Update,
            (sync_trigger_volumes, integrate_bodies, emit_trigger_contacts)
                .chain()
                .in_set(StepSet::Physics),
        );
    }
}
