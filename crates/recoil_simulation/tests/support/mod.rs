//! Общие helpers для integration тестов
//!
//! `RecordingPhysics` - fake physics host: ничего не интегрирует, только
//! записывает вызовы. Состояние в `Arc<Mutex<..>>`, чтобы тест видел его
//! после того как port уехал в `Physics` resource.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use recoil_simulation::{
    BodyDesc, CollisionLayers, FrictionMode, Physics, PhysicsPort, PlatformerConfig, Player,
    RayHit, SimulationPlugin,
};

#[derive(Debug, Default)]
pub struct Recorded {
    pub positions: BTreeMap<Entity, Vec2>,
    pub velocities: BTreeMap<Entity, Vec2>,
    pub impulses: Vec<(Entity, Vec2)>,
    pub friction: Vec<(Entity, FrictionMode)>,
    pub removed: Vec<Entity>,
    /// Sensors: entity → позиция
    pub triggers: BTreeMap<Entity, Vec2>,
    pub removed_triggers: Vec<Entity>,
    /// Enter пары, которые отдаст следующий `drain_trigger_enters`
    pub pending_enters: Vec<(Entity, Entity)>,
    pub clears: u32,
    /// Ответ на любой raycast вниз (true = под игроком земля)
    pub ground_below: bool,
}

#[derive(Clone, Default)]
pub struct RecordingPhysics {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingPhysics {
    pub fn state(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap()
    }

    pub fn set_grounded(&self, grounded: bool) {
        self.state().ground_below = grounded;
    }

    pub fn set_velocity(&self, entity: Entity, velocity: Vec2) {
        self.state().velocities.insert(entity, velocity);
    }

    pub fn velocity(&self, entity: Entity) -> Option<Vec2> {
        self.state().velocities.get(&entity).copied()
    }

    pub fn trigger_position(&self, entity: Entity) -> Option<Vec2> {
        self.state().triggers.get(&entity).copied()
    }

    /// Host "увидел" вход тела в sensor
    pub fn queue_enter(&self, body: Entity, trigger: Entity) {
        self.state().pending_enters.push((body, trigger));
    }

    pub fn impulses_for(&self, entity: Entity) -> Vec<Vec2> {
        self.state()
            .impulses
            .iter()
            .filter(|(e, _)| *e == entity)
            .map(|(_, impulse)| *impulse)
            .collect()
    }
}

impl PhysicsPort for RecordingPhysics {
    fn insert_body(&mut self, entity: Entity, desc: BodyDesc) {
        let mut state = self.state();
        state.positions.insert(entity, desc.position);
        state.velocities.insert(entity, Vec2::ZERO);
    }

    fn remove_body(&mut self, entity: Entity) {
        let mut state = self.state();
        state.positions.remove(&entity);
        state.velocities.remove(&entity);
        state.removed.push(entity);
    }

    fn insert_static(&mut self, _rect: Rect, _layers: CollisionLayers) {}

    fn insert_trigger(&mut self, entity: Entity, position: Vec2, _radius: f32) {
        self.state().triggers.insert(entity, position);
    }

    fn move_trigger(&mut self, entity: Entity, position: Vec2) {
        if let Some(current) = self.state().triggers.get_mut(&entity) {
            *current = position;
        }
    }

    fn remove_trigger(&mut self, entity: Entity) {
        let mut state = self.state();
        state.triggers.remove(&entity);
        state.removed_triggers.push(entity);
    }

    fn drain_trigger_enters(&mut self) -> Vec<(Entity, Entity)> {
        std::mem::take(&mut self.state().pending_enters)
    }

    fn clear(&mut self) {
        let mut state = self.state();
        state.positions.clear();
        state.velocities.clear();
        state.triggers.clear();
        state.pending_enters.clear();
        state.clears += 1;
    }

    fn body_position(&self, entity: Entity) -> Option<Vec2> {
        self.state().positions.get(&entity).copied()
    }

    fn linear_velocity(&self, entity: Entity) -> Option<Vec2> {
        self.velocity(entity)
    }

    fn set_linear_velocity(&mut self, entity: Entity, velocity: Vec2) {
        let mut state = self.state();
        if let Some(current) = state.velocities.get_mut(&entity) {
            *current = velocity;
        }
    }

    fn apply_impulse(&mut self, entity: Entity, impulse: Vec2) {
        let mut state = self.state();
        state.impulses.push((entity, impulse));
        if let Some(current) = state.velocities.get_mut(&entity) {
            *current += impulse;
        }
    }

    fn set_friction(&mut self, entity: Entity, mode: FrictionMode) {
        self.state().friction.push((entity, mode));
    }

    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        _max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<RayHit> {
        let state = self.state();
        if !state.ground_below || direction != Vec2::NEG_Y || !layers.intersects(CollisionLayers::GROUND) {
            return None;
        }

        Some(RayHit {
            point: origin,
            distance: 0.0,
            normal: Vec2::Y,
        })
    }

    fn step(&mut self, _dt: f32) {}
}

pub const STEP: f64 = 1.0 / 60.0;

/// App с полной симуляцией поверх `RecordingPhysics` (без headless host:
/// trigger контакты тест шлёт сам или через `queue_enter`). Startup уже прогнан.
pub fn scenario_app(physics: &RecordingPhysics) -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(STEP)))
        .insert_resource(PlatformerConfig::default())
        .insert_resource(Physics::new(physics.clone()))
        .add_plugins(SimulationPlugin);

    app.update();
    app
}

pub fn player_entity(app: &mut App) -> Entity {
    let world = app.world_mut();
    world
        .query_filtered::<Entity, With<Player>>()
        .single(world)
        .unwrap()
}

pub fn entities_with<T: Component>(app: &mut App) -> Vec<Entity> {
    let world = app.world_mut();
    world
        .query_filtered::<Entity, With<T>>()
        .iter(world)
        .collect()
}
