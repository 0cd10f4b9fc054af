//! RapierPhysics - physics host поверх rapier2d (через bevy_rapier2d)
//!
//! Свой pipeline внутри port'а (без RapierPhysicsPlugin): контроллер зовёт
//! port синхронно посреди шага, ECS-компоненты bevy_rapier так не умеют.
//!
//! - Игрок: dynamic тело, rotation locked, cuboid collider
//! - Платформы: parentless cuboid colliders
//! - Triggers: sensor ball colliders, Started события → (body, trigger) пары
//! - Friction: профиль тела = friction collider'а, combine rule `Min`
//!   (Airborne = 0 обнуляет трение о любую стену)
//!
//! Entity хранится в `user_data` collider'а (`Entity::to_bits`).

use std::collections::BTreeMap;
use std::sync::RwLock;

use bevy::prelude::*;
use bevy_rapier2d::rapier::prelude::{
    point, vector, ActiveEvents, CCDSolver, CoefficientCombineRule, ColliderBuilder, ColliderHandle,
    ColliderSet, CollisionEvent, CollisionEventFlags, ContactPair, DefaultBroadPhase,
    EventHandler, Group, ImpulseJointSet, IntegrationParameters, InteractionGroups,
    IslandManager, MultibodyJointSet, nalgebra, NarrowPhase, PhysicsPipeline, QueryFilter, QueryPipeline,
    Ray, Real, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};

use super::{BodyDesc, CollisionLayers, FrictionMode, PhysicsPort, RayHit};
use crate::config::PhysicsTuning;

#[derive(Debug, Clone, Copy)]
struct BodyHandles {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    friction: FrictionMode,
}

pub struct RapierPhysics {
    gravity: Vec2,
    ground_friction: f32,
    integration: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    queries: QueryPipeline,
    // BTreeMap: порядок обхода стабилен между прогонами
    handles: BTreeMap<Entity, BodyHandles>,
    triggers: BTreeMap<Entity, ColliderHandle>,
    entered: Vec<(Entity, Entity)>,
}

impl Default for RapierPhysics {
    fn default() -> Self {
        Self::from_tuning(&PhysicsTuning::default())
    }
}

impl RapierPhysics {
    pub fn new(gravity: Vec2, ground_friction: f32) -> Self {
        Self {
            gravity,
            ground_friction: ground_friction.clamp(0.0, 1.0),
            integration: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            queries: QueryPipeline::new(),
            handles: BTreeMap::new(),
            triggers: BTreeMap::new(),
            entered: Vec::new(),
        }
    }

    pub fn from_tuning(tuning: &PhysicsTuning) -> Self {
        Self::new(tuning.gravity, tuning.ground_friction)
    }

    #[cfg(test)]
    pub(crate) fn body_count(&self) -> usize {
        self.handles.len()
    }

    #[cfg(test)]
    pub(crate) fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    #[cfg(test)]
    pub(crate) fn friction_of(&self, entity: Entity) -> Option<FrictionMode> {
        self.handles.get(&entity).map(|handles| handles.friction)
    }

    fn friction_coefficient(&self, mode: FrictionMode) -> f32 {
        match mode {
            FrictionMode::Grounded => self.ground_friction,
            FrictionMode::Airborne => 0.0,
        }
    }

    /// Query pipeline пересобирается на каждое изменение состава мира:
    /// ground probe первого шага идёт раньше первого physics step.
    fn refresh_queries(&mut self) {
        self.queries.update(&self.colliders);
    }

    fn remove_collider(&mut self, handle: ColliderHandle) {
        self.colliders
            .remove(handle, &mut self.islands, &mut self.bodies, true);
        self.refresh_queries();
    }
}

fn groups(layers: CollisionLayers) -> Group {
    Group::from_bits_truncate(layers.0)
}

fn user_data(entity: Entity) -> u128 {
    entity.to_bits() as u128
}

/// Сборщик trigger enter событий на время одного step
#[derive(Default)]
struct TriggerEnters(RwLock<Vec<(Entity, Entity)>>);

impl EventHandler for TriggerEnters {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let CollisionEvent::Started(first, second, flags) = event else {
            return;
        };
        if !flags.contains(CollisionEventFlags::SENSOR) {
            return;
        }

        let (Some(first), Some(second)) = (colliders.get(first), colliders.get(second)) else {
            return;
        };
        // Sensor против sensor не бывает (оба parentless, fixed-fixed неактивны)
        let (body, trigger) = if first.is_sensor() {
            (second, first)
        } else {
            (first, second)
        };

        let (Ok(body), Ok(trigger)) = (
            Entity::try_from_bits(body.user_data as u64),
            Entity::try_from_bits(trigger.user_data as u64),
        ) else {
            return;
        };
        if let Ok(mut enters) = self.0.write() {
            enters.push((body, trigger));
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

impl PhysicsPort for RapierPhysics {
    fn insert_body(&mut self, entity: Entity, desc: BodyDesc) {
        self.remove_body(entity);

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![desc.position.x, desc.position.y])
            .lock_rotations()
            .user_data(user_data(entity))
            .build();
        let body = self.bodies.insert(body);

        let friction = FrictionMode::default();
        let collider = ColliderBuilder::cuboid(desc.half_extents.x, desc.half_extents.y)
            .mass(desc.mass)
            .friction(self.friction_coefficient(friction))
            .friction_combine_rule(CoefficientCombineRule::Min)
            .collision_groups(InteractionGroups::new(
                groups(CollisionLayers::ACTORS),
                Group::ALL,
            ))
            .user_data(user_data(entity))
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        // Масса нужна impulse'ам до первого step
        if let Some(body) = self.bodies.get_mut(body) {
            body.recompute_mass_properties_from_colliders(&self.colliders);
        }

        self.handles.insert(
            entity,
            BodyHandles {
                body,
                collider,
                friction,
            },
        );
        self.refresh_queries();
    }

    fn remove_body(&mut self, entity: Entity) {
        let Some(handles) = self.handles.remove(&entity) else {
            return;
        };

        self.bodies.remove(
            handles.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.refresh_queries();
    }

    fn insert_static(&mut self, rect: Rect, layers: CollisionLayers) {
        let center = rect.center();
        let half = rect.half_size();

        let collider = ColliderBuilder::cuboid(half.x, half.y)
            .translation(vector![center.x, center.y])
            .friction(self.ground_friction)
            .collision_groups(InteractionGroups::new(groups(layers), Group::ALL))
            .build();
        self.colliders.insert(collider);
        self.refresh_queries();
    }

    fn insert_trigger(&mut self, entity: Entity, position: Vec2, radius: f32) {
        self.remove_trigger(entity);

        let collider = ColliderBuilder::ball(radius)
            .translation(vector![position.x, position.y])
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .collision_groups(InteractionGroups::new(
                groups(CollisionLayers::TRIGGERS),
                groups(CollisionLayers::ACTORS),
            ))
            .user_data(user_data(entity))
            .build();
        let handle = self.colliders.insert(collider);

        self.triggers.insert(entity, handle);
        self.refresh_queries();
    }

    fn move_trigger(&mut self, entity: Entity, position: Vec2) {
        let Some(handle) = self.triggers.get(&entity) else {
            return;
        };

        if let Some(collider) = self.colliders.get_mut(*handle) {
            collider.set_translation(vector![position.x, position.y]);
        }
    }

    fn remove_trigger(&mut self, entity: Entity) {
        if let Some(handle) = self.triggers.remove(&entity) {
            self.remove_collider(handle);
        }
    }

    fn drain_trigger_enters(&mut self) -> Vec<(Entity, Entity)> {
        std::mem::take(&mut self.entered)
    }

    fn clear(&mut self) {
        *self = Self::new(self.gravity, self.ground_friction);
    }

    fn body_position(&self, entity: Entity) -> Option<Vec2> {
        let handles = self.handles.get(&entity)?;
        let translation = self.bodies.get(handles.body)?.translation();
        Some(Vec2::new(translation.x, translation.y))
    }

    fn linear_velocity(&self, entity: Entity) -> Option<Vec2> {
        let handles = self.handles.get(&entity)?;
        let velocity = self.bodies.get(handles.body)?.linvel();
        Some(Vec2::new(velocity.x, velocity.y))
    }

    fn set_linear_velocity(&mut self, entity: Entity, velocity: Vec2) {
        let Some(handles) = self.handles.get(&entity) else {
            return;
        };

        if let Some(body) = self.bodies.get_mut(handles.body) {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    fn apply_impulse(&mut self, entity: Entity, impulse: Vec2) {
        let Some(handles) = self.handles.get(&entity) else {
            return;
        };

        if let Some(body) = self.bodies.get_mut(handles.body) {
            body.apply_impulse(vector![impulse.x, impulse.y], true);
        }
    }

    fn set_friction(&mut self, entity: Entity, mode: FrictionMode) {
        let coefficient = self.friction_coefficient(mode);
        let Some(handles) = self.handles.get_mut(&entity) else {
            return;
        };

        handles.friction = mode;
        if let Some(collider) = self.colliders.get_mut(handles.collider) {
            collider.set_friction(coefficient);
        }
    }

    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO || max_distance < 0.0 {
            return None;
        }

        let ray = Ray::new(point![origin.x, origin.y], vector![direction.x, direction.y]);
        let filter = QueryFilter::default()
            .exclude_sensors()
            .groups(InteractionGroups::new(Group::ALL, groups(layers)));

        let (_, hit) = self.queries.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &ray,
            max_distance,
            true,
            filter,
        )?;

        let distance = hit.time_of_impact;
        Some(RayHit {
            point: origin + direction * distance,
            distance,
            normal: Vec2::new(hit.normal.x, hit.normal.y),
        })
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        self.integration.dt = dt;
        let events = TriggerEnters::default();

        self.pipeline.step(
            &vector![self.gravity.x, self.gravity.y],
            &self.integration,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.queries),
            &(),
            &events,
        );

        if let Ok(enters) = events.0.into_inner() {
            self.entered.extend(enters);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn floor_world() -> RapierPhysics {
        let mut physics = RapierPhysics::new(Vec2::new(0.0, -9.81), 0.4);
        // Пол: верхняя грань на y = 0
        physics.insert_static(
            Rect::from_corners(Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0)),
            CollisionLayers::GROUND,
        );
        physics
    }

    fn body(position: Vec2) -> BodyDesc {
        BodyDesc {
            position,
            half_extents: Vec2::splat(0.5),
            mass: 1.0,
        }
    }

    #[test]
    fn test_body_falls_and_rests_on_floor() {
        let mut physics = floor_world();
        let e = Entity::from_raw(1);
        physics.insert_body(e, body(Vec2::new(0.0, 3.0)));

        for _ in 0..240 {
            physics.step(DT);
        }

        let position = physics.body_position(e).unwrap();
        assert!((position.y - 0.5).abs() < 0.02, "y = {}", position.y);
        assert!(physics.linear_velocity(e).unwrap().y.abs() < 0.05);
    }

    #[test]
    fn test_raycast_hits_floor_before_first_step() {
        let physics = floor_world();

        let hit = physics
            .raycast(Vec2::new(0.0, 0.1), Vec2::NEG_Y, 0.2, CollisionLayers::GROUND)
            .expect("floor within probe length");

        assert!((hit.distance - 0.1).abs() < 1e-4);
        assert!((hit.normal - Vec2::Y).length() < 1e-4);
        assert!(hit.point.y.abs() < 1e-4);
    }

    #[test]
    fn test_raycast_respects_length_and_layers() {
        let mut physics = floor_world();
        // Тело игрока (Actors) над лучом не должно ловить ground probe
        physics.insert_body(Entity::from_raw(1), body(Vec2::new(0.0, 0.5)));

        // Слишком далеко
        assert!(physics
            .raycast(Vec2::new(0.0, 1.0), Vec2::NEG_Y, 0.2, CollisionLayers::GROUND)
            .is_none());
        // Не тот слой
        assert!(physics
            .raycast(Vec2::new(0.0, 0.1), Vec2::NEG_Y, 0.2, CollisionLayers::TRIGGERS)
            .is_none());
        // Мимо по x
        assert!(physics
            .raycast(Vec2::new(20.0, 0.1), Vec2::NEG_Y, 0.2, CollisionLayers::GROUND)
            .is_none());
        // Нулевое направление
        assert!(physics
            .raycast(Vec2::new(0.0, 0.1), Vec2::ZERO, 0.2, CollisionLayers::GROUND)
            .is_none());
    }

    #[test]
    fn test_impulse_scales_with_mass() {
        let mut physics = floor_world();
        let e = Entity::from_raw(1);
        physics.insert_body(
            e,
            BodyDesc {
                mass: 2.0,
                ..body(Vec2::new(0.0, 5.0))
            },
        );

        physics.apply_impulse(e, Vec2::new(-20.0, 0.0));

        let velocity = physics.linear_velocity(e).unwrap();
        assert!((velocity - Vec2::new(-10.0, 0.0)).length() < 1e-3, "v = {velocity}");
    }

    #[test]
    fn test_wall_friction_only_when_grounded_profile() {
        let mut physics = RapierPhysics::new(Vec2::ZERO, 0.5);
        // Стена справа: левая грань на x = 1
        physics.insert_static(
            Rect::from_corners(Vec2::new(1.0, -10.0), Vec2::new(2.0, 10.0)),
            CollisionLayers::GROUND,
        );

        let sticky = Entity::from_raw(1);
        let slippery = Entity::from_raw(2);
        // Разнесены по y, чтобы не задевать друг друга
        for (e, y) in [(sticky, 0.0), (slippery, 5.0)] {
            physics.insert_body(e, body(Vec2::new(0.5, y)));
            physics.set_linear_velocity(e, Vec2::new(1.0, -4.0));
        }
        physics.set_friction(sticky, FrictionMode::Grounded);
        physics.set_friction(slippery, FrictionMode::Airborne);

        physics.step(DT);

        let sticky_v = physics.linear_velocity(sticky).unwrap();
        let slippery_v = physics.linear_velocity(slippery).unwrap();

        assert!(sticky_v.x.abs() < 0.1, "sticky vx = {}", sticky_v.x);
        assert!((slippery_v.y - -4.0).abs() < 0.05, "slippery vy = {}", slippery_v.y);
        assert!(
            sticky_v.y > slippery_v.y + 0.1,
            "sticky vy = {}, slippery vy = {}",
            sticky_v.y,
            slippery_v.y
        );
    }

    #[test]
    fn test_trigger_reports_enter_once() {
        let mut physics = RapierPhysics::new(Vec2::ZERO, 0.4);
        let player = Entity::from_raw(1);
        let coin = Entity::from_raw(2);

        physics.insert_body(player, body(Vec2::ZERO));
        physics.insert_trigger(coin, Vec2::new(0.6, 0.0), 0.3);

        for _ in 0..3 {
            physics.step(DT);
        }
        assert_eq!(physics.drain_trigger_enters(), vec![(player, coin)]);

        // Всё ещё внутри: повторного enter нет
        physics.step(DT);
        assert!(physics.drain_trigger_enters().is_empty());

        // Вышли и вошли снова
        physics.move_trigger(coin, Vec2::new(5.0, 0.0));
        physics.step(DT);
        physics.move_trigger(coin, Vec2::new(0.6, 0.0));
        physics.step(DT);
        physics.step(DT);
        assert_eq!(physics.drain_trigger_enters(), vec![(player, coin)]);
    }

    #[test]
    fn test_removed_trigger_is_silent() {
        let mut physics = RapierPhysics::new(Vec2::ZERO, 0.4);
        let player = Entity::from_raw(1);
        let coin = Entity::from_raw(2);

        physics.insert_body(player, body(Vec2::ZERO));
        physics.insert_trigger(coin, Vec2::new(0.6, 0.0), 0.3);
        physics.remove_trigger(coin);

        for _ in 0..3 {
            physics.step(DT);
        }

        assert!(physics.drain_trigger_enters().is_empty());
        assert_eq!(physics.trigger_count(), 0);
    }

    #[test]
    fn test_missing_body_is_noop() {
        let mut physics = floor_world();
        let ghost = Entity::from_raw(99);

        physics.apply_impulse(ghost, Vec2::Y);
        physics.set_linear_velocity(ghost, Vec2::X);
        physics.set_friction(ghost, FrictionMode::Airborne);
        physics.move_trigger(ghost, Vec2::ONE);

        assert!(physics.linear_velocity(ghost).is_none());
        assert!(physics.body_position(ghost).is_none());
        assert!(physics.friction_of(ghost).is_none());
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn test_clear_drops_bodies_and_geometry() {
        let mut physics = floor_world();
        physics.insert_body(Entity::from_raw(1), body(Vec2::ZERO));
        physics.insert_trigger(Entity::from_raw(2), Vec2::ZERO, 0.3);

        physics.clear();

        assert_eq!(physics.body_count(), 0);
        assert_eq!(physics.trigger_count(), 0);
        assert!(physics
            .raycast(Vec2::new(0.0, 0.1), Vec2::NEG_Y, 1.0, CollisionLayers::ALL)
            .is_none());
    }
}
