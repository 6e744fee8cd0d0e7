//! Level contents and per-tick entity updates.
//!
//! A level owns the collision world and every non-player entity in it. Each
//! entity list is walked explicitly; entities that own a collider keep it in
//! sync with their position and register it in the [`InteractableRegistry`]
//! so contacts can be traced back to them.

use glam::Vec2;
use plunge_physics::{ColliderId, CollisionLayers, CollisionProbe, CollisionWorld};

use crate::config::SimulationConfig;
use crate::difficulty::{AllowedTiers, Difficulty, DifficultyConfigurable};
use crate::events::{EntityId, EventQueue, GameEvent};
use crate::interactable::{EntityKind, Interactable, InteractableRegistry, Stompable};
use crate::npc::{Dagger, DaggerSpawner, PatrolEnemy};
use crate::props::{BreakableBlock, Bouncer, Goal, Pickup, Spike};

/// Layers of a walking or flying enemy.
const ENEMY_LAYERS: CollisionLayers = CollisionLayers(
    CollisionLayers::HAZARD.0 | CollisionLayers::STOMPABLE.0 | CollisionLayers::ENEMY.0,
);

/// A game level: geometry, entities and the player spawn point.
#[derive(Debug)]
pub struct Level {
    /// Display name.
    pub name: String,

    /// Collision world for physics.
    pub world: CollisionWorld,

    pub registry: InteractableRegistry,

    pub player_spawn: Vec2,

    /// Tier applied by the last [`Level::apply_difficulty`].
    pub difficulty: Difficulty,

    pub patrols: Vec<PatrolEnemy>,
    pub daggers: Vec<Dagger>,
    pub spawners: Vec<DaggerSpawner>,
    pub blocks: Vec<BreakableBlock>,
    pub bouncers: Vec<Bouncer>,
    pub pickups: Vec<Pickup>,
    pub spikes: Vec<Spike>,
    pub goals: Vec<Goal>,

    config: SimulationConfig,
    next_id: EntityId,
}

impl Level {
    /// First id handed to level entities. Lower ids are reserved for players.
    pub const FIRST_ENTITY_ID: EntityId = 100;

    /// Create an empty level.
    pub fn new(name: &str, config: &SimulationConfig) -> Self {
        Self {
            name: name.to_string(),
            world: CollisionWorld::new(),
            registry: InteractableRegistry::new(),
            player_spawn: Vec2::ZERO,
            difficulty: Difficulty::default(),
            patrols: Vec::new(),
            daggers: Vec::new(),
            spawners: Vec::new(),
            blocks: Vec::new(),
            bouncers: Vec::new(),
            pickups: Vec::new(),
            spikes: Vec::new(),
            goals: Vec::new(),
            config: config.clone(),
            next_id: Self::FIRST_ENTITY_ID,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn register(
        &mut self,
        collider: ColliderId,
        entity: EntityId,
        kind: EntityKind,
        layers: CollisionLayers,
        stomp: Option<Stompable>,
    ) {
        self.registry.register(
            collider,
            Interactable {
                entity,
                kind,
                layers,
                stomp,
            },
        );
    }

    // ========================================================================
    // Building
    // ========================================================================

    /// Add static solid geometry.
    pub fn add_solid(&mut self, center: Vec2, half_extents: Vec2) -> ColliderId {
        self.world.add_box(center, half_extents, CollisionLayers::SOLID)
    }

    /// Add a solid convex shape such as a slope. `None` if the points do not
    /// form a hull.
    pub fn add_solid_hull(&mut self, points: &[Vec2]) -> Option<ColliderId> {
        self.world.add_convex_hull(points, CollisionLayers::SOLID)
    }

    pub fn add_patrol(&mut self, position: Vec2) -> EntityId {
        let id = self.allocate_id();
        let config = self.config.patrol;
        let probe = CollisionProbe::for_body(config.body, self.config.skin_width);
        let collider = self.world.add_box(
            config.body.center(position),
            config.body.half_extents(),
            ENEMY_LAYERS,
        );
        self.register(collider, id, EntityKind::PatrolEnemy, ENEMY_LAYERS, Some(Stompable::PLAIN));
        self.patrols
            .push(PatrolEnemy::new(id, collider, position, probe, config));
        id
    }

    pub fn add_dagger(&mut self, position: Vec2, spawner: Option<EntityId>) -> EntityId {
        let id = self.allocate_id();
        let config = self.config.dagger;
        let collider = self.world.add_box(
            config.body.center(position),
            config.body.half_extents(),
            ENEMY_LAYERS,
        );
        self.register(collider, id, EntityKind::Dagger, ENEMY_LAYERS, Some(Stompable::PLAIN));

        let mut dagger = Dagger::new(id, collider, position, config, self.config.skin_width);
        if let Some(spawner) = spawner {
            dagger = dagger.with_spawner(spawner);
        }
        dagger.apply_difficulty(self.difficulty);
        self.daggers.push(dagger);
        id
    }

    pub fn add_spawner(&mut self, position: Vec2) -> EntityId {
        let id = self.allocate_id();
        self.spawners
            .push(DaggerSpawner::new(id, position, self.config.spawner));
        id
    }

    pub fn add_block(&mut self, center: Vec2, half_extents: Vec2) -> EntityId {
        let id = self.allocate_id();
        let layers = CollisionLayers::SOLID | CollisionLayers::STOMPABLE;
        let collider = self.world.add_box(center, half_extents, layers);
        self.register(collider, id, EntityKind::BreakableBlock, layers, Some(Stompable::PLAIN));
        self.blocks.push(BreakableBlock::new(
            id,
            collider,
            center,
            self.config.props.break_duration,
        ));
        id
    }

    /// Add a bouncer whose arc starts at `origin`.
    pub fn add_bouncer(&mut self, origin: Vec2, half_extents: Vec2) -> EntityId {
        let id = self.allocate_id();
        let config = self.config.bouncer;
        let layers = CollisionLayers::STOMPABLE;
        let collider = self.world.add_box(origin, half_extents, layers);
        self.register(
            collider,
            id,
            EntityKind::Bouncer,
            layers,
            Some(Stompable::bouncy(config.bounce_force)),
        );

        // The phase offset can start it mid-arc.
        let bouncer = Bouncer::new(id, collider, origin, config);
        self.world.set_position(collider, bouncer.position());
        self.bouncers.push(bouncer);
        id
    }

    pub fn add_pickup(&mut self, center: Vec2, radius: f32) -> EntityId {
        let id = self.allocate_id();
        let layers = CollisionLayers::PICKUP;
        let collider = self.world.add_ball(center, radius, layers);
        self.register(collider, id, EntityKind::Pickup, layers, None);
        self.pickups.push(Pickup::new(
            id,
            collider,
            center,
            self.config.props.pickup_points,
            self.config.props.pickup_despawn,
        ));
        id
    }

    pub fn add_spike(&mut self, center: Vec2, half_extents: Vec2) -> EntityId {
        let id = self.allocate_id();
        let layers = CollisionLayers::SOLID | CollisionLayers::HAZARD;
        let collider = self.world.add_box(center, half_extents, layers);
        self.register(collider, id, EntityKind::Spike, layers, None);
        self.spikes.push(Spike::new(id, collider, center));
        id
    }

    /// Add a finish zone. It blocks nothing.
    pub fn add_goal(&mut self, center: Vec2, half_extents: Vec2) -> EntityId {
        let id = self.allocate_id();
        let layers = CollisionLayers::TRIGGER;
        let collider = self.world.add_box(center, half_extents, layers);
        self.register(collider, id, EntityKind::Goal, layers, None);
        self.goals.push(Goal::new(id, collider, center));
        id
    }

    /// Restrict an entity to the given tiers. Returns `false` if no entity
    /// has that id.
    pub fn set_allowed_tiers(&mut self, entity: EntityId, tiers: AllowedTiers) -> bool {
        fn set<T: DifficultyConfigurable>(
            items: &mut [T],
            id_of: impl Fn(&T) -> EntityId,
            entity: EntityId,
            tiers: AllowedTiers,
        ) -> bool {
            match items.iter_mut().find(|item| id_of(item) == entity) {
                Some(item) => {
                    item.set_allowed_tiers(tiers);
                    true
                }
                None => false,
            }
        }

        set(&mut self.patrols, |e| e.id, entity, tiers)
            || set(&mut self.daggers, |e| e.id, entity, tiers)
            || set(&mut self.spawners, |e| e.id, entity, tiers)
            || set(&mut self.blocks, |e| e.id, entity, tiers)
            || set(&mut self.bouncers, |e| e.id, entity, tiers)
            || set(&mut self.pickups, |e| e.id, entity, tiers)
            || set(&mut self.spikes, |e| e.id, entity, tiers)
            || set(&mut self.goals, |e| e.id, entity, tiers)
    }

    /// Remove entities not allowed on `tier` and resolve the tiered settings
    /// of the rest.
    ///
    /// Returns the number of entities removed.
    pub fn apply_difficulty(&mut self, tier: Difficulty) -> usize {
        self.difficulty = tier;
        let world = &mut self.world;
        let registry = &mut self.registry;

        let mut removed = 0;
        removed += filter_tier(&mut self.patrols, tier, |e| Some(e.collider), world, registry);
        removed += filter_tier(&mut self.daggers, tier, |e| Some(e.collider), world, registry);
        removed += filter_tier(&mut self.spawners, tier, |_| None, world, registry);
        removed += filter_tier(&mut self.blocks, tier, |e| Some(e.collider), world, registry);
        removed += filter_tier(&mut self.bouncers, tier, |e| Some(e.collider), world, registry);
        removed += filter_tier(&mut self.pickups, tier, |e| Some(e.collider), world, registry);
        removed += filter_tier(&mut self.spikes, tier, |e| Some(e.collider), world, registry);
        removed += filter_tier(&mut self.goals, tier, |e| Some(e.collider), world, registry);

        log::info!(
            "level '{}' set to {:?}, {} entities removed",
            self.name,
            tier,
            removed
        );
        removed
    }

    /// Number of entities in the level.
    pub fn entity_count(&self) -> usize {
        self.patrols.len()
            + self.daggers.len()
            + self.spawners.len()
            + self.blocks.len()
            + self.bouncers.len()
            + self.pickups.len()
            + self.spikes.len()
            + self.goals.len()
    }

    // ========================================================================
    // Per-tick update
    // ========================================================================

    /// Advance every entity by one fixed step.
    ///
    /// `target` is the live player's position, if any.
    pub fn update(&mut self, target: Option<Vec2>, delta_time: f32, events: &mut EventQueue) {
        let mut despawn = Vec::new();

        for patrol in &mut self.patrols {
            patrol.update(&self.world, delta_time);
            self.world.set_position(patrol.collider, patrol.center());
            if patrol.tick_timers(delta_time) {
                despawn.push(patrol.id);
            }
        }

        let mut spawn_at = Vec::new();
        for spawner in &mut self.spawners {
            if spawner.update(delta_time) {
                spawn_at.push((spawner.id, spawner.position));
            }
        }
        for (spawner, position) in spawn_at {
            let dagger = self.add_dagger(position, Some(spawner));
            if let Some(spawner) = self.spawners.iter_mut().find(|s| s.id == spawner) {
                spawner.spawned(dagger);
            }
            log::debug!("dagger {} spawned at {:?}", dagger, position);
        }

        for dagger in &mut self.daggers {
            let was_alive = dagger.is_alive();
            dagger.update(&self.world, target, delta_time, events);
            self.world.set_position(dagger.collider, dagger.center());
            if was_alive && !dagger.is_alive() {
                self.world.set_enabled(dagger.collider, false);
            }
            if dagger.tick_timers(delta_time) {
                despawn.push(dagger.id);
            }
        }

        for bouncer in &mut self.bouncers {
            let position = bouncer.update(delta_time);
            self.world.set_position(bouncer.collider, position);
        }

        for block in &mut self.blocks {
            if block.tick_timers(delta_time) {
                despawn.push(block.id);
            }
        }

        for pickup in &mut self.pickups {
            if pickup.tick_timers(delta_time) {
                despawn.push(pickup.id);
            }
        }

        for entity in despawn {
            self.despawn(entity, events);
        }
    }

    /// Deliver a queued event to the entities it concerns.
    pub fn handle_event(&mut self, event: &GameEvent, events: &mut EventQueue) {
        match *event {
            GameEvent::Stomped { stomper, target } => {
                if !self.notify_stomp(target, stomper, events) {
                    log::warn!("stomp on unknown entity {}", target);
                }
            }
            GameEvent::DaggerLaunched {
                dagger,
                spawner: Some(spawner),
                ..
            } => {
                if let Some(spawner) = self.spawners.iter_mut().find(|s| s.id == spawner) {
                    spawner.release(dagger);
                }
            }
            _ => {}
        }
    }

    /// Tell `target` it was stomped by `stomper`.
    ///
    /// Returns `false` if there is no such entity.
    pub fn notify_stomp(
        &mut self,
        target: EntityId,
        stomper: EntityId,
        events: &mut EventQueue,
    ) -> bool {
        if let Some(patrol) = self.patrols.iter_mut().find(|p| p.id == target) {
            if patrol.on_stomp(stomper, events) {
                self.world.set_enabled(patrol.collider, false);
            }
            return true;
        }
        if let Some(dagger) = self.daggers.iter_mut().find(|d| d.id == target) {
            if dagger.on_stomp(stomper, events) {
                self.world.set_enabled(dagger.collider, false);
            }
            return true;
        }
        if let Some(block) = self.blocks.iter_mut().find(|b| b.id == target) {
            if block.on_stomp(events) {
                self.world.set_enabled(block.collider, false);
            }
            return true;
        }
        // Bouncers only bounce the stomper.
        self.bouncers.iter().any(|b| b.id == target)
    }

    /// Collect a pickup for `by`. Returns the points awarded.
    pub fn collect(
        &mut self,
        pickup: EntityId,
        by: EntityId,
        events: &mut EventQueue,
    ) -> Option<u32> {
        let pickup = self.pickups.iter_mut().find(|p| p.id == pickup)?;
        let points = pickup.collect(by, events)?;
        self.world.set_enabled(pickup.collider, false);
        log::info!("pickup {} collected by {} for {} points", pickup.id, by, points);
        Some(points)
    }

    /// Mark `goal` reached by `by`. Returns `false` if there is no such goal
    /// or it was already reached.
    pub fn reach_goal(&mut self, goal: EntityId, by: EntityId) -> bool {
        let Some(goal) = self.goals.iter_mut().find(|g| g.id == goal) else {
            return false;
        };
        if !goal.reach(by) {
            return false;
        }
        log::info!("goal {} reached by {}", goal.id, by);
        true
    }

    fn despawn(&mut self, entity: EntityId, events: &mut EventQueue) {
        if let Some(collider) = self.registry.collider_of(entity) {
            self.registry.unregister(collider);
            self.world.remove(collider);
        }

        if let Some(index) = self.daggers.iter().position(|d| d.id == entity) {
            let dagger = self.daggers.remove(index);
            if let Some(spawner) = dagger.spawner {
                if let Some(spawner) = self.spawners.iter_mut().find(|s| s.id == spawner) {
                    spawner.release(entity);
                }
            }
        }
        self.patrols.retain(|p| p.id != entity);
        self.blocks.retain(|b| b.id != entity);
        self.pickups.retain(|p| p.id != entity);

        log::debug!("entity {} despawned", entity);
        events.push(GameEvent::Despawned { entity });
    }

    // ========================================================================
    // Demo content
    // ========================================================================

    /// A small course with one of everything.
    ///
    /// ```text
    ///  |                          []   o            D          G   |
    ///  |   P ->     ^^^   [##]        ~~~        E <->      /[##]|
    ///  |===========================================================|
    /// ```
    pub fn demo(config: &SimulationConfig) -> Self {
        let mut level = Self::new("demo", config);
        level.player_spawn = Vec2::new(-12.0, 2.0);

        // Floor and boundary walls
        level.add_solid(Vec2::new(0.0, -0.5), Vec2::new(20.0, 0.5));
        level.add_solid(Vec2::new(-20.5, 5.0), Vec2::new(0.5, 5.0));
        level.add_solid(Vec2::new(20.5, 5.0), Vec2::new(0.5, 5.0));

        // Ramp up to a ledge
        level.add_solid_hull(&[
            Vec2::new(14.0, 0.0),
            Vec2::new(18.0, 0.0),
            Vec2::new(18.0, 2.0),
        ]);
        level.add_solid(Vec2::new(19.0, 1.0), Vec2::new(1.0, 1.0));
        level.add_goal(Vec2::new(19.0, 3.0), Vec2::new(0.75, 1.0));

        level.add_spike(Vec2::new(-7.0, 0.25), Vec2::new(0.75, 0.25));
        level.add_block(Vec2::new(-3.0, 0.5), Vec2::splat(0.5));
        level.add_pickup(Vec2::new(-1.0, 2.5), 0.3);
        level.add_bouncer(Vec2::new(2.0, 0.25), Vec2::new(0.75, 0.25));
        level.add_patrol(Vec2::new(7.0, 0.55));
        level.add_spawner(Vec2::new(10.0, 6.0));

        let hard_only = level.add_patrol(Vec2::new(11.0, 0.55));
        level.set_allowed_tiers(hard_only, AllowedTiers::from_tier(Difficulty::Hard));

        level
    }
}

/// Drop entities not allowed on `difficulty` along with their colliders, and
/// apply the tier to the rest.
fn filter_tier<T: DifficultyConfigurable>(
    items: &mut Vec<T>,
    difficulty: Difficulty,
    collider_of: impl Fn(&T) -> Option<ColliderId>,
    world: &mut CollisionWorld,
    registry: &mut InteractableRegistry,
) -> usize {
    let before = items.len();
    items.retain_mut(|item| {
        if item.is_allowed(difficulty) {
            item.apply_difficulty(difficulty);
            return true;
        }
        if let Some(collider) = collider_of(item) {
            registry.unregister(collider);
            world.remove(collider);
        }
        false
    });
    before - items.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plunge_physics::SpatialQuery;

    const DT: f32 = 1.0 / 60.0;

    fn create_level() -> Level {
        let mut level = Level::new("test", &SimulationConfig::default());
        level.add_solid(Vec2::new(0.0, -0.5), Vec2::new(20.0, 0.5));
        level
    }

    #[test]
    fn test_entities_get_unique_ids() {
        let mut level = create_level();
        let a = level.add_patrol(Vec2::new(0.0, 0.55));
        let b = level.add_spike(Vec2::new(3.0, 0.25), Vec2::splat(0.25));
        let c = level.add_pickup(Vec2::new(5.0, 1.0), 0.3);

        assert!(a >= Level::FIRST_ENTITY_ID);
        assert!(a != b && b != c && a != c);
        assert_eq!(level.entity_count(), 3);
        assert_eq!(level.registry.len(), 3);
    }

    #[test]
    fn test_difficulty_removes_entities_and_colliders() {
        let mut level = create_level();
        let patrol = level.add_patrol(Vec2::new(0.0, 0.55));
        level.add_patrol(Vec2::new(5.0, 0.55));
        assert!(level.set_allowed_tiers(patrol, AllowedTiers::only(&[Difficulty::Easy])));
        assert!(!level.set_allowed_tiers(9999, AllowedTiers::NONE));
        let colliders = level.world.collider_count();

        let removed = level.apply_difficulty(Difficulty::Hard);

        assert_eq!(removed, 1);
        assert_eq!(level.patrols.len(), 1);
        assert_eq!(level.world.collider_count(), colliders - 1);
        assert!(level.registry.collider_of(patrol).is_none());
        assert_eq!(level.patrols[0].speed, 3.0);
    }

    #[test]
    fn test_patrol_collider_follows_enemy() {
        let mut level = create_level();
        level.add_patrol(Vec2::new(0.0, 0.55));
        let mut events = EventQueue::new();

        for _ in 0..30 {
            level.update(None, DT, &mut events);
        }

        let patrol = &level.patrols[0];
        assert!(patrol.position.x > 0.5);
        assert_eq!(level.world.position(patrol.collider), Some(patrol.center()));
    }

    #[test]
    fn test_stomped_patrol_despawns() {
        let mut level = create_level();
        let patrol = level.add_patrol(Vec2::new(0.0, 0.55));
        let mut events = EventQueue::new();

        level.handle_event(
            &GameEvent::Stomped {
                stomper: 1,
                target: patrol,
            },
            &mut events,
        );
        let collider = level.patrols[0].collider;
        assert!(!level.world.is_enabled(collider));
        assert!(matches!(events.pop(), Some(GameEvent::Died { .. })));

        for _ in 0..60 {
            level.update(None, DT, &mut events);
        }

        assert!(level.patrols.is_empty());
        assert!(level.registry.is_empty());
        assert!(events
            .iter()
            .any(|e| *e == GameEvent::Despawned { entity: patrol }));
    }

    #[test]
    fn test_block_stops_blocking_when_stomped() {
        let mut level = create_level();
        let block = level.add_block(Vec2::new(0.0, 0.5), Vec2::splat(0.5));
        let mut events = EventQueue::new();

        assert!(level
            .world
            .overlap_box(Vec2::new(0.0, 0.5), Vec2::splat(0.1), CollisionLayers::SOLID)
            .is_some());

        assert!(level.notify_stomp(block, 1, &mut events));
        assert!(level
            .world
            .overlap_box(Vec2::new(0.0, 0.5), Vec2::splat(0.1), CollisionLayers::SOLID)
            .is_none());
        assert_eq!(events.pop(), Some(GameEvent::BlockBroken { entity: block }));
    }

    #[test]
    fn test_collect_pickup_once() {
        let mut level = create_level();
        let pickup = level.add_pickup(Vec2::new(0.0, 1.0), 0.3);
        let mut events = EventQueue::new();

        assert_eq!(level.collect(pickup, 1, &mut events), Some(200));
        assert_eq!(level.collect(pickup, 1, &mut events), None);

        for _ in 0..30 {
            level.update(None, DT, &mut events);
        }
        assert!(level.pickups.is_empty());
    }

    #[test]
    fn test_spawner_cycle() {
        let mut level = create_level();
        let spawner = level.add_spawner(Vec2::new(0.0, 5.0));
        level.apply_difficulty(Difficulty::Hard);
        let mut events = EventQueue::new();
        let player = Some(Vec2::new(0.0, 0.55));

        // Interval 2s on hard, then 0.5s wait before launch.
        let mut launched_at = None;
        for tick in 0..300 {
            level.update(player, DT, &mut events);
            if tick < 100 {
                assert!(level.daggers.is_empty());
            }
            while let Some(event) = events.pop() {
                level.handle_event(&event, &mut events);
                if let GameEvent::DaggerLaunched { spawner: from, .. } = event {
                    assert_eq!(from, Some(spawner));
                    launched_at = Some(tick);
                }
            }
            if launched_at.is_some() {
                break;
            }
        }

        assert!(launched_at.is_some_and(|tick| tick > 140));
        assert_eq!(level.daggers.len(), 1);
        assert!(level.daggers[0].is_flying());
        assert!(level.spawners[0].pending().is_none());
    }

    #[test]
    fn test_bouncer_collider_moves() {
        let mut level = create_level();
        level.add_bouncer(Vec2::new(0.0, 0.25), Vec2::new(0.5, 0.25));
        let mut events = EventQueue::new();

        for _ in 0..60 {
            level.update(None, DT, &mut events);
        }

        let bouncer = &level.bouncers[0];
        let position = level.world.position(bouncer.collider).unwrap();
        assert!((position.y - 2.25).abs() < 1e-3);
    }

    #[test]
    fn test_goal_reached_once() {
        let mut level = create_level();
        let goal = level.add_goal(Vec2::new(5.0, 1.0), Vec2::splat(1.0));

        assert!(level.world.is_enabled(level.goals[0].collider));
        assert!(!level.reach_goal(goal + 1, 1));
        assert!(level.reach_goal(goal, 1));
        assert!(!level.reach_goal(goal, 1));
        assert!(level.goals[0].is_reached());
    }

    #[test]
    fn test_degenerate_hull_is_skipped() {
        let mut level = create_level();
        let colliders = level.world.collider_count();

        assert!(level.add_solid_hull(&[Vec2::ZERO]).is_none());
        assert!(level
            .add_solid_hull(&[Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)])
            .is_some());
        assert_eq!(level.world.collider_count(), colliders + 1);
    }

    #[test]
    fn test_demo_level() {
        let mut level = Level::demo(&SimulationConfig::default());
        assert_eq!(level.patrols.len(), 2);

        level.apply_difficulty(Difficulty::Medium);
        assert_eq!(level.patrols.len(), 1);
        assert_eq!(level.spawners.len(), 1);
        assert_eq!(level.goals.len(), 1);
    }
}
