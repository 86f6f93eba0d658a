use std::collections::HashMap;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use starstone_core::geometry::{Direction, Rect, tile_point};
use starstone_core::input::{InputState, Key, KeyEvent};

use crate::character;
use crate::config::PhysicsConfig;
use crate::entity::{
    Body, Character, Entity, EntityId, Group, Kind, MovingPlatform, Scenery, StarStone,
};
use crate::levels::{LevelSchema, ObjectKind, ObjectSpawn};
use crate::objects;
use crate::physics;
use crate::solid::SolidSet;

/// Object sizes in tiles.
const POINTER_WIDTH: f32 = 0.75;
const BOX_SIZE: f32 = 0.9;
const STONE_SIZE: f32 = 0.6;
const PLATFORM_WIDTH: f32 = 3.0;
const PLATFORM_HEIGHT: f32 = 0.4;

/// Something the game loop has to act on after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    /// The player touched the level pointer.
    PointerReached,
    BossDefeated,
    PlayerDied,
}

/// One invocation of a collision hook, kept when recording is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionRecord {
    pub entity: EntityId,
    pub direction: Direction,
    pub peers: Vec<EntityId>,
    /// True for the mirrored notification a peer receives.
    pub auto: bool,
}

/// A running level: the entity arena, its solid set and the level-wide
/// references (player, boss, stones) that behaviours look up.
#[derive(Debug)]
pub struct Level {
    schema: LevelSchema,
    pub(crate) physics: PhysicsConfig,
    pub(crate) entities: HashMap<EntityId, Entity>,
    /// Registration order.
    order: Vec<EntityId>,
    pub(crate) solids: SolidSet,
    player: Option<EntityId>,
    boss: Option<EntityId>,
    stones: Vec<EntityId>,
    events: Vec<LevelEvent>,
    finished: bool,
    rng: StdRng,
    reaction_log: Option<Vec<ReactionRecord>>,
}

impl Level {
    /// An empty level. Call [`Level::create`] to instantiate the schema.
    pub fn new(schema: LevelSchema, physics: PhysicsConfig, seed: u64) -> Self {
        Self {
            schema,
            physics,
            entities: HashMap::new(),
            order: Vec::new(),
            solids: SolidSet::new(),
            player: None,
            boss: None,
            stones: Vec::new(),
            events: Vec::new(),
            finished: false,
            rng: StdRng::seed_from_u64(seed),
            reaction_log: None,
        }
    }

    pub fn schema(&self) -> &LevelSchema {
        &self.schema
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Instantiate tiles, borders, objects and the player. Any previous
    /// contents are dropped first.
    pub fn create(&mut self) {
        self.kill();
        let tile = self.physics.tile_size;

        for y in 0..self.schema.y_tiles {
            for x in 0..self.schema.x_tiles {
                if let Some(t) = self.schema.tile(x, y) {
                    let origin = tile_point(x, y, tile);
                    self.spawn(Body::Scenery(t.scenery()), Rect::at(origin, tile, tile));
                }
            }
        }

        let bounds = self.bounds();
        let borders = [
            Rect::new(-1.0, 0.0, 1.0, bounds.height()),
            Rect::new(bounds.right(), 0.0, 1.0, bounds.height()),
            Rect::new(0.0, -1.0, bounds.width(), 1.0),
            Rect::new(0.0, bounds.bottom(), bounds.width(), 1.0),
        ];
        for rect in borders {
            self.spawn(Body::Scenery(Scenery::Border), rect);
        }

        let objects = self.schema.objects.clone();
        for spawn in objects {
            self.spawn_object(spawn);
        }

        let stats = self.physics.player;
        let player = Body::player(&self.physics);
        self.spawn(player, Rect::at(self.start_point(), stats.width, stats.height));

        self.activate_stone(None);
        info!(
            level = %self.schema.name,
            entities = self.entities.len(),
            solids = self.solids.len(),
            "Level created"
        );
    }

    /// Drop every entity and reset level-wide state.
    pub fn kill(&mut self) {
        if !self.order.is_empty() {
            info!(level = %self.schema.name, "Level killed");
        }
        self.entities.clear();
        self.order.clear();
        self.solids.clear();
        self.player = None;
        self.boss = None;
        self.stones.clear();
        self.events.clear();
        self.finished = false;
    }

    /// Pixel position of the player's spawn tile.
    pub fn start_point(&self) -> Vec2 {
        let (x, y) = self.schema.start;
        tile_point(x, y, self.physics.tile_size)
    }

    /// Pixel extent of the tile grid.
    pub fn bounds(&self) -> Rect {
        let tile = self.physics.tile_size;
        Rect::new(
            0.0,
            0.0,
            self.schema.x_tiles as f32 * tile,
            self.schema.y_tiles as f32 * tile,
        )
    }

    /// Register a new entity with its kind's default mass.
    pub fn spawn(&mut self, body: Body, rect: Rect) -> EntityId {
        let mass = body.default_mass(&self.physics);
        let solid = body.starts_solid();
        let entity = Entity::new(body, rect, mass);
        let id = entity.id();
        match entity.kind() {
            Kind::Player => self.player = Some(id),
            Kind::StarBoss => self.boss = Some(id),
            Kind::Stone => self.stones.push(id),
            _ => {},
        }
        if solid {
            self.solids.insert(id);
        }
        self.order.push(id);
        self.entities.insert(id, entity);
        id
    }

    /// Place a schema object, horizontally centred and resting on the bottom
    /// of its tile.
    pub fn spawn_object(&mut self, spawn: ObjectSpawn) -> EntityId {
        let tile = self.physics.tile_size;
        let (body, width, height) = match spawn.kind {
            ObjectKind::PushBox => (Body::PushBox, tile * BOX_SIZE, tile * BOX_SIZE),
            ObjectKind::LevelPointer => (Body::LevelPointer, tile * POINTER_WIDTH, tile),
            ObjectKind::StarStone => (
                Body::Stone(StarStone::default()),
                tile * STONE_SIZE,
                tile * STONE_SIZE,
            ),
            ObjectKind::Frog => (
                Body::frog(&self.physics),
                self.physics.frog.width,
                self.physics.frog.height,
            ),
            ObjectKind::StarBoss => (
                Body::star_boss(&self.physics),
                self.physics.star_boss.width,
                self.physics.star_boss.height,
            ),
            ObjectKind::Platform { span_tiles } => {
                let origin = tile_point(spawn.x, spawn.y, tile);
                (
                    Body::Platform(MovingPlatform::new(origin.x, span_tiles as f32 * tile)),
                    tile * PLATFORM_WIDTH,
                    tile * PLATFORM_HEIGHT,
                )
            },
        };
        let cell = tile_point(spawn.x, spawn.y, tile);
        let mut rect = Rect::new(0.0, 0.0, width, height);
        if matches!(spawn.kind, ObjectKind::Platform { .. }) {
            rect.set_left(cell.x);
        } else {
            rect.set_left(cell.x + (tile - width) / 2.0);
        }
        rect.set_bottom(cell.y + tile);

        let platform_speed = self.physics.platform_speed;
        let id = self.spawn(body, rect);
        if let Some(entity) = self.entities.get_mut(&id)
            && entity.kind() == Kind::Platform
        {
            entity.velocity.x = platform_speed;
        }
        id
    }

    /// A live entity. Killed entities are hidden even before removal.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id).filter(|e| e.is_active())
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id).filter(|e| e.is_active())
    }

    /// Live entities in registration order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.iter().filter_map(|id| self.entity(*id))
    }

    pub fn len(&self) -> usize {
        self.entities().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player.filter(|id| self.entity(*id).is_some())
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.entity(id))
    }

    pub fn player_alive(&self) -> bool {
        self.player()
            .and_then(Entity::character)
            .is_some_and(Character::is_alive)
    }

    pub fn boss_id(&self) -> Option<EntityId> {
        self.boss.filter(|id| self.entity(*id).is_some())
    }

    pub fn boss(&self) -> Option<&Entity> {
        self.boss.and_then(|id| self.entity(id))
    }

    pub fn stones(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.stones.iter().filter_map(|id| self.entity(*id))
    }

    pub fn active_stone(&self) -> Option<EntityId> {
        self.stones()
            .find(|e| e.stone().is_some_and(StarStone::is_activated))
            .map(Entity::id)
    }

    pub fn is_solid(&self, id: EntityId) -> bool {
        self.solids.contains(id)
    }

    /// Add or remove an entity from the solid set.
    pub fn set_solid(&mut self, id: EntityId, solid: bool) {
        if solid {
            if self.entity(id).is_some() {
                self.solids.insert(id);
            }
        } else {
            self.solids.remove(id);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Events raised since the last call.
    pub fn take_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn complete(&mut self, event: LevelEvent) {
        if matches!(event, LevelEvent::PointerReached | LevelEvent::BossDefeated) {
            if self.finished {
                return;
            }
            self.finished = true;
        }
        info!(level = %self.schema.name, ?event, "Level event");
        self.events.push(event);
    }

    /// Kill an entity. It stops colliding at once and leaves the arena at the
    /// end of the tick.
    pub fn kill_entity(&mut self, id: EntityId) {
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        entity.despawned = true;
        if let Some(c) = entity.character_mut() {
            c.health = 0.0;
        }
        let kind = entity.kind();
        self.solids.remove(id);
        debug!(entity = %id, ?kind, "Entity killed");

        match kind {
            Kind::StarBoss => self.complete(LevelEvent::BossDefeated),
            Kind::Player => self.complete(LevelEvent::PlayerDied),
            _ => {},
        }
    }

    /// Deactivate every stone, then light up one random stone other than
    /// `except`.
    pub fn activate_stone(&mut self, except: Option<EntityId>) {
        for id in &self.stones {
            if let Some(Body::Stone(stone)) = self.entities.get_mut(id).map(|e| &mut e.body) {
                stone.activated = false;
            }
        }
        let candidates: Vec<EntityId> = self
            .stones
            .iter()
            .copied()
            .filter(|&id| Some(id) != except && self.entity(id).is_some())
            .collect();
        if candidates.is_empty() {
            return;
        }
        let chosen = candidates[self.rng.random_range(0..candidates.len())];
        if let Some(Body::Stone(stone)) = self.entities.get_mut(&chosen).map(|e| &mut e.body) {
            stone.activated = true;
        }
        debug!(stone = %chosen, "Stone activated");
    }

    /// Start keeping a log of collision hook invocations.
    pub fn record_reactions(&mut self) {
        self.reaction_log = Some(Vec::new());
    }

    pub fn reactions(&self) -> &[ReactionRecord] {
        self.reaction_log.as_deref().unwrap_or(&[])
    }

    pub(crate) fn log_reaction(&mut self, record: ReactionRecord) {
        if let Some(log) = &mut self.reaction_log {
            log.push(record);
        }
    }

    /// Ids to step this tick: groups in update order, registration order
    /// within each group, scenery skipped.
    pub fn update_order(&self) -> Vec<EntityId> {
        Group::UPDATE_ORDER
            .iter()
            .flat_map(|&group| {
                self.entities()
                    .filter(move |e| e.group() == group && !e.is_inert())
                    .map(Entity::id)
            })
            .collect()
    }

    /// Advance the level by one frame.
    pub fn tick(&mut self) {
        for id in self.update_order() {
            self.step_entity(id);
        }
        self.flush_removals();
    }

    /// One frame of movement, reactions and post-step behaviour for one
    /// entity.
    pub fn step_entity(&mut self, id: EntityId) {
        let Some(entity) = self.entity(id) else {
            return;
        };
        if entity.is_inert() {
            return;
        }
        let kind = entity.kind();
        let start_x = entity.rect.x;

        let contacts = physics::resolve(self, id);
        physics::dispatch(self, id, &contacts);

        let moved = self.entity(id).map_or(0.0, |e| e.rect.x - start_x);
        match kind {
            Kind::Player | Kind::Frog | Kind::StarBoss => character::after_step(self, id),
            Kind::PushBox => objects::box_after_step(self, id),
            Kind::Platform => objects::platform_after_step(self, id, moved, &contacts),
            Kind::Stone => objects::stone_after_step(self, id),
            Kind::LevelPointer | Kind::Scenery => {},
        }
    }

    /// Remove entities killed during the tick.
    pub fn flush_removals(&mut self) {
        let dead: Vec<EntityId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.entities.get(id).is_some_and(|e| !e.is_active()))
            .collect();
        if dead.is_empty() {
            return;
        }
        for id in &dead {
            self.entities.remove(id);
            self.solids.remove(*id);
        }
        self.order.retain(|id| self.entities.contains_key(id));
        self.stones.retain(|id| self.entities.contains_key(id));
    }

    /// Deliver a key edge to the player.
    pub fn handle_key_event(&mut self, event: KeyEvent) {
        if let Some(id) = self.player_id() {
            character::player_key_event(self, id, event);
        }
    }

    /// Feed the held-key snapshot to the player.
    pub fn handle_key_state(&mut self, input: &InputState) {
        if let Some(id) = self.player_id() {
            character::player_key_state(
                self,
                id,
                input.is_key_down(Key::Right),
                input.is_key_down(Key::Left),
            );
        }
    }
}
