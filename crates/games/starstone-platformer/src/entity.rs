use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use starstone_core::animation::Animation;
use starstone_core::geometry::Rect;

use crate::config::{CharacterStats, PhysicsConfig};

/// Frames in a character's walk cycle.
const CYCLE_FRAMES: usize = 4;
/// Default hold time of a walk-cycle frame.
const CYCLE_DELAY: u32 = 2;

/// Process-unique entity identifier, handed out in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fall speed derived from mass. Not scaled by tick duration.
pub fn gravity(mass: f32) -> f32 {
    mass * mass * 0.5
}

/// Update category. A level steps its groups in `UPDATE_ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Tiles,
    Walls,
    Characters,
    Players,
}

impl Group {
    pub const UPDATE_ORDER: [Group; 4] = [
        Group::Tiles,
        Group::Walls,
        Group::Characters,
        Group::Players,
    ];
}

/// Static level geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scenery {
    Background,
    BackgroundBrick,
    Ground,
    Brick,
    Border,
}

impl Scenery {
    pub fn is_solid(self) -> bool {
        matches!(self, Scenery::Ground | Scenery::Brick | Scenery::Border)
    }
}

/// A weightless solid that patrols `[origin_x, origin_x + span]` and
/// carries whatever stands on it.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingPlatform {
    pub origin_x: f32,
    pub span: f32,
    pub(crate) riders: Vec<EntityId>,
}

impl MovingPlatform {
    pub fn new(origin_x: f32, span: f32) -> Self {
        Self {
            origin_x,
            span: span.max(0.0),
            riders: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StarStone {
    pub(crate) activated: bool,
}

impl StarStone {
    pub fn is_activated(&self) -> bool {
        self.activated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WalkState {
    #[default]
    Idle,
    WalkRight,
    WalkLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frog {
    pub(crate) aggroed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player { walk: WalkState },
    Frog(Frog),
    StarBoss,
}

/// Observable behaviour state, derived from flags and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterState {
    Idle,
    WalkingLeft,
    WalkingRight,
    Jumping,
    Damaged,
    Dead,
}

/// Health, jump and damage bookkeeping shared by every character role.
#[derive(Debug, Clone)]
pub struct Character {
    pub(crate) health: f32,
    pub(crate) stats: CharacterStats,
    pub(crate) jumping: bool,
    pub(crate) facing_right: bool,
    pub(crate) damaged: bool,
    /// Rectangle at the moment the current jump started.
    pub(crate) jump_start: Option<Rect>,
    /// Height of the current jump, in tiles.
    pub(crate) jump_tiles: f32,
    /// Timer for the damaged state.
    pub(crate) hit: Animation,
    /// Walk cycle (idle pulse for the boss).
    pub(crate) cycle: Animation,
    pub(crate) role: Role,
}

impl Character {
    pub const MAX_HEALTH: f32 = 100.0;

    pub fn new(role: Role, stats: CharacterStats, physics: &PhysicsConfig) -> Self {
        Self {
            health: Self::MAX_HEALTH,
            stats,
            jumping: false,
            facing_right: true,
            damaged: false,
            jump_start: None,
            jump_tiles: stats.jump_tiles,
            hit: Animation::once(physics.hit_frames, physics.hit_frame_delay),
            cycle: Animation::looping(CYCLE_FRAMES, CYCLE_DELAY),
            role,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, Self::MAX_HEALTH);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Lose `amount` health (never below zero). The hit timer starts on the
    /// first hit and is not restarted by hits taken while it runs.
    pub fn damage(&mut self, amount: f32) {
        self.set_health(self.health - amount);
        if !self.damaged {
            self.damaged = true;
            self.hit.reset();
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    /// True for a frog that currently sees the player.
    pub fn is_aggroed(&self) -> bool {
        matches!(self.role, Role::Frog(f) if f.aggroed)
    }

    pub fn walk_state(&self) -> Option<WalkState> {
        match self.role {
            Role::Player { walk } => Some(walk),
            _ => None,
        }
    }

    /// Current frame of the walk cycle, for drawing.
    pub fn cycle_frame(&self) -> Option<usize> {
        self.cycle.current()
    }

    pub fn state(&self, velocity: Vec2) -> CharacterState {
        if !self.is_alive() {
            CharacterState::Dead
        } else if self.damaged {
            CharacterState::Damaged
        } else if self.jumping {
            CharacterState::Jumping
        } else if velocity.x > 0.0 {
            CharacterState::WalkingRight
        } else if velocity.x < 0.0 {
            CharacterState::WalkingLeft
        } else {
            CharacterState::Idle
        }
    }
}

/// Kind-specific state of an entity.
#[derive(Debug, Clone)]
pub enum Body {
    Scenery(Scenery),
    LevelPointer,
    PushBox,
    Platform(MovingPlatform),
    Stone(StarStone),
    Character(Character),
}

/// Copyable discriminant of [`Body`], used to pick reaction hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Scenery,
    LevelPointer,
    PushBox,
    Platform,
    Stone,
    Player,
    Frog,
    StarBoss,
}

impl Kind {
    pub fn is_character(self) -> bool {
        matches!(self, Kind::Player | Kind::Frog | Kind::StarBoss)
    }
}

impl Body {
    pub fn player(physics: &PhysicsConfig) -> Self {
        Body::Character(Character::new(
            Role::Player {
                walk: WalkState::Idle,
            },
            physics.player,
            physics,
        ))
    }

    pub fn frog(physics: &PhysicsConfig) -> Self {
        Body::Character(Character::new(
            Role::Frog(Frog::default()),
            physics.frog,
            physics,
        ))
    }

    pub fn star_boss(physics: &PhysicsConfig) -> Self {
        Body::Character(Character::new(
            Role::StarBoss,
            physics.star_boss,
            physics,
        ))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Body::Scenery(_) => Kind::Scenery,
            Body::LevelPointer => Kind::LevelPointer,
            Body::PushBox => Kind::PushBox,
            Body::Platform(_) => Kind::Platform,
            Body::Stone(_) => Kind::Stone,
            Body::Character(c) => match c.role {
                Role::Player { .. } => Kind::Player,
                Role::Frog(_) => Kind::Frog,
                Role::StarBoss => Kind::StarBoss,
            },
        }
    }

    pub fn group(&self) -> Group {
        match self.kind() {
            Kind::Scenery => match self {
                Body::Scenery(s) if s.is_solid() => Group::Walls,
                _ => Group::Tiles,
            },
            Kind::LevelPointer | Kind::PushBox | Kind::Platform | Kind::Stone => Group::Walls,
            Kind::Frog | Kind::StarBoss => Group::Characters,
            Kind::Player => Group::Players,
        }
    }

    /// Whether a freshly spawned entity of this kind joins the solid set.
    pub fn starts_solid(&self) -> bool {
        match self {
            Body::Scenery(s) => s.is_solid(),
            Body::LevelPointer | Body::PushBox | Body::Platform(_) => true,
            Body::Stone(_) => false,
            Body::Character(c) => !matches!(c.role, Role::StarBoss),
        }
    }

    pub fn default_mass(&self, physics: &PhysicsConfig) -> f32 {
        match self {
            Body::Scenery(_) | Body::Platform(_) => 0.0,
            Body::LevelPointer => physics.masses.level_pointer,
            Body::PushBox => physics.masses.push_box,
            Body::Stone(_) => physics.masses.star_stone,
            Body::Character(c) => c.stats.mass,
        }
    }
}

/// A simulated object: rectangle, velocity, mass and kind-specific body.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    pub rect: Rect,
    pub velocity: Vec2,
    pub mass: f32,
    /// Horizontal displacement handed over by a platform, consumed next step.
    pub(crate) carry: f32,
    group: Group,
    pub(crate) despawned: bool,
    pub body: Body,
}

impl Entity {
    pub(crate) fn new(body: Body, rect: Rect, mass: f32) -> Self {
        Self {
            id: EntityId::next(),
            rect,
            velocity: Vec2::ZERO,
            mass: mass.max(0.0),
            carry: 0.0,
            group: body.group(),
            despawned: false,
            body,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn kind(&self) -> Kind {
        self.body.kind()
    }

    pub fn gravity(&self) -> f32 {
        gravity(self.mass)
    }

    /// False once the entity has been killed, even before it is removed.
    pub fn is_active(&self) -> bool {
        !self.despawned
    }

    /// Scenery never moves and never reacts, so the level skips stepping it.
    pub fn is_inert(&self) -> bool {
        matches!(self.body, Body::Scenery(_))
    }

    pub fn character(&self) -> Option<&Character> {
        match &self.body {
            Body::Character(c) => Some(c),
            _ => None,
        }
    }

    pub fn character_mut(&mut self) -> Option<&mut Character> {
        match &mut self.body {
            Body::Character(c) => Some(c),
            _ => None,
        }
    }

    pub fn stone(&self) -> Option<&StarStone> {
        match &self.body {
            Body::Stone(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_is_half_mass_squared() {
        assert_eq!(gravity(0.0), 0.0);
        assert_eq!(gravity(5.0), 12.5);
        assert_eq!(gravity(10.0), 50.0);
    }

    #[test]
    fn ids_increase() {
        let physics = PhysicsConfig::default();
        let a = Entity::new(Body::PushBox, Rect::default(), 1.0);
        let b = Entity::new(Body::player(&physics), Rect::default(), 1.0);
        assert!(b.id() > a.id());
    }

    #[test]
    fn damage_clamps_and_flips_alive_once() {
        let physics = PhysicsConfig::default();
        let Body::Character(mut player) = Body::player(&physics) else {
            unreachable!()
        };
        assert_eq!(player.health(), 100.0);

        player.damage(30.0);
        assert_eq!(player.health(), 70.0);
        assert!(player.is_alive());

        player.damage(85.0);
        assert_eq!(player.health(), 0.0);
        assert!(!player.is_alive());
    }

    #[test]
    fn set_health_clamps_upper_bound() {
        let physics = PhysicsConfig::default();
        let Body::Character(mut frog) = Body::frog(&physics) else {
            unreachable!()
        };
        frog.set_health(250.0);
        assert_eq!(frog.health(), Character::MAX_HEALTH);
    }

    #[test]
    fn kinds_map_to_groups_and_solidity() {
        let physics = PhysicsConfig::default();
        let boss = Body::star_boss(&physics);
        assert_eq!(boss.group(), Group::Characters);
        assert!(!boss.starts_solid());

        let player = Body::player(&physics);
        assert_eq!(player.group(), Group::Players);
        assert!(player.starts_solid());

        let stone = Body::Stone(StarStone::default());
        assert!(!stone.starts_solid());
        assert_eq!(stone.default_mass(&physics), 10.0);

        assert_eq!(Body::Scenery(Scenery::Background).group(), Group::Tiles);
        assert_eq!(Body::Scenery(Scenery::Ground).group(), Group::Walls);
    }

    #[test]
    fn state_priorities() {
        let physics = PhysicsConfig::default();
        let Body::Character(mut c) = Body::frog(&physics) else {
            unreachable!()
        };
        assert_eq!(c.state(Vec2::ZERO), CharacterState::Idle);
        assert_eq!(c.state(Vec2::new(-1.0, 0.0)), CharacterState::WalkingLeft);
        c.jumping = true;
        assert_eq!(c.state(Vec2::new(-1.0, 0.0)), CharacterState::Jumping);
        c.damage(1.0);
        assert_eq!(c.state(Vec2::ZERO), CharacterState::Damaged);
        c.set_health(0.0);
        assert_eq!(c.state(Vec2::ZERO), CharacterState::Dead);
    }
}
