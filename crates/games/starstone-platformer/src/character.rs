use starstone_core::geometry::Direction;
use starstone_core::input::{Key, KeyEvent};
use tracing::debug;

use crate::entity::{Body, Character, Entity, EntityId, Role, WalkState, gravity};
use crate::level::Level;

/// Knockback the player gets for landing on an enemy: extra speed, jump tiles.
pub const STOMP_BOUNCE: (f32, f32) = (5.0, 3.0);
/// Knockback the player gets from an enemy's side.
pub const SIDE_KNOCKBACK: (f32, f32) = (10.0, 2.0);
/// Hop an aggroed enemy makes when it walks into something.
pub const ENEMY_HOP: (f32, f32) = (5.0, 5.0);

impl Entity {
    /// Start a jump `tiles` high, or the character's default height.
    pub fn jump(&mut self, tiles: Option<f32>) {
        let start = self.rect;
        let Some(c) = self.character_mut() else {
            return;
        };
        c.jumping = true;
        c.jump_start = Some(start);
        c.jump_tiles = tiles.unwrap_or(c.stats.jump_tiles);
        let impulse = gravity(c.stats.jump_speed);
        self.velocity.y = -impulse;
    }

    /// Knock the character sideways while making it jump.
    ///
    /// `side` is true for a push to the right; by default the character is
    /// pushed against the way it faces. A pushed player also flips its walk
    /// state so that releasing the held key keeps the speed balanced.
    pub fn push(&mut self, extra: f32, tiles: Option<f32>, side: Option<bool>) {
        let Some(c) = self.character() else {
            return;
        };
        let side = side.unwrap_or(!c.facing_right);
        self.jump(tiles);
        let speed = (self.velocity.x.abs() * 2.0).max(1.0) + extra;
        self.velocity.x = if side { speed } else { -speed };

        if let Some(Character {
            role: Role::Player { walk },
            ..
        }) = self.character_mut()
        {
            *walk = match *walk {
                WalkState::WalkRight => WalkState::WalkLeft,
                WalkState::WalkLeft => WalkState::WalkRight,
                WalkState::Idle => WalkState::Idle,
            };
        }
    }

    pub fn damage(&mut self, amount: f32) {
        let id = self.id();
        if let Some(c) = self.character_mut() {
            c.damage(amount);
            debug!(entity = %id, amount, health = c.health, "Damaged");
        }
    }
}

/// A jumping player that touches down stops walking.
pub(crate) fn player_landing(level: &mut Level, id: EntityId, peers: &[EntityId]) {
    if peers.is_empty() {
        return;
    }
    let Some(entity) = level.entity_mut(id) else {
        return;
    };
    if entity.velocity.y < 0.0 {
        return;
    }
    if let Body::Character(c) = &mut entity.body
        && c.jumping
    {
        entity.velocity.x = 0.0;
        if let Role::Player { walk } = &mut c.role {
            *walk = WalkState::Idle;
        }
    }
}

/// Landing on anything but another character ends a jump. A character
/// launched upward earlier in the same dispatch is not landing.
pub(crate) fn land(level: &mut Level, id: EntityId, peers: &[EntityId]) {
    if peers.is_empty() || level.entity(id).is_none_or(|e| e.velocity.y < 0.0) {
        return;
    }
    let on_character = peers.iter().any(|p| {
        level
            .entities
            .get(p)
            .is_some_and(|e| e.kind().is_character())
    });
    if on_character {
        return;
    }
    if let Some(c) = level.entity_mut(id).and_then(Entity::character_mut) {
        c.jumping = false;
    }
}

/// Enemy reactions to touching the player or the scenery.
pub(crate) fn frog_contact(
    level: &mut Level,
    id: EntityId,
    direction: Direction,
    peers: &[EntityId],
) {
    let player = level.player_id().filter(|p| peers.contains(p));
    match direction {
        Direction::Up => {
            if let Some(player) = player {
                let (extra, tiles) = STOMP_BOUNCE;
                if let Some(p) = level.entity_mut(player) {
                    p.push(extra, Some(tiles), None);
                }
                debug!(enemy = %id, "Stomped");
                level.kill_entity(id);
            }
        },
        Direction::Down => {
            if let Some(player) = player {
                debug!(enemy = %id, "Landed on the player");
                level.kill_entity(player);
            }
        },
        Direction::Left | Direction::Right => {
            if let Some(player) = player {
                let damage = level.physics.enemy_damage;
                let (extra, tiles) = SIDE_KNOCKBACK;
                if let Some(p) = level.entity_mut(player) {
                    p.push(extra, Some(tiles), Some(direction == Direction::Right));
                    p.damage(damage);
                }
                return;
            }
            let Some(frog) = level.entity_mut(id) else {
                return;
            };
            let Some(c) = frog.character() else {
                return;
            };
            if c.is_aggroed() && !c.jumping {
                let (extra, tiles) = ENEMY_HOP;
                let facing = c.facing_right;
                frog.push(extra, Some(tiles), Some(facing));
            }
        },
    }
}

/// Per-frame character logic that runs after the entity has moved: death,
/// jump apex, hit timer, facing, walk cycle and role behaviour.
pub(crate) fn after_step(level: &mut Level, id: EntityId) {
    let tile = level.physics.tile_size;
    let Some(entity) = level.entity_mut(id) else {
        return;
    };
    if entity.character().is_some_and(|c| !c.is_alive()) {
        level.kill_entity(id);
        return;
    }

    let rect = entity.rect;
    let vx = entity.velocity.x;
    let Body::Character(c) = &mut entity.body else {
        return;
    };

    if c.jumping
        && let Some(start) = c.jump_start
    {
        let limit = c.jump_tiles * tile;
        let rise = start.y - rect.y;
        if rise >= limit {
            entity.rect.y += rise - limit;
            entity.velocity.y = gravity(c.stats.jump_speed);
            c.jump_tiles = c.stats.jump_tiles;
        }
    }

    if c.damaged && c.hit.advance().is_none() {
        c.damaged = false;
        c.hit.reset();
    }

    if vx > 0.0 {
        c.facing_right = true;
    } else if vx < 0.0 {
        c.facing_right = false;
    }
    c.cycle.advance();

    if matches!(c.role, Role::StarBoss) {
        let delay = if c.health >= Character::MAX_HEALTH {
            4
        } else if c.health >= 50.0 {
            3
        } else {
            2
        };
        c.cycle.set_frame_delay(delay);
    }
    if matches!(c.role, Role::Frog(_)) {
        frog_pursue(level, id);
    }
}

/// Chase the player while it is inside the aggro zone; stand still otherwise.
fn frog_pursue(level: &mut Level, id: EntityId) {
    let tile = level.physics.tile_size;
    let aggro = level.physics.aggro;
    let target = level
        .player()
        .filter(|p| p.character().is_some_and(Character::is_alive))
        .map(|p| p.rect);
    let Some(frog) = level.entity_mut(id) else {
        return;
    };
    let zone = frog.rect.expanded(
        aggro.left * tile,
        aggro.right * tile,
        aggro.up * tile,
        aggro.down * tile,
    );
    let chase = target.filter(|t| zone.intersects(t));
    match chase {
        Some(target) => go_to(frog, target.x),
        None => frog.velocity.x = 0.0,
    }
    if let Some(Character {
        role: Role::Frog(f),
        ..
    }) = frog.character_mut()
    {
        f.aggroed = chase.is_some();
    }
}

fn go_to(entity: &mut Entity, x: f32) {
    let jumping = entity.character().is_some_and(Character::is_jumping);
    if entity.rect.x < x {
        entity.velocity.x = entity.velocity.x.max(1.0);
    } else if entity.rect.x > x {
        entity.velocity.x = entity.velocity.x.min(-1.0);
    } else if !jumping {
        entity.velocity.x = 0.0;
    }
}

/// Jump on release of the jump key, only from rest.
pub(crate) fn player_key_event(level: &mut Level, id: EntityId, event: KeyEvent) {
    if !event.is_release_of(Key::Jump) {
        return;
    }
    let Some(player) = level.entity_mut(id) else {
        return;
    };
    let grounded = player.velocity.y == 0.0;
    if grounded && player.character().is_some_and(|c| !c.jumping) {
        player.jump(None);
    }
}

/// Walk state machine driven by the held direction keys.
///
/// Entering a walk state adds the walk speed (cancelling the opposite walk
/// first); leaving it takes the speed back without overshooting past zero.
pub(crate) fn player_key_state(level: &mut Level, id: EntityId, right: bool, left: bool) {
    let Some(player) = level.entity_mut(id) else {
        return;
    };
    let Body::Character(c) = &mut player.body else {
        return;
    };
    let Role::Player { walk } = &mut c.role else {
        return;
    };
    let speed = c.stats.walk_speed;
    let vx = &mut player.velocity.x;

    if right && *walk != WalkState::WalkRight {
        if *walk == WalkState::WalkLeft {
            *vx = (*vx + speed).min(0.0);
        }
        *vx += speed;
        *walk = WalkState::WalkRight;
    } else if !right && *walk == WalkState::WalkRight {
        *vx = (*vx - speed).max(0.0);
        *walk = WalkState::Idle;
    }

    if left && *walk != WalkState::WalkLeft {
        if *walk == WalkState::WalkRight {
            *vx = (*vx - speed).max(0.0);
        }
        *vx -= speed;
        *walk = WalkState::WalkLeft;
    } else if !left && *walk == WalkState::WalkLeft {
        *vx = (*vx + speed).min(speed);
        *walk = WalkState::Idle;
    }
}
