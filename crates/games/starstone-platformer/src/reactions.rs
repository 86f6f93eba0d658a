//! Collision hooks, selected by `(kind, direction)`.
//!
//! Every hook runs the base reaction, then (unless it is itself a mirrored
//! call) notifies each peer through the opposite-direction hook with
//! `auto = true`, then runs the kind-specific reaction.

use starstone_core::geometry::Direction;
use tracing::trace;

use crate::character;
use crate::entity::{EntityId, Kind};
use crate::level::{Level, ReactionRecord};
use crate::objects;

pub fn collide(
    level: &mut Level,
    id: EntityId,
    direction: Direction,
    peers: &[EntityId],
    auto: bool,
) {
    let Some(kind) = level.entity(id).map(|e| e.kind()) else {
        return;
    };
    trace!(entity = %id, ?kind, ?direction, peers = peers.len(), auto, "collide");
    level.log_reaction(ReactionRecord {
        entity: id,
        direction,
        peers: peers.to_vec(),
        auto,
    });

    if kind == Kind::Player && direction == Direction::Down {
        character::player_landing(level, id, peers);
    }

    base(level, id, direction, peers);

    if !auto {
        mirror(level, id, direction, peers);
    }

    if kind.is_character() && direction == Direction::Down {
        character::land(level, id, peers);
    }

    match (kind, direction) {
        (Kind::LevelPointer, Direction::Left | Direction::Right) => {
            objects::pointer_touched(level, id, peers)
        },
        (Kind::PushBox, Direction::Left | Direction::Right) => {
            objects::box_pushed(level, id, direction, peers)
        },
        (Kind::Platform, Direction::Up) => objects::platform_ridden(level, id, peers),
        (Kind::Frog, _) => character::frog_contact(level, id, direction, peers),
        _ => {},
    }
}

/// Vertical speed bookkeeping shared by every kind. A jumping character
/// keeps its speed when something is below it.
fn base(level: &mut Level, id: EntityId, direction: Direction, peers: &[EntityId]) {
    let Some(entity) = level.entity_mut(id) else {
        return;
    };
    let gravity = entity.gravity();
    match direction {
        Direction::Up => {
            entity.velocity.y = if peers.is_empty() { 0.0 } else { gravity };
        },
        Direction::Down => {
            if entity.character().is_some_and(|c| c.is_jumping()) {
                return;
            }
            if !peers.is_empty() {
                entity.velocity.y = 0.0;
            } else if entity.velocity.y == 0.0 {
                entity.velocity.y = gravity;
            }
        },
        Direction::Left | Direction::Right => {},
    }
}

fn mirror(level: &mut Level, id: EntityId, direction: Direction, peers: &[EntityId]) {
    for &peer in peers {
        collide(level, peer, direction.opposite(), &[id], true);
    }
}
