use starstone_core::geometry::Direction;

use crate::entity::EntityId;
use crate::level::Level;
use crate::reactions;

/// Peers an entity ran into during one step, per side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contacts {
    pub left: Vec<EntityId>,
    pub right: Vec<EntityId>,
    pub down: Vec<EntityId>,
    pub up: Vec<EntityId>,
}

impl Contacts {
    pub fn get(&self, direction: Direction) -> &[EntityId] {
        match direction {
            Direction::Left => &self.left,
            Direction::Right => &self.right,
            Direction::Down => &self.down,
            Direction::Up => &self.up,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty() && self.down.is_empty() && self.up.is_empty()
    }
}

/// Move one entity by its velocity, one axis at a time, snapping out of
/// every solid it ends up overlapping.
///
/// A resting entity (vertical speed exactly zero) starts falling at
/// `gravity(mass)` first. The horizontal sweep includes any carry handed
/// over by a moving platform. A sweep with zero displacement never resolves.
pub fn resolve(level: &mut Level, id: EntityId) -> Contacts {
    let mut contacts = Contacts::default();
    let Some(entity) = level.entity_mut(id) else {
        return contacts;
    };

    if entity.velocity.y == 0.0 {
        entity.velocity.y = entity.gravity();
    }
    let dx = entity.velocity.x + entity.carry;
    let dy = entity.velocity.y;
    entity.carry = 0.0;
    let mut rect = entity.rect;

    rect.translate(dx, 0.0);
    for other in level.solids.overlapping(&rect, id, &level.entities) {
        let Some(obstacle) = level.entities.get(&other).map(|e| e.rect) else {
            continue;
        };
        if dx > 0.0 {
            rect.set_right(obstacle.left());
            contacts.right.push(other);
        } else if dx < 0.0 {
            rect.set_left(obstacle.right());
            contacts.left.push(other);
        }
    }

    rect.translate(0.0, dy);
    for other in level.solids.overlapping(&rect, id, &level.entities) {
        let Some(obstacle) = level.entities.get(&other).map(|e| e.rect) else {
            continue;
        };
        if dy > 0.0 {
            rect.set_bottom(obstacle.top());
            contacts.down.push(other);
        } else if dy < 0.0 {
            rect.set_top(obstacle.bottom());
            contacts.up.push(other);
        }
    }

    if let Some(entity) = level.entity_mut(id) {
        entity.rect = rect;
    }
    contacts
}

/// Fire the collision hooks for every side that saw contact, in the order
/// left, right, down, up.
pub fn dispatch(level: &mut Level, id: EntityId, contacts: &Contacts) {
    for direction in Direction::DISPATCH_ORDER {
        let peers = contacts.get(direction);
        if !peers.is_empty() {
            reactions::collide(level, id, direction, peers, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Body, gravity};
    use crate::test_helpers::{blank_level, spawn_block};
    use starstone_core::geometry::Rect;

    #[test]
    fn resting_entity_starts_falling() {
        let mut level = blank_level(10, 10);
        let id = level.spawn(Body::PushBox, Rect::new(0.0, 0.0, 36.0, 36.0));
        let contacts = resolve(&mut level, id);
        let e = level.entity(id).unwrap();
        assert!(contacts.is_empty());
        assert_eq!(e.velocity.y, gravity(5.0));
        assert_eq!(e.rect.y, 12.5);
    }

    #[test]
    fn stationary_overlap_is_not_resolved_horizontally() {
        let mut level = blank_level(10, 10);
        let block = spawn_block(&mut level, Rect::new(10.0, 0.0, 40.0, 40.0));
        let id = level.spawn(Body::PushBox, Rect::new(0.0, 0.0, 20.0, 20.0));
        level.entity_mut(id).unwrap().mass = 0.0;

        let contacts = resolve(&mut level, id);
        assert!(contacts.left.is_empty() && contacts.right.is_empty());
        assert_eq!(level.entity(id).unwrap().rect.x, 0.0);
        assert!(level.is_solid(block));
    }

    #[test]
    fn rightward_hit_snaps_to_obstacle() {
        let mut level = blank_level(10, 10);
        let block = spawn_block(&mut level, Rect::new(24.0, 0.0, 40.0, 40.0));
        let id = level.spawn(Body::PushBox, Rect::new(0.0, 0.0, 20.0, 20.0));
        {
            let e = level.entity_mut(id).unwrap();
            e.mass = 0.0;
            e.velocity.x = 10.0;
        }

        let contacts = resolve(&mut level, id);
        let e = level.entity(id).unwrap();
        assert_eq!(contacts.right, vec![block]);
        assert_eq!(e.rect.right(), 24.0);
        assert_eq!(e.rect.x, 4.0);
    }

    #[test]
    fn leftward_hit_snaps_to_obstacle() {
        let mut level = blank_level(10, 10);
        let block = spawn_block(&mut level, Rect::new(0.0, 0.0, 40.0, 40.0));
        let id = level.spawn(Body::PushBox, Rect::new(45.0, 0.0, 20.0, 20.0));
        {
            let e = level.entity_mut(id).unwrap();
            e.mass = 0.0;
            e.velocity.x = -8.0;
        }
        let contacts = resolve(&mut level, id);
        assert_eq!(contacts.left, vec![block]);
        assert_eq!(level.entity(id).unwrap().rect.left(), 40.0);
    }

    #[test]
    fn landing_and_ceiling_snap_vertically() {
        let mut level = blank_level(10, 10);
        let floor = spawn_block(&mut level, Rect::new(0.0, 100.0, 200.0, 40.0));
        let faller = level.spawn(Body::PushBox, Rect::new(0.0, 60.0, 36.0, 36.0));
        let contacts = resolve(&mut level, faller);
        assert_eq!(contacts.down, vec![floor]);
        assert_eq!(level.entity(faller).unwrap().rect.bottom(), 100.0);

        let riser = level.spawn(Body::PushBox, Rect::new(100.0, 145.0, 20.0, 20.0));
        level.entity_mut(riser).unwrap().velocity.y = -10.0;
        let contacts = resolve(&mut level, riser);
        assert_eq!(contacts.up, vec![floor]);
        assert_eq!(level.entity(riser).unwrap().rect.top(), 140.0);
    }

    #[test]
    fn horizontal_resolves_before_vertical() {
        let mut level = blank_level(10, 10);
        let wall = spawn_block(&mut level, Rect::new(50.0, 0.0, 40.0, 200.0));
        let floor = spawn_block(&mut level, Rect::new(0.0, 100.0, 50.0, 40.0));
        let id = level.spawn(Body::PushBox, Rect::new(20.0, 70.0, 20.0, 20.0));
        {
            let e = level.entity_mut(id).unwrap();
            e.velocity.x = 20.0;
            e.velocity.y = 20.0;
        }
        let contacts = resolve(&mut level, id);
        assert_eq!(contacts.right, vec![wall]);
        assert_eq!(contacts.down, vec![floor]);
        let e = level.entity(id).unwrap();
        assert_eq!(e.rect.right(), 50.0);
        assert_eq!(e.rect.bottom(), 100.0);
    }

    #[test]
    fn carry_is_consumed_by_one_sweep() {
        let mut level = blank_level(10, 10);
        let id = level.spawn(Body::PushBox, Rect::new(0.0, 0.0, 20.0, 20.0));
        level.entity_mut(id).unwrap().carry = 3.0;
        resolve(&mut level, id);
        resolve(&mut level, id);
        assert_eq!(level.entity(id).unwrap().rect.x, 3.0);
    }

    #[test]
    fn despawned_entities_do_not_move() {
        let mut level = blank_level(10, 10);
        let id = level.spawn(Body::PushBox, Rect::new(0.0, 0.0, 20.0, 20.0));
        level.kill_entity(id);
        assert!(resolve(&mut level, id).is_empty());
        assert_eq!(level.entities[&id].rect.y, 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rightward_displacement_is_capped_by_the_gap(
                gap in 0.0f32..50.0,
                speed in 0.5f32..100.0,
            ) {
                let mut level = blank_level(20, 20);
                spawn_block(&mut level, Rect::new(20.0 + gap, -100.0, 40.0, 300.0));
                let id = level.spawn(Body::PushBox, Rect::new(0.0, 0.0, 20.0, 20.0));
                {
                    let e = level.entity_mut(id).unwrap();
                    e.mass = 0.0;
                    e.velocity.x = speed;
                }
                resolve(&mut level, id);
                let moved = level.entity(id).unwrap().rect.x;
                prop_assert!((moved - speed.min(gap)).abs() < 1e-3);
            }

            #[test]
            fn falling_never_ends_inside_the_floor(
                height in 0.0f32..200.0,
                mass in 0.1f32..10.0,
            ) {
                let mut level = blank_level(20, 20);
                let floor = spawn_block(&mut level, Rect::new(-100.0, 300.0, 400.0, 40.0));
                let rect = Rect::new(0.0, 300.0 - 20.0 - height, 20.0, 20.0);
                let id = level.spawn(Body::PushBox, rect);
                level.entity_mut(id).unwrap().mass = mass;
                for _ in 0..400 {
                    resolve(&mut level, id);
                }
                let rect = level.entity(id).unwrap().rect;
                let floor = level.entity(floor).unwrap().rect;
                prop_assert!(!rect.intersects(&floor));
                prop_assert!(rect.bottom() <= floor.top());
            }
        }
    }
}
