use starstone_core::geometry::Direction;
use tracing::debug;

use crate::entity::{Body, Character, EntityId};
use crate::level::{Level, LevelEvent};
use crate::physics::Contacts;

/// The player touching a pointer from either side ends the level.
pub(crate) fn pointer_touched(level: &mut Level, _id: EntityId, peers: &[EntityId]) {
    if level.player_id().is_some_and(|p| peers.contains(&p)) {
        level.complete(LevelEvent::PointerReached);
    }
}

/// The player shoves a box away from itself for one frame.
pub(crate) fn box_pushed(
    level: &mut Level,
    id: EntityId,
    direction: Direction,
    peers: &[EntityId],
) {
    if !level.player_id().is_some_and(|p| peers.contains(&p)) {
        return;
    }
    let speed = level.physics.box_push_speed;
    let Some(crate_box) = level.entity_mut(id) else {
        return;
    };
    if crate_box.mass <= 0.0 {
        return;
    }
    crate_box.velocity.x = match direction {
        Direction::Right => -speed,
        Direction::Left => speed,
        Direction::Up | Direction::Down => return,
    };
}

/// Boxes never keep horizontal speed past their own step.
pub(crate) fn box_after_step(level: &mut Level, id: EntityId) {
    if let Some(crate_box) = level.entity_mut(id) {
        crate_box.velocity.x = 0.0;
    }
}

/// Something landed on the platform.
pub(crate) fn platform_ridden(level: &mut Level, id: EntityId, peers: &[EntityId]) {
    let Some(Body::Platform(platform)) = level.entity_mut(id).map(|e| &mut e.body) else {
        return;
    };
    for &peer in peers {
        if peer != id && !platform.riders.contains(&peer) {
            platform.riders.push(peer);
        }
    }
}

/// Turn around at the ends of the patrol span or when blocked, then hand the
/// distance just travelled to everything that was riding.
pub(crate) fn platform_after_step(
    level: &mut Level,
    id: EntityId,
    moved: f32,
    contacts: &Contacts,
) {
    let speed = level.physics.platform_speed;
    let Some(entity) = level.entity_mut(id) else {
        return;
    };
    let x = entity.rect.x;
    let Body::Platform(platform) = &mut entity.body else {
        return;
    };
    let riders = std::mem::take(&mut platform.riders);
    let (start, end) = (platform.origin_x, platform.origin_x + platform.span);

    if !contacts.right.is_empty() || x >= end {
        entity.velocity.x = -speed;
    } else if !contacts.left.is_empty() || x <= start {
        entity.velocity.x = speed;
    }

    if moved == 0.0 {
        return;
    }
    for rider in riders {
        if let Some(rider) = level.entity_mut(rider) {
            rider.carry += moved;
        }
    }
}

/// Stone puzzle: while the boss lives, touching the lit stone hurts the
/// boss and moves the light elsewhere; touching a dark stone hurts the
/// player.
pub(crate) fn stone_after_step(level: &mut Level, id: EntityId) {
    let boss_alive = level
        .boss()
        .and_then(|b| b.character())
        .is_some_and(Character::is_alive);
    if !boss_alive {
        return;
    }
    let (Some(player), Some(stone)) = (level.player(), level.entity(id)) else {
        return;
    };
    if !stone.rect.intersects(&player.rect) {
        return;
    }
    let player = player.id();
    let activated = stone.stone().is_some_and(|s| s.is_activated());

    if activated {
        let damage = level.physics.stone_boss_damage;
        if let Some(boss) = level.boss_id().and_then(|b| level.entity_mut(b)) {
            boss.damage(damage);
        }
        if let Some(Body::Stone(stone)) = level.entity_mut(id).map(|e| &mut e.body) {
            stone.activated = false;
        }
        debug!(stone = %id, "Lit stone touched");
        level.activate_stone(Some(id));
    } else {
        let penalty = level.physics.stone_penalty;
        if let Some(player) = level.entity_mut(player) {
            player.damage(penalty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::entity::StarStone;
    use crate::levels::{ObjectKind, ObjectSpawn};
    use crate::test_helpers::{blank_level, blank_level_with, spawn_block, spawn_player};
    use starstone_core::geometry::Rect;
    use std::collections::HashSet;

    #[test]
    fn box_speed_resets_after_its_step() {
        let mut level = blank_level(10, 10);
        spawn_block(&mut level, Rect::new(0.0, 100.0, 400.0, 40.0));
        let id = level.spawn(Body::PushBox, Rect::new(100.0, 64.0, 36.0, 36.0));
        level.entity_mut(id).unwrap().velocity.x = 7.0;
        level.tick();
        let b = level.entity(id).unwrap();
        assert_eq!(b.velocity.x, 0.0);
        assert_eq!(b.rect.x, 107.0);
    }

    #[test]
    fn player_walking_into_box_pushes_it_away() {
        let mut level = blank_level(20, 10);
        spawn_block(&mut level, Rect::new(0.0, 100.0, 800.0, 40.0));
        let crate_box = level.spawn(Body::PushBox, Rect::new(200.0, 64.0, 36.0, 36.0));
        let player = spawn_player(&mut level, 168.0, 62.0);
        level.entity_mut(player).unwrap().velocity.x = 5.0;

        level.tick();
        assert_eq!(level.entity(player).unwrap().rect.right(), 200.0);
        // boxes step before players, so the push outlives the tick
        assert_eq!(level.entity(crate_box).unwrap().velocity.x, 2.0);

        level.tick();
        assert_eq!(level.entity(crate_box).unwrap().rect.x, 202.0);
        assert_eq!(level.entity(crate_box).unwrap().velocity.x, 2.0);
    }

    #[test]
    fn weightless_box_is_not_pushed() {
        let mut level = blank_level(10, 10);
        let crate_box = level.spawn(Body::PushBox, Rect::new(200.0, 64.0, 36.0, 36.0));
        let player = spawn_player(&mut level, 160.0, 62.0);
        level.entity_mut(crate_box).unwrap().mass = 0.0;
        box_pushed(&mut level, crate_box, Direction::Left, &[player]);
        assert_eq!(level.entity(crate_box).unwrap().velocity.x, 0.0);
    }

    #[test]
    fn pointer_contact_finishes_level() {
        let mut level = blank_level(10, 10);
        let pointer = level.spawn(Body::LevelPointer, Rect::new(100.0, 0.0, 30.0, 40.0));
        let player = spawn_player(&mut level, 0.0, 0.0);
        pointer_touched(&mut level, pointer, &[player]);
        pointer_touched(&mut level, pointer, &[player]);
        assert!(level.is_finished());
        assert_eq!(level.take_events(), vec![LevelEvent::PointerReached]);
    }

    #[test]
    fn platform_carries_its_rider() {
        let mut level = blank_level(20, 20);
        let platform = level.spawn_object(ObjectSpawn::new(
            ObjectKind::Platform { span_tiles: 6 },
            2,
            10,
        ));
        let top = level.entity(platform).unwrap().rect.top();
        let rider = spawn_player(&mut level, 90.0, top - 38.0);

        // land, then ride for a few frames
        level.tick();
        let x0 = level.entity(rider).unwrap().rect.x;
        let p0 = level.entity(platform).unwrap().rect.x;
        for _ in 0..5 {
            level.tick();
        }
        let dx_rider = level.entity(rider).unwrap().rect.x - x0;
        let dx_platform = level.entity(platform).unwrap().rect.x - p0;
        assert!(dx_platform > 0.0);
        assert_eq!(dx_rider, dx_platform);
        assert_eq!(level.entity(rider).unwrap().rect.bottom(), top);
    }

    #[test]
    fn platform_turns_around_at_span_end() {
        let mut level = blank_level(20, 20);
        let platform = level.spawn_object(ObjectSpawn::new(
            ObjectKind::Platform { span_tiles: 1 },
            2,
            10,
        ));
        let origin = level.entity(platform).unwrap().rect.x;
        let mut max_x = origin;
        for _ in 0..100 {
            level.tick();
            let x = level.entity(platform).unwrap().rect.x;
            max_x = max_x.max(x);
            assert!(x >= origin - level.physics().platform_speed);
        }
        assert!(max_x <= origin + 40.0 + level.physics().platform_speed);
    }

    #[test]
    fn platform_turns_around_when_blocked() {
        let mut level = blank_level(20, 20);
        let platform = level.spawn_object(ObjectSpawn::new(
            ObjectKind::Platform { span_tiles: 10 },
            2,
            10,
        ));
        let rect = level.entity(platform).unwrap().rect;
        spawn_block(&mut level, Rect::new(rect.right() + 3.0, rect.top(), 40.0, 40.0));
        level.tick();
        level.tick();
        let p = level.entity(platform).unwrap();
        assert_eq!(p.velocity.x, -level.physics().platform_speed);
        assert_eq!(p.rect.right(), rect.right() + 3.0);
    }

    fn stone_room() -> (Level, EntityId, EntityId, EntityId, EntityId) {
        let physics = PhysicsConfig::default();
        let mut level = blank_level(20, 20);
        spawn_block(&mut level, Rect::new(0.0, 400.0, 800.0, 40.0));
        let boss = level.spawn(Body::star_boss(&physics), Rect::new(300.0, 0.0, 120.0, 120.0));
        let a = level.spawn(Body::Stone(StarStone::default()), Rect::new(100.0, 376.0, 24.0, 24.0));
        let b = level.spawn(Body::Stone(StarStone::default()), Rect::new(600.0, 376.0, 24.0, 24.0));
        let player = spawn_player(&mut level, 95.0, 362.0);
        (level, boss, a, b, player)
    }

    #[test]
    fn lit_stone_hurts_boss_and_moves_the_light() {
        let (mut level, boss, a, b, _) = stone_room();
        level.activate_stone(Some(b));
        assert_eq!(level.active_stone(), Some(a));

        level.tick();
        let boss = level.entity(boss).unwrap().character().unwrap();
        assert_eq!(boss.health(), 100.0 - 14.5);
        assert_eq!(level.active_stone(), Some(b));
    }

    #[test]
    fn dark_stone_costs_the_player() {
        let (mut level, boss, a, _, player) = stone_room();
        level.activate_stone(Some(a));

        level.tick();
        assert_eq!(level.entity(boss).unwrap().character().unwrap().health(), 100.0);
        assert_eq!(level.entity(player).unwrap().character().unwrap().health(), 99.0);
    }

    #[test]
    fn stones_are_inert_once_the_boss_is_gone() {
        let (mut level, boss, a, _, player) = stone_room();
        level.activate_stone(Some(a));
        level.kill_entity(boss);
        level.tick();
        assert_eq!(level.entity(player).unwrap().character().unwrap().health(), 100.0);
        assert_eq!(level.take_events(), vec![LevelEvent::BossDefeated]);
    }

    #[test]
    fn each_lit_stone_touch_lights_exactly_one_other() {
        let mut physics = PhysicsConfig::default();
        // keep the boss alive for the whole run
        physics.stone_boss_damage = 0.0;
        let mut level = blank_level_with(30, 20, physics.clone());
        spawn_block(&mut level, Rect::new(0.0, 400.0, 1200.0, 40.0));
        level.spawn(Body::star_boss(&physics), Rect::new(540.0, 0.0, 120.0, 120.0));
        let stones: Vec<EntityId> = [100.0, 500.0, 900.0]
            .iter()
            .map(|&x| {
                let rect = Rect::new(x, 376.0, 24.0, 24.0);
                level.spawn(Body::Stone(StarStone::default()), rect)
            })
            .collect();
        let player = spawn_player(&mut level, 0.0, 362.0);
        level.activate_stone(None);

        let mut seen = HashSet::new();
        for _ in 0..100 {
            let lit = level.active_stone().unwrap();
            let stone = level.entity(lit).unwrap().rect;
            let p = level.entity_mut(player).unwrap();
            p.rect.x = stone.x;
            p.rect.set_bottom(stone.bottom());
            p.velocity.x = 0.0;
            p.velocity.y = 0.0;

            level.tick();

            let now_lit: Vec<EntityId> = stones
                .iter()
                .copied()
                .filter(|&s| level.entity(s).unwrap().stone().unwrap().is_activated())
                .collect();
            assert_eq!(now_lit.len(), 1);
            assert_ne!(now_lit[0], lit);
            seen.insert(now_lit[0]);
        }
        assert_eq!(seen.len(), stones.len());
        assert!(level.player_alive());
    }
}
