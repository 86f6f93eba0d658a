use macroquad::prelude::*;

use starstone_core::geometry::Rect;
use starstone_platformer::entity::{Character, Scenery};
use starstone_platformer::{Body, Entity, Game, Kind, MenuAction};

const SKY: Color = Color::new(0.45, 0.7, 0.95, 1.0);
const GROUND: Color = Color::new(0.35, 0.25, 0.15, 1.0);
const BRICK: Color = Color::new(0.65, 0.3, 0.2, 1.0);
const BACKDROP: Color = Color::new(0.38, 0.6, 0.85, 1.0);
const BACKDROP_BRICK: Color = Color::new(0.55, 0.45, 0.42, 1.0);
const PLAYER: Color = Color::new(0.2, 0.35, 0.9, 1.0);
const FROG: Color = Color::new(0.2, 0.7, 0.25, 1.0);
const FROG_AGGRO: Color = Color::new(0.55, 0.75, 0.1, 1.0);
const BOSS: Color = Color::new(0.55, 0.2, 0.7, 1.0);
const BOX: Color = Color::new(0.7, 0.5, 0.25, 1.0);
const PLATFORM: Color = Color::new(0.45, 0.45, 0.5, 1.0);
const POINTER: Color = Color::new(1.0, 0.85, 0.2, 1.0);
const STONE_LIT: Color = Color::new(1.0, 0.95, 0.3, 1.0);
const STONE_DARK: Color = Color::new(0.4, 0.4, 0.4, 1.0);
const HURT: Color = Color::new(0.95, 0.2, 0.2, 1.0);

const BAR_WIDTH: f32 = 200.0;
const BAR_HEIGHT: f32 = 14.0;

/// Render the current level, the HUD and, when paused, the menu.
pub fn frame(game: &Game) {
    clear_background(SKY);

    if let Some(level) = game.level() {
        for entity in level.entities() {
            if let Some(color) = color_of(entity) {
                fill(&pulsed(entity), color);
            }
        }
        if let Some(player) = level.player().and_then(|p| p.character()) {
            health_bar(player.health());
        }
        draw_text(&level.schema().name, screen_width() - 220.0, 28.0, 24.0, WHITE);
    }

    if game.is_paused() {
        menu(game.level().is_some());
    }
}

fn color_of(entity: &Entity) -> Option<Color> {
    let color = match &entity.body {
        Body::Scenery(Scenery::Border) => return None,
        Body::Scenery(Scenery::Background) => BACKDROP,
        Body::Scenery(Scenery::BackgroundBrick) => BACKDROP_BRICK,
        Body::Scenery(Scenery::Ground) => GROUND,
        Body::Scenery(Scenery::Brick) => BRICK,
        Body::LevelPointer => POINTER,
        Body::PushBox => BOX,
        Body::Platform(_) => PLATFORM,
        Body::Stone(stone) if stone.is_activated() => STONE_LIT,
        Body::Stone(_) => STONE_DARK,
        Body::Character(c) if c.is_damaged() => HURT,
        Body::Character(c) => match entity.kind() {
            Kind::Frog if c.is_aggroed() => FROG_AGGRO,
            Kind::Frog => FROG,
            Kind::StarBoss => BOSS,
            _ => PLAYER,
        },
    };
    Some(color)
}

/// Characters shrink by a pixel on odd walk-cycle frames.
fn pulsed(entity: &Entity) -> Rect {
    let odd = entity
        .character()
        .and_then(Character::cycle_frame)
        .is_some_and(|frame| frame % 2 == 1);
    if odd {
        entity.rect.expanded(-1.0, -1.0, -1.0, 0.0)
    } else {
        entity.rect
    }
}

fn fill(rect: &Rect, color: Color) {
    draw_rectangle(rect.x, rect.y, rect.width(), rect.height(), color);
}

fn health_bar(health: f32) {
    let ratio = (health / Character::MAX_HEALTH).clamp(0.0, 1.0);
    let color = if health >= 70.0 {
        GREEN
    } else if health >= 40.0 {
        ORANGE
    } else {
        RED
    };
    draw_rectangle(16.0, 16.0, BAR_WIDTH, BAR_HEIGHT, Color::from_rgba(40, 40, 40, 200));
    draw_rectangle(16.0, 16.0, BAR_WIDTH * ratio, BAR_HEIGHT, color);
    draw_rectangle_lines(16.0, 16.0, BAR_WIDTH, BAR_HEIGHT, 2.0, BLACK);
}

fn menu(started: bool) {
    draw_rectangle(0.0, 0.0, screen_width(), screen_height(), Color::new(0.0, 0.0, 0.0, 0.5));

    let x = screen_width() / 2.0 - 140.0;
    let mut y = screen_height() / 2.0 - 60.0;
    draw_text("Paused", x, y, 40.0, WHITE);
    y += 44.0;

    let entries = [
        ("N", MenuAction::NextLevel),
        ("R", MenuAction::ResetLevel),
        ("Q", MenuAction::Exit),
    ];
    for (key, action) in entries {
        draw_text(&format!("{key}  {}", action.label()), x, y, 28.0, WHITE);
        y += 32.0;
    }
    let resume = if started { "Esc  Resume" } else { "Esc  Start" };
    draw_text(resume, x, y, 28.0, WHITE);
}
