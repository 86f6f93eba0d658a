pub mod character;
pub mod config;
pub mod entity;
pub mod error;
pub mod game;
pub mod level;
pub mod levels;
pub mod objects;
pub mod physics;
pub mod reactions;
pub mod solid;

pub use config::{PhysicsConfig, PlatformerConfig};
pub use entity::{Body, Entity, EntityId, Kind};
pub use error::SchemaError;
pub use game::{FrameStatus, Game, MenuAction};
pub use level::{Level, LevelEvent};
pub use levels::{LevelSchema, ObjectKind, ObjectSpawn, Tile};

/// Fixtures shared by unit and integration tests.
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use starstone_core::geometry::Rect;

    use crate::config::PhysicsConfig;
    use crate::entity::{Body, EntityId, Scenery};
    use crate::level::Level;
    use crate::levels::LevelSchema;

    /// An empty level (nothing created) with default physics.
    pub fn blank_level(x_tiles: u32, y_tiles: u32) -> Level {
        blank_level_with(x_tiles, y_tiles, PhysicsConfig::default())
    }

    pub fn blank_level_with(x_tiles: u32, y_tiles: u32, physics: PhysicsConfig) -> Level {
        Level::new(LevelSchema::open("test", x_tiles, y_tiles), physics, 7)
    }

    /// A solid, immovable brick.
    pub fn spawn_block(level: &mut Level, rect: Rect) -> EntityId {
        level.spawn(Body::Scenery(Scenery::Brick), rect)
    }

    /// A player with the configured size, top-left corner at `(x, y)`.
    pub fn spawn_player(level: &mut Level, x: f32, y: f32) -> EntityId {
        let stats = level.physics().player;
        let body = Body::player(level.physics());
        level.spawn(body, Rect::new(x, y, stats.width, stats.height))
    }

    pub fn spawn_frog(level: &mut Level, x: f32, y: f32) -> EntityId {
        let stats = level.physics().frog;
        let body = Body::frog(level.physics());
        level.spawn(body, Rect::new(x, y, stats.width, stats.height))
    }
}
