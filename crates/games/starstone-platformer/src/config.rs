use serde::{Deserialize, Serialize};

/// Tile edge length in pixels.
pub const TILE_SIZE: f32 = 40.0;
/// Health taken from the player on side contact with a frog.
pub const ENEMY_DAMAGE: f32 = 20.0;
/// Health taken from the boss when the player touches the active stone.
pub const STONE_BOSS_DAMAGE: f32 = 14.5;
/// Health taken from the player when touching an inactive stone.
pub const STONE_PENALTY: f32 = 1.0;
/// Lateral speed a box receives for one frame when the player pushes it.
pub const BOX_PUSH_SPEED: f32 = 2.0;
/// Horizontal patrol speed of moving platforms (pixels per tick).
pub const PLATFORM_SPEED: f32 = 2.0;
/// Number of frames in the hit sequence shown while damaged.
pub const HIT_FRAMES: usize = 4;
/// Ticks each hit frame is held for, minus one.
pub const HIT_FRAME_DELAY: u32 = 5;
/// Frames per second the client aims for.
pub const GAME_FPS: u32 = 60;

/// Movement parameters of one character kind.
///
/// Fields missing from a TOML table fall back to the player's stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    pub mass: f32,
    /// Fed through `gravity()` to get the upward jump impulse.
    pub jump_speed: f32,
    /// Jump height in tiles.
    pub jump_tiles: f32,
    pub walk_speed: f32,
    pub width: f32,
    pub height: f32,
}

impl CharacterStats {
    pub const PLAYER: CharacterStats = CharacterStats {
        mass: 5.0,
        jump_speed: 5.0,
        jump_tiles: 5.0,
        walk_speed: 5.0,
        width: 30.0,
        height: 38.0,
    };

    pub const FROG: CharacterStats = CharacterStats {
        mass: 5.0,
        jump_speed: 5.0,
        jump_tiles: 5.0,
        walk_speed: 5.0,
        width: 36.0,
        height: 28.0,
    };

    pub const STAR_BOSS: CharacterStats = CharacterStats {
        mass: 0.0,
        jump_speed: 0.0,
        jump_tiles: 0.0,
        walk_speed: 0.0,
        width: 120.0,
        height: 120.0,
    };
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self::PLAYER
    }
}

/// Size of a frog's detection zone, in tiles beyond its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggroConfig {
    pub left: f32,
    pub right: f32,
    pub up: f32,
    pub down: f32,
}

impl Default for AggroConfig {
    fn default() -> Self {
        Self {
            left: 5.0,
            right: 5.0,
            up: 5.0,
            down: 3.0,
        }
    }
}

/// Masses of the non-character object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassConfig {
    pub push_box: f32,
    pub level_pointer: f32,
    pub star_stone: f32,
}

impl Default for MassConfig {
    fn default() -> Self {
        Self {
            push_box: 5.0,
            level_pointer: 5.0,
            star_stone: 10.0,
        }
    }
}

/// Tunable simulation parameters, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub tile_size: f32,
    pub enemy_damage: f32,
    pub stone_boss_damage: f32,
    pub stone_penalty: f32,
    pub box_push_speed: f32,
    pub platform_speed: f32,
    pub hit_frames: usize,
    pub hit_frame_delay: u32,
    pub aggro: AggroConfig,
    pub masses: MassConfig,
    pub player: CharacterStats,
    pub frog: CharacterStats,
    pub star_boss: CharacterStats,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            enemy_damage: ENEMY_DAMAGE,
            stone_boss_damage: STONE_BOSS_DAMAGE,
            stone_penalty: STONE_PENALTY,
            box_push_speed: BOX_PUSH_SPEED,
            platform_speed: PLATFORM_SPEED,
            hit_frames: HIT_FRAMES,
            hit_frame_delay: HIT_FRAME_DELAY,
            aggro: AggroConfig::default(),
            masses: MassConfig::default(),
            player: CharacterStats::PLAYER,
            frog: CharacterStats::FROG,
            star_boss: CharacterStats::STAR_BOSS,
        }
    }
}

/// Window settings consumed by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Starstone".to_string(),
            width: 1200,
            height: 800,
            fullscreen: false,
            target_fps: GAME_FPS,
        }
    }
}

impl WindowConfig {
    /// Grid size that fills the window.
    pub fn tiles(&self, tile_size: f32) -> (u32, u32) {
        let tile = tile_size.max(1.0);
        (
            (self.width as f32 / tile) as u32,
            (self.height as f32 / tile) as u32,
        )
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub physics: PhysicsConfig,
    pub window: WindowConfig,
    /// Seed for stone activation draws.
    pub seed: u64,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            window: WindowConfig::default(),
            seed: 42,
        }
    }
}

impl PlatformerConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("STARSTONE_CONFIG")
            .unwrap_or_else(|_| "config/starstone.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                PlatformerConfig::default()
            }),
            Err(_) => PlatformerConfig::default(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<PlatformerConfig>(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = PlatformerConfig::from_toml(
            r#"
            seed = 7

            [physics]
            enemy_damage = 35.0

            [physics.player]
            jump_tiles = 3.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.physics.enemy_damage, 35.0);
        assert_eq!(cfg.physics.player.jump_tiles, 3.0);
        assert_eq!(cfg.physics.player.mass, CharacterStats::PLAYER.mass);
        assert_eq!(cfg.physics.tile_size, TILE_SIZE);
        assert_eq!(cfg.window, WindowConfig::default());
    }

    #[test]
    fn garbage_toml_is_an_error() {
        assert!(PlatformerConfig::from_toml("physics = 3").is_err());
    }

    #[test]
    fn window_tiles_fill_window() {
        let window = WindowConfig::default();
        assert_eq!(window.tiles(40.0), (30, 20));
    }

    #[test]
    fn default_roundtrips_through_toml() {
        let cfg = PlatformerConfig::default();
        let text = toml::to_string(&cfg).unwrap();
        assert_eq!(PlatformerConfig::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let text = include_str!("../../../../config/starstone.toml");
        assert_eq!(
            PlatformerConfig::from_toml(text).unwrap(),
            PlatformerConfig::default()
        );
    }
}
