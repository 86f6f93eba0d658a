use tracing::info;

use starstone_core::input::{InputState, Key};

use crate::config::PlatformerConfig;
use crate::error::SchemaError;
use crate::level::{Level, LevelEvent};
use crate::levels::{LevelSchema, default_levels};

/// Pause-menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NextLevel,
    ResetLevel,
    Exit,
}

impl MenuAction {
    pub fn from_key(key: Key) -> Option<MenuAction> {
        match key {
            Key::MenuNext => Some(MenuAction::NextLevel),
            Key::MenuReset => Some(MenuAction::ResetLevel),
            Key::MenuExit => Some(MenuAction::Exit),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::NextLevel => "Next level",
            MenuAction::ResetLevel => "Reset level",
            MenuAction::Exit => "Exit",
        }
    }
}

/// Outcome of one call to [`Game::frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Running,
    Paused,
    Exit,
}

/// Level rotation, pause menu and per-frame input routing.
#[derive(Debug)]
pub struct Game {
    config: PlatformerConfig,
    schemas: Vec<LevelSchema>,
    /// Index of the schema the next call to `next_level` picks.
    next_index: usize,
    current: Option<Level>,
    paused: bool,
    exit_requested: bool,
    frames: u64,
}

impl Game {
    /// A paused game with no level loaded yet.
    pub fn new(config: PlatformerConfig, schemas: Vec<LevelSchema>) -> Result<Self, SchemaError> {
        if schemas.is_empty() {
            return Err(SchemaError::NoLevels);
        }
        for schema in &schemas {
            schema.validate()?;
        }
        Ok(Self {
            config,
            schemas,
            next_index: 0,
            current: None,
            paused: true,
            exit_requested: false,
            frames: 0,
        })
    }

    /// The built-in levels, sized to the configured window.
    pub fn with_default_levels(config: PlatformerConfig) -> Result<Self, SchemaError> {
        let (x_tiles, y_tiles) = config.window.tiles(config.physics.tile_size);
        let schemas = default_levels(x_tiles, y_tiles)?;
        Self::new(config, schemas)
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    pub fn level(&self) -> Option<&Level> {
        self.current.as_ref()
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.current.as_mut()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Frames simulated so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Tear down the current level and build the next one. Past the last
    /// level no level is current and the game pauses; the call after that
    /// starts over from the first.
    pub fn next_level(&mut self) {
        if let Some(mut level) = self.current.take() {
            level.kill();
        }
        let Some(schema) = self.schemas.get(self.next_index).cloned() else {
            self.next_index = 0;
            self.paused = true;
            info!("Level rotation finished");
            return;
        };
        let seed = self.config.seed.wrapping_add(self.next_index as u64);
        self.next_index += 1;
        self.current = Some(Level::new(schema, self.config.physics.clone(), seed));
        self.start_level();
    }

    /// Rebuild the current level from its schema.
    pub fn start_level(&mut self) {
        if let Some(level) = &mut self.current {
            level.create();
            info!(level = %level.schema().name, "Level started");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.current.is_none() {
            self.next_level();
        }
        self.paused = !self.paused;
        info!(paused = self.paused, "Pause toggled");
    }

    pub fn apply_menu(&mut self, action: MenuAction) {
        info!(?action, "Menu");
        match action {
            MenuAction::NextLevel => {
                self.paused = false;
                self.next_level();
            },
            MenuAction::ResetLevel => {
                if self.current.is_some() {
                    self.start_level();
                    self.paused = false;
                }
            },
            MenuAction::Exit => self.exit_requested = true,
        }
    }

    /// Run one frame: route key edges, then tick the level unless paused.
    pub fn frame(&mut self, input: &InputState) -> FrameStatus {
        for &event in input.events() {
            if event.is_release_of(Key::Pause) {
                self.toggle_pause();
            } else if self.paused {
                if event.is_release()
                    && let Some(action) = MenuAction::from_key(event.key)
                {
                    self.apply_menu(action);
                }
            } else if let Some(level) = &mut self.current {
                level.handle_key_event(event);
            }
        }

        if self.exit_requested {
            return FrameStatus::Exit;
        }
        if self.paused {
            return FrameStatus::Paused;
        }
        let Some(level) = &mut self.current else {
            self.paused = true;
            return FrameStatus::Paused;
        };
        if !level.player_alive() {
            self.paused = true;
            return FrameStatus::Paused;
        }

        level.handle_key_state(input);
        level.tick();
        self.frames += 1;

        let mut advance = false;
        for event in level.take_events() {
            match event {
                LevelEvent::PointerReached | LevelEvent::BossDefeated => advance = true,
                LevelEvent::PlayerDied => info!("Player died"),
            }
        }
        if advance {
            self.next_level();
        }

        if self.paused {
            FrameStatus::Paused
        } else {
            FrameStatus::Running
        }
    }
}
