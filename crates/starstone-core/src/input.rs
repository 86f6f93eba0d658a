use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Logical keys the game reacts to. The client maps physical keys onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Jump,
    Pause,
    MenuNext,
    MenuReset,
    MenuExit,
}

impl Key {
    pub const ALL: [Key; 7] = [
        Key::Left,
        Key::Right,
        Key::Jump,
        Key::Pause,
        Key::MenuNext,
        Key::MenuReset,
        Key::MenuExit,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
}

/// A discrete key edge, in the order it happened during the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
        }
    }

    pub fn released(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Released,
        }
    }

    pub fn is_release(&self) -> bool {
        self.state == KeyState::Released
    }

    pub fn is_release_of(&self, key: Key) -> bool {
        self.key == key && self.is_release()
    }
}

/// Keyboard state for one frame: held keys plus this frame's edges.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_down: HashSet<Key>,
    /// Edges received since the last `clear_events`.
    events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key down. Repeated downs of a held key produce no new edge.
    pub fn on_key_down(&mut self, key: Key) {
        if self.keys_down.insert(key) {
            self.events.push(KeyEvent::pressed(key));
        }
    }

    pub fn on_key_up(&mut self, key: Key) {
        self.keys_down.remove(&key);
        self.events.push(KeyEvent::released(key));
    }

    /// Check if a key is currently held.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    /// Called at the end of each frame; held keys persist.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}
