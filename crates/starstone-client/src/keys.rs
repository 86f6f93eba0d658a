use macroquad::input::{KeyCode, is_key_down, is_key_pressed};

use starstone_core::input::{InputState, Key};

/// Physical keys bound to each logical key.
pub const BINDINGS: [(KeyCode, Key); 9] = [
    (KeyCode::A, Key::Left),
    (KeyCode::Left, Key::Left),
    (KeyCode::D, Key::Right),
    (KeyCode::Right, Key::Right),
    (KeyCode::Space, Key::Jump),
    (KeyCode::Escape, Key::Pause),
    (KeyCode::N, Key::MenuNext),
    (KeyCode::R, Key::MenuReset),
    (KeyCode::Q, Key::MenuExit),
];

/// Fold this frame's keyboard into the persistent input state.
pub fn poll(input: &mut InputState) {
    sync(input, is_key_down, is_key_pressed);
}

/// A logical key is held while any of its physical keys is down. A press
/// and release within one frame still produces both edges.
fn sync(
    input: &mut InputState,
    is_down: impl Fn(KeyCode) -> bool,
    is_pressed: impl Fn(KeyCode) -> bool,
) {
    for key in Key::ALL {
        let bound = || {
            BINDINGS
                .iter()
                .filter(move |&&(_, k)| k == key)
                .map(|&(code, _)| code)
        };
        let down = bound().any(&is_down);
        let pressed = bound().any(&is_pressed);
        let held = input.is_key_down(key);

        if (down || pressed) && !held {
            input.on_key_down(key);
        }
        if !down && (held || pressed) {
            input.on_key_up(key);
        }
    }
}
