pub mod animation;
pub mod geometry;
pub mod input;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::input::{InputState, Key};

    /// Input state with the given keys held and no edge events.
    pub fn held(keys: &[Key]) -> InputState {
        let mut input = InputState::new();
        for &key in keys {
            input.on_key_down(key);
        }
        input.clear_events();
        input
    }

    /// Input state containing a single press-and-release of `key`.
    pub fn tapped(key: Key) -> InputState {
        let mut input = InputState::new();
        input.on_key_down(key);
        input.on_key_up(key);
        input
    }
}
