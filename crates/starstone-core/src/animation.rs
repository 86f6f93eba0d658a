use serde::{Deserialize, Serialize};

/// How a frame sequence behaves once its last frame has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationMode {
    /// Wrap back to the first frame forever.
    Looping,
    /// Yield `None` forever after the last frame, until `reset`.
    PlayOnceThenHold,
}

/// A lazily advanced sequence of frame indices.
///
/// Every call to [`Animation::advance`] is one tick. A frame is held for
/// `frame_delay + 1` ticks before the sequence steps to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frame_count: usize,
    frame_delay: u32,
    mode: AnimationMode,
    current: Option<usize>,
    delay: u32,
}

impl Animation {
    pub fn new(frame_count: usize, frame_delay: u32, mode: AnimationMode) -> Self {
        let mut animation = Self {
            frame_count,
            frame_delay,
            mode,
            current: None,
            delay: 0,
        };
        animation.reset();
        animation
    }

    pub fn looping(frame_count: usize, frame_delay: u32) -> Self {
        Self::new(frame_count, frame_delay, AnimationMode::Looping)
    }

    pub fn once(frame_count: usize, frame_delay: u32) -> Self {
        Self::new(frame_count, frame_delay, AnimationMode::PlayOnceThenHold)
    }

    /// Restart from the first frame.
    pub fn reset(&mut self) {
        self.current = (self.frame_count > 0).then_some(0);
        self.delay = 0;
    }

    /// Tick once and return the frame to show, or `None` once a
    /// play-once sequence has run out.
    pub fn advance(&mut self) -> Option<usize> {
        if self.delay >= self.frame_delay {
            self.delay = 0;
            self.current = self.next_frame();
        } else {
            self.delay += 1;
        }
        self.current
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn frame_delay(&self) -> u32 {
        self.frame_delay
    }

    pub fn set_frame_delay(&mut self, frame_delay: u32) {
        self.frame_delay = frame_delay;
    }

    fn next_frame(&self) -> Option<usize> {
        let current = self.current?;
        let next = current + 1;
        if next < self.frame_count {
            return Some(next);
        }
        match self.mode {
            AnimationMode::Looping => Some(0),
            AnimationMode::PlayOnceThenHold => None,
        }
    }
}
