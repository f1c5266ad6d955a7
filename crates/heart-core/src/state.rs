//! Interaction state shared between the gesture loop and the animation loop.
//!
//! Exactly one [`InteractionWriter`] exists per state (it is not `Clone`), and
//! the gesture interpreter owns it. Animation subsystems hold cheap
//! [`InteractionReader`] clones and copy out a whole snapshot per tick, so a
//! reader never observes a half-applied gesture update.

use glam::Vec2;
use std::sync::{Arc, RwLock};

/// Top-level visual state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Chaos,
    Formed,
}

/// One-shot gesture trigger distinct from the mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialGesture {
    ILoveYou,
    ThumbUp,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionState {
    pub mode: Mode,
    pub special_gesture: Option<SpecialGesture>,
    /// Mirrored/inverted normalized hand position; last known value while
    /// the hand is lost.
    pub hand_position: Vec2,
    pub is_hand_detected: bool,
    pub is_shaking: bool,
    pub focused_index: Option<usize>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: Mode::Chaos,
            special_gesture: None,
            hand_position: Vec2::ZERO,
            is_hand_detected: false,
            is_shaking: false,
            focused_index: None,
        }
    }
}

impl InteractionState {
    #[inline]
    pub fn is_formed(&self) -> bool {
        self.mode == Mode::Formed
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused_index.is_some()
    }
}

/// Create the state with defaults and split it into its single writer and a
/// reader that can be cloned freely.
pub fn interaction_channel() -> (InteractionWriter, InteractionReader) {
    let shared = Arc::new(RwLock::new(InteractionState::default()));
    (
        InteractionWriter {
            shared: Arc::clone(&shared),
        },
        InteractionReader { shared },
    )
}

pub struct InteractionWriter {
    shared: Arc<RwLock<InteractionState>>,
}

impl InteractionWriter {
    /// Replace the published state in one write.
    pub fn publish(&mut self, state: InteractionState) {
        let mut guard = self
            .shared
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = state;
    }

    pub fn snapshot(&self) -> InteractionState {
        *self
            .shared
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn reader(&self) -> InteractionReader {
        InteractionReader {
            shared: Arc::clone(&self.shared),
        }
    }
}

#[derive(Clone)]
pub struct InteractionReader {
    shared: Arc<RwLock<InteractionState>>,
}

impl InteractionReader {
    pub fn snapshot(&self) -> InteractionState {
        *self
            .shared
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
