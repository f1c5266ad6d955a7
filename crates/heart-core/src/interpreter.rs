//! Gesture interpreter: the single writer of [`InteractionState`].
//!
//! Each classified frame is reduced to an [`InputClass`], looked up together
//! with the current focus in [`transition_for`], and the resulting
//! [`Transition`] is applied to a local copy of the state which is then
//! published in one write.
//!
//! | Focus     | Input                      | Transition |
//! |-----------|----------------------------|------------|
//! | focused   | open palm                  | `Navigate` |
//! | unfocused | open palm                  | `Scatter`  |
//! | any       | closed fist                | `Assemble` |
//! | any       | I-love-you                 | `Love`     |
//! | any       | thumb up                   | `Approve`  |
//! | any       | victory / pointing (> 0.5) | `Inspect`  |
//! | any       | anything else              | `Idle`     |

use crate::config::{EngineConfig, GestureParams};
use crate::gesture::{mirror_to_scene, GestureCategory, GestureEvent};
use crate::history::SignalHistory;
use crate::motion::{detect_shake, SwipeDetector};
use crate::state::{InteractionState, InteractionWriter, Mode, SpecialGesture};
use rand::prelude::*;

/// Commands from a UI control surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlCommand {
    ForceChaos,
    ForceFormed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Unfocused,
    Focused,
}

/// Interpreter-level view of a classified gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputClass {
    OpenPalm,
    ClosedFist,
    ILoveYou,
    ThumbUp,
    Pointing,
    Other,
}

impl InputClass {
    pub fn of(event: &GestureEvent, params: &GestureParams) -> Self {
        match event.category {
            GestureCategory::OpenPalm => Self::OpenPalm,
            GestureCategory::ClosedFist => Self::ClosedFist,
            GestureCategory::ILoveYou => Self::ILoveYou,
            GestureCategory::ThumbUp => Self::ThumbUp,
            GestureCategory::Victory | GestureCategory::PointingUp
                if event.confidence > params.pointing_min_confidence =>
            {
                Self::Pointing
            }
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Swipe between photos while one is focused.
    Navigate,
    /// Disperse into chaos and track shaking.
    Scatter,
    Assemble,
    Love,
    Approve,
    Inspect,
    Idle,
}

pub fn transition_for(focus: Focus, input: InputClass) -> Transition {
    match (focus, input) {
        (Focus::Focused, InputClass::OpenPalm) => Transition::Navigate,
        (Focus::Unfocused, InputClass::OpenPalm) => Transition::Scatter,
        (_, InputClass::ClosedFist) => Transition::Assemble,
        (_, InputClass::ILoveYou) => Transition::Love,
        (_, InputClass::ThumbUp) => Transition::Approve,
        (_, InputClass::Pointing) => Transition::Inspect,
        (_, InputClass::Other) => Transition::Idle,
    }
}

pub struct GestureInterpreter {
    writer: InteractionWriter,
    state: InteractionState,
    params: GestureParams,
    photo_count: usize,
    nav_history: SignalHistory,
    shake_history: SignalHistory,
    swipe: SwipeDetector,
    rng: StdRng,
}

impl GestureInterpreter {
    pub fn new(writer: InteractionWriter, config: &EngineConfig) -> Self {
        let params = config.gesture.clone();
        let state = writer.snapshot();
        Self {
            writer,
            state,
            nav_history: SignalHistory::new(params.nav_history_len),
            shake_history: SignalHistory::new(params.shake_history_len),
            swipe: SwipeDetector::new(
                params.swipe_threshold,
                params.swipe_cooldown_ms,
                params.min_motion_samples,
            ),
            photo_count: config.photo_count,
            params,
            rng: StdRng::seed_from_u64(config.seed_for(1)),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Interpret one gesture tick. `None` means nothing was classified this
    /// tick: the hand is marked lost, shaking stops, everything else holds.
    pub fn process(&mut self, event: Option<&GestureEvent>) -> Option<Transition> {
        let Some(event) = event else {
            self.sensing_gap();
            return None;
        };
        let focus = if self.state.focused_index.is_some() {
            Focus::Focused
        } else {
            Focus::Unfocused
        };
        let transition = transition_for(focus, InputClass::of(event, &self.params));
        let before = self.state;
        self.apply(transition, event);

        if let Some(landmarks) = &event.landmarks {
            self.state.hand_position = mirror_to_scene(landmarks.palm_center());
        }
        self.state.is_hand_detected = true;

        if before.mode != self.state.mode {
            log::info!(
                "[gesture] {} -> mode {:?}",
                event.category.label(),
                self.state.mode
            );
        }
        if before.focused_index != self.state.focused_index {
            log::debug!("[gesture] focus {:?}", self.state.focused_index);
        }
        self.writer.publish(self.state);
        Some(transition)
    }

    /// Hold last-known state but report the hand as lost.
    pub fn sensing_gap(&mut self) {
        self.state.is_hand_detected = false;
        self.state.is_shaking = false;
        self.writer.publish(self.state);
    }

    pub fn apply_command(&mut self, command: ControlCommand) {
        self.state.mode = match command {
            ControlCommand::ForceChaos => Mode::Chaos,
            ControlCommand::ForceFormed => Mode::Formed,
        };
        log::info!("[control] {:?}", command);
        self.writer.publish(self.state);
    }

    fn apply(&mut self, transition: Transition, event: &GestureEvent) {
        let wrist_x = event.landmarks.as_ref().map(|l| l.wrist().x);
        match transition {
            Transition::Navigate => {
                self.state.mode = Mode::Formed;
                self.state.is_shaking = false;
                self.state.special_gesture = None;
                if let Some(x) = wrist_x {
                    self.nav_history.push(x);
                    let samples = self.nav_history.as_sequence();
                    if let (Some(direction), Some(index)) = (
                        self.swipe.detect(&samples, event.timestamp_ms),
                        self.state.focused_index,
                    ) {
                        self.state.focused_index = Some(direction.step(index, self.photo_count));
                        log::debug!("[gesture] swipe {:?}", direction);
                    }
                }
            }
            Transition::Scatter => {
                self.state.mode = Mode::Chaos;
                self.state.focused_index = None;
                self.state.special_gesture = None;
                if let Some(x) = wrist_x {
                    self.shake_history.push(x);
                    let samples = self.shake_history.as_sequence();
                    self.state.is_shaking = detect_shake(
                        &samples,
                        self.params.min_motion_samples,
                        self.params.shake_min_direction_changes,
                    );
                } else {
                    self.state.is_shaking = false;
                }
            }
            Transition::Assemble => {
                self.state.mode = Mode::Formed;
                self.state.is_shaking = false;
                self.state.focused_index = None;
                self.state.special_gesture = None;
            }
            Transition::Love => {
                self.state.mode = Mode::Formed;
                self.state.special_gesture = Some(SpecialGesture::ILoveYou);
                self.state.is_shaking = false;
            }
            Transition::Approve => {
                self.state.special_gesture = Some(SpecialGesture::ThumbUp);
                self.state.is_shaking = false;
            }
            Transition::Inspect => {
                self.state.special_gesture = None;
                self.state.is_shaking = false;
                if self.photo_count > 0
                    && (self.state.focused_index.is_none()
                        || self.rng.gen_bool(self.params.refocus_chance.clamp(0.0, 1.0)))
                {
                    self.state.focused_index = Some(self.rng.gen_range(0..self.photo_count));
                }
            }
            Transition::Idle => {
                self.state.is_shaking = false;
                self.state.special_gesture = None;
            }
        }
    }
}
