//! Stand-ins for the camera and the hand-gesture model so the engine can run
//! headless. The classifier plays a looping script of gestures and wrist
//! motions keyed by the frame timestamp.

use glam::Vec2;
use heart_core::{
    CameraSource, Classification, ClassifierError, ClassifierOutput, GestureClassifier,
    SessionError, VideoFrame,
};
use rand::prelude::*;
use std::sync::Arc;

pub struct SimulatedCamera {
    width: u32,
    height: u32,
    sequence: u64,
    pixels: Option<Arc<[u8]>>,
}

impl SimulatedCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sequence: 0,
            pixels: None,
        }
    }
}

impl CameraSource for SimulatedCamera {
    fn open(&mut self) -> Result<(u32, u32), SessionError> {
        if self.width == 0 || self.height == 0 {
            return Err(SessionError::CameraUnavailable("zero-sized frame".into()));
        }
        let len = (self.width * self.height) as usize;
        self.pixels = Some(Arc::from(vec![0u8; len]));
        log::info!("[camera] simulated {}x{}", self.width, self.height);
        Ok((self.width, self.height))
    }

    fn next_frame(&mut self) -> Option<VideoFrame> {
        let pixels = self.pixels.clone()?;
        self.sequence += 1;
        Some(VideoFrame {
            width: self.width,
            height: self.height,
            sequence: self.sequence,
            pixels,
        })
    }

    fn release(&mut self) {
        if self.pixels.take().is_some() {
            log::info!("[camera] released after {} frames", self.sequence);
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Motion {
    Still(f32),
    /// Side-to-side wrist oscillation: center, amplitude, period in ms.
    Sway(f32, f32, u64),
    /// Linear sweep across the segment.
    Sweep(f32, f32),
}

impl Motion {
    fn wrist_x(self, t_ms: u64, duration_ms: u64) -> f32 {
        match self {
            Motion::Still(x) => x,
            Motion::Sway(center, amp, period) => {
                let phase = (t_ms % period.max(1)) as f32 / period.max(1) as f32;
                center + amp * (phase * std::f32::consts::TAU).sin()
            }
            Motion::Sweep(from, to) => {
                let f = (t_ms as f32 / duration_ms.max(1) as f32).clamp(0.0, 1.0);
                from + (to - from) * f
            }
        }
    }
}

struct Segment {
    duration_ms: u64,
    label: Option<&'static str>,
    motion: Motion,
}

const fn seg(duration_ms: u64, label: Option<&'static str>, motion: Motion) -> Segment {
    Segment {
        duration_ms,
        label,
        motion,
    }
}

const SCRIPT: &[Segment] = &[
    seg(2500, Some("Open_Palm"), Motion::Still(0.5)),
    seg(2000, Some("Open_Palm"), Motion::Sway(0.5, 0.15, 240)),
    seg(3000, Some("Closed_Fist"), Motion::Still(0.45)),
    seg(1500, Some("Pointing_Up"), Motion::Still(0.5)),
    seg(1500, Some("Open_Palm"), Motion::Sweep(0.3, 0.7)),
    seg(1500, Some("Open_Palm"), Motion::Sweep(0.7, 0.3)),
    seg(2000, Some("ILoveYou"), Motion::Still(0.55)),
    seg(2000, Some("Thumb_Up"), Motion::Still(0.5)),
    seg(1500, None, Motion::Still(0.5)),
    seg(1000, Some("Closed_Fist"), Motion::Still(0.5)),
];

/// Offsets of the 21 landmarks from the wrist for an upright hand.
#[rustfmt::skip]
const HAND_SHAPE: [[f32; 2]; 21] = [
    [0.0, 0.0],
    [-0.05, -0.03], [-0.08, -0.07], [-0.10, -0.11], [-0.12, -0.14],
    [-0.03, -0.12], [-0.035, -0.17], [-0.04, -0.21], [-0.045, -0.24],
    [0.0, -0.13], [0.0, -0.19], [0.0, -0.23], [0.0, -0.26],
    [0.03, -0.12], [0.035, -0.17], [0.04, -0.21], [0.045, -0.24],
    [0.06, -0.10], [0.07, -0.14], [0.075, -0.17], [0.08, -0.19],
];

pub struct ScriptedClassifier {
    rng: StdRng,
    loaded: bool,
}

impl ScriptedClassifier {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            loaded: false,
        }
    }

    fn segment_at(timestamp_ms: u64) -> Option<(&'static Segment, u64)> {
        let total: u64 = SCRIPT.iter().map(|s| s.duration_ms).sum();
        if total == 0 {
            return None;
        }
        let mut t = timestamp_ms % total;
        for segment in SCRIPT {
            if t < segment.duration_ms {
                return Some((segment, t));
            }
            t -= segment.duration_ms;
        }
        None
    }

    fn hand(&mut self, wrist: Vec2) -> Vec<Vec2> {
        HAND_SHAPE
            .iter()
            .map(|[dx, dy]| {
                let jitter = Vec2::new(
                    self.rng.gen_range(-0.002..0.002),
                    self.rng.gen_range(-0.002..0.002),
                );
                wrist + Vec2::new(*dx, *dy) + jitter
            })
            .collect()
    }
}

impl GestureClassifier for ScriptedClassifier {
    fn load(&mut self) -> Result<(), SessionError> {
        self.loaded = true;
        Ok(())
    }

    fn recognize(
        &mut self,
        _frame: &VideoFrame,
        timestamp_ms: u64,
    ) -> Result<ClassifierOutput, ClassifierError> {
        if !self.loaded {
            return Err(ClassifierError::NotLoaded);
        }
        let Some((segment, t)) = Self::segment_at(timestamp_ms) else {
            return Ok(ClassifierOutput::default());
        };
        let Some(label) = segment.label else {
            return Ok(ClassifierOutput::default());
        };
        let wrist = Vec2::new(segment.motion.wrist_x(t, segment.duration_ms), 0.75);
        Ok(ClassifierOutput {
            classifications: vec![Classification {
                label: label.to_string(),
                score: self.rng.gen_range(0.75..0.98),
            }],
            landmarks: vec![self.hand(wrist)],
        })
    }
}
