//! Loudness sampling for audio-reactive animation.
//!
//! Every sampler reports a normalized level in [0, 1]; 0 means silent or
//! inactive.

use crate::constants::{ANALYSER_BINS, ANALYSER_DB_FLOOR, LEVEL_FALL_TAU_SEC, LEVEL_RISE_TAU_SEC};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub trait AudioSampler: Send {
    fn level(&self) -> f32;
}

/// No audio source.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioSampler for SilentAudio {
    fn level(&self) -> f32 {
        0.0
    }
}

/// Average of the first analyser bins, mapping the dB floor to 0 and 0 dB
/// to 1.
pub fn analyser_level(bins_db: &[f32]) -> f32 {
    let take = bins_db.len().min(ANALYSER_BINS);
    if take == 0 {
        return 0.0;
    }
    let span = -ANALYSER_DB_FLOOR;
    let sum: f32 = bins_db[..take]
        .iter()
        .map(|v| ((v - ANALYSER_DB_FLOOR) / span).clamp(0.0, 1.0))
        .sum();
    sum / take as f32
}

/// Root-mean-square of a block of samples, clamped to [0, 1].
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let mean_sq = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
    mean_sq.sqrt().clamp(0.0, 1.0)
}

/// Attack/release smoother: rises quickly toward louder input and falls back
/// slowly.
#[derive(Clone, Copy, Debug)]
pub struct LevelMeter {
    level: f32,
    rise_tau_sec: f32,
    fall_tau_sec: f32,
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::new(LEVEL_RISE_TAU_SEC, LEVEL_FALL_TAU_SEC)
    }
}

impl LevelMeter {
    pub fn new(rise_tau_sec: f32, fall_tau_sec: f32) -> Self {
        Self {
            level: 0.0,
            rise_tau_sec: rise_tau_sec.max(f32::EPSILON),
            fall_tau_sec: fall_tau_sec.max(f32::EPSILON),
        }
    }

    pub fn update(&mut self, input: f32, dt_sec: f32) -> f32 {
        let target = if input.is_finite() {
            input.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let tau = if target > self.level {
            self.rise_tau_sec
        } else {
            self.fall_tau_sec
        };
        let alpha = 1.0 - (-dt_sec.max(0.0) / tau).exp();
        self.level += (target - self.level) * alpha;
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}

/// Lock-free level cell written from an audio callback and read from the
/// render loop.
#[derive(Clone, Debug, Default)]
pub struct SharedLevel {
    bits: Arc<AtomicU32>,
}

impl SharedLevel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, level: f32) {
        let level = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.bits.store(level.to_bits(), Ordering::Relaxed);
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl AudioSampler for SharedLevel {
    fn level(&self) -> f32 {
        self.load()
    }
}
