//! Motion classifiers over a [`SignalHistory`](crate::history::SignalHistory)
//! snapshot: shake (direction-change counting) and swipe (net displacement
//! with a cooldown).

use crate::constants::{
    MIN_MOTION_SAMPLES, SHAKE_MIN_DIRECTION_CHANGES, SWIPE_COOLDOWN_MS, SWIPE_THRESHOLD,
};

/// Number of strict local extrema in `samples` (first and last excluded).
pub fn count_direction_changes(samples: &[f32]) -> usize {
    samples
        .windows(3)
        .filter(|w| (w[1] > w[0] && w[1] > w[2]) || (w[1] < w[0] && w[1] < w[2]))
        .count()
}

/// Shake test with explicit thresholds. Returns false when fewer than
/// `min_samples` are available.
pub fn detect_shake(samples: &[f32], min_samples: usize, min_changes: usize) -> bool {
    if samples.len() < min_samples {
        return false;
    }
    count_direction_changes(samples) > min_changes
}

/// Shake test with the default window and threshold.
#[inline]
pub fn is_shaking(samples: &[f32]) -> bool {
    detect_shake(samples, MIN_MOTION_SAMPLES, SHAKE_MIN_DIRECTION_CHANGES)
}

/// Navigation step signalled by a swipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Previous,
    Next,
}

impl SwipeDirection {
    /// Apply this step to `index`, wrapping within `count` items.
    pub fn step(self, index: usize, count: usize) -> usize {
        if count == 0 {
            return index;
        }
        match self {
            SwipeDirection::Previous => (index % count + count - 1) % count,
            SwipeDirection::Next => (index % count + 1) % count,
        }
    }
}

/// Debounced swipe detector. Timestamps are monotonic milliseconds supplied
/// by the caller so detection is deterministic.
#[derive(Clone, Debug)]
pub struct SwipeDetector {
    threshold: f32,
    cooldown_ms: u64,
    min_samples: usize,
    last_fire_ms: Option<u64>,
}

impl Default for SwipeDetector {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD, SWIPE_COOLDOWN_MS, MIN_MOTION_SAMPLES)
    }
}

impl SwipeDetector {
    pub fn new(threshold: f32, cooldown_ms: u64, min_samples: usize) -> Self {
        Self {
            threshold,
            cooldown_ms,
            min_samples,
            last_fire_ms: None,
        }
    }

    /// Positive displacement (last minus first) beyond the threshold signals
    /// `Previous`, negative signals `Next`. A signal starts the cooldown.
    pub fn detect(&mut self, samples: &[f32], now_ms: u64) -> Option<SwipeDirection> {
        if samples.len() < self.min_samples {
            return None;
        }
        if self.is_cooling_down(now_ms) {
            return None;
        }
        let (first, last) = (samples[0], samples[samples.len() - 1]);
        let diff = last - first;
        let direction = if diff > self.threshold {
            SwipeDirection::Previous
        } else if diff < -self.threshold {
            SwipeDirection::Next
        } else {
            return None;
        };
        self.last_fire_ms = Some(now_ms);
        Some(direction)
    }

    pub fn is_cooling_down(&self, now_ms: u64) -> bool {
        self.last_fire_ms
            .map(|last| now_ms.saturating_sub(last) < self.cooldown_ms)
            .unwrap_or(false)
    }
}
