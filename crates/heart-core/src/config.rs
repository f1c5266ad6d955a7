use crate::constants::*;
use crate::particles::{BurstEffect, BurstKind};

/// Thresholds and windows used by the gesture interpreter.
///
/// - `nav_history_len` / `shake_history_len`: window sizes of the two
///   independent x-position histories
/// - `min_motion_samples`: samples required before either motion classifier
///   may fire
/// - `swipe_threshold`, `swipe_cooldown_ms`: displacement and debounce for
///   photo navigation
/// - `pointing_min_confidence`: Victory / Pointing_Up below this are ignored
/// - `refocus_chance`: probability of picking a new photo while one is focused
#[derive(Clone, Debug, PartialEq)]
pub struct GestureParams {
    pub nav_history_len: usize,
    pub shake_history_len: usize,
    pub min_motion_samples: usize,
    pub shake_min_direction_changes: usize,
    pub swipe_threshold: f32,
    pub swipe_cooldown_ms: u64,
    pub pointing_min_confidence: f32,
    pub refocus_chance: f64,
}

impl Default for GestureParams {
    fn default() -> Self {
        Self {
            nav_history_len: NAV_HISTORY_LEN,
            shake_history_len: SHAKE_HISTORY_LEN,
            min_motion_samples: MIN_MOTION_SAMPLES,
            shake_min_direction_changes: SHAKE_MIN_DIRECTION_CHANGES,
            swipe_threshold: SWIPE_THRESHOLD,
            swipe_cooldown_ms: SWIPE_COOLDOWN_MS,
            pointing_min_confidence: POINTING_MIN_CONFIDENCE,
            refocus_chance: REFOCUS_CHANCE,
        }
    }
}

/// Engine construction parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Base seed; each subsystem derives its own RNG stream from it.
    pub seed: u64,
    pub photo_count: usize,
    pub heart_points: usize,
    pub ornament_rows: usize,
    pub ornament_cols: usize,
    /// Portrait / mobile viewport: camera sits further back.
    pub narrow_viewport: bool,
    pub aspect: f32,
    pub gesture: GestureParams,
    pub bursts: Vec<BurstEffect>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            photo_count: PHOTO_COUNT,
            heart_points: HEART_POINT_COUNT,
            ornament_rows: ORNAMENT_ROWS,
            ornament_cols: ORNAMENT_COLS,
            narrow_viewport: false,
            aspect: 16.0 / 9.0,
            gesture: GestureParams::default(),
            bursts: BurstKind::ALL.iter().map(|k| BurstEffect::preset(*k)).collect(),
        }
    }
}

impl EngineConfig {
    /// Derive an independent seed for one subsystem.
    #[inline]
    pub fn seed_for(&self, stream: u64) -> u64 {
        self.seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}
