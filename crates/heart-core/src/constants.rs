use glam::Vec3;

// Shared gesture/animation tuning constants used by the engine and front-ends.

// Hand landmarks
pub const LANDMARK_COUNT: usize = 21; // points per tracked hand
pub const WRIST_LANDMARK: usize = 0; // drives the motion histories
pub const PALM_CENTER_LANDMARK: usize = 9; // drives the reported hand position

// Gesture interpretation
pub const PHOTO_COUNT: usize = 20; // focusable items (N)
pub const NAV_HISTORY_LEN: usize = 15; // swipe window (K)
pub const SHAKE_HISTORY_LEN: usize = 20; // shake window (K)
pub const MIN_MOTION_SAMPLES: usize = 10; // below this, motion classifiers stay silent
pub const SHAKE_MIN_DIRECTION_CHANGES: usize = 3; // shaking when strictly more extrema than this
pub const SWIPE_THRESHOLD: f32 = 0.2; // net normalized x displacement
pub const SWIPE_COOLDOWN_MS: u64 = 1000; // debounce between navigation steps
pub const POINTING_MIN_CONFIDENCE: f32 = 0.5; // Victory / Pointing_Up must beat this
pub const REFOCUS_CHANCE: f64 = 0.1; // chance to pick a new photo while one is focused

// Gesture loop
pub const CLASSIFY_INTERVAL_MS: u64 = 33; // ~30 Hz classification
pub const SESSION_IDLE_SLEEP_MS: u64 = 4; // loop sleep between throttle checks

// Exponential smoothing rates (1/sec); alpha = 1 - exp(-rate * dt)
pub const PROGRESS_RATE: f32 = 1.21; // chaos <-> heart blend
pub const ORNAMENT_CHAOS_RATE: f32 = 1.21;
pub const ORNAMENT_FORMED_RATE: f32 = 3.08;
pub const PHOTO_SCATTER_RATE: f32 = 0.60;
pub const PHOTO_FORMED_RATE: f32 = 1.21;
pub const PHOTO_FOCUS_RATE: f32 = 6.32; // inspection pose and scale
pub const ROTATION_DECAY_RATE: f32 = 3.08; // spin unwinds in CHAOS
pub const CAMERA_RATE: f32 = 3.08;
pub const TRAIL_RATE: f32 = 6.32;
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // clamp after stalls

// Group spin (rad/sec)
pub const SPIN_BASE_RATE: f32 = 0.5;
pub const SPIN_SHAKE_RATE: f32 = 5.0;

// Heart cloud
pub const HEART_POINT_COUNT: usize = 4000;
pub const CHAOS_HALF_EXTENT: f32 = 15.0; // chaos cube half size
pub const HEART_SAMPLE_HALF_EXTENT: f32 = 2.0; // rejection sampling box
pub const HEART_IMPLICIT_SCALE: f32 = 1.5;
pub const HEART_SCALE: f32 = 3.5; // sampled heart -> world
pub const HEART_SAMPLE_MAX_TRIES: usize = 10_000;
pub const CHAOS_DRIFT: f32 = 0.5; // amplitude of chaotic wandering
pub const BEAT_AMPLITUDE: f32 = 0.05; // idle breathing of the heart
pub const BEAT_FREQ: f32 = 2.0; // rad/sec

// Audio reactivity
pub const AUDIO_PULSE_THRESHOLD: f32 = 0.8; // progress needed before audio pulses
pub const AUDIO_EXPAND: f32 = 0.25; // heart scale gain at full loudness
pub const AUDIO_SIZE_BOOST: f32 = 1.5; // point size gain at full loudness
pub const ANALYSER_BINS: usize = 16; // low bins averaged for loudness
pub const ANALYSER_DB_FLOOR: f32 = -100.0;
pub const LEVEL_RISE_TAU_SEC: f32 = 0.10;
pub const LEVEL_FALL_TAU_SEC: f32 = 0.45;

// Ornament ring
pub const ORNAMENT_ROWS: usize = 40;
pub const ORNAMENT_COLS: usize = 40;
pub const ORNAMENT_SCALE: f32 = 0.25;
pub const ORNAMENT_DEPTH: f32 = 6.0; // thickness of the bead heart
pub const ORNAMENT_SHAKE_SPIN: f32 = 12.0; // rad/sec spin of chaos targets while shaking
pub const ORNAMENT_CHAOS_WOBBLE: f32 = 0.3;

// Photos
pub const PHOTO_RING_RADIUS: f32 = 8.0;
pub const PHOTO_RING_HEIGHT: f32 = 5.0;
pub const PHOTO_SCATTER_HALF_EXTENT: f32 = 10.0;
pub const PHOTO_BOB_SPEED: f32 = 0.6; // units/sec of vertical float
pub const INSPECT_OFFSET: Vec3 = Vec3::new(0.0, -1.0, -5.0); // from the camera eye
pub const INSPECT_SCALE: f32 = 2.0;

// Camera
pub const CAMERA_BASE_Z: f32 = 18.0;
pub const CAMERA_BASE_Z_NARROW: f32 = 28.0; // mobile / portrait viewports
pub const CAMERA_HAND_RANGE: f32 = 5.0;
pub const CAMERA_FOVY_DEG: f32 = 45.0;

// Hand -> scene mapping for bursts and trail
pub const HAND_SCENE_RANGE_X: f32 = 15.0;
pub const HAND_SCENE_RANGE_Y: f32 = 10.0;
pub const HAND_SCENE_Z: f32 = 5.0;

// Burst particles
pub const BURST_SPAWN_CHANCE: f32 = 0.2; // per render tick while driven
pub const BURST_UPWARD_DRIFT: f32 = 0.01; // velocity.y gain per tick
