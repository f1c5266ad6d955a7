//! Render-tick driver: reads the interaction state once per tick and advances
//! every animated subsystem by the same `dt`.

use crate::audio::{AudioSampler, LevelMeter};
use crate::camera::{CameraRig, HandTrail};
use crate::config::EngineConfig;
use crate::constants::MAX_FRAME_DT_SEC;
use crate::formation::{HeartCloud, PointInstance};
use crate::ornaments::{BeadInstance, OrnamentRing};
use crate::particles::{BurstSystem, ParticleInstance};
use crate::photos::{PhotoGallery, PhotoInstance};
use crate::state::{InteractionReader, InteractionState, Mode};
use instant::Instant;
use rand::prelude::*;

/// Compact per-tick digest for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSummary {
    pub mode: Mode,
    pub progress: f32,
    pub audio_level: f32,
    pub active_particles: usize,
    pub focused_index: Option<usize>,
    pub hand_detected: bool,
    pub shaking: bool,
    pub ornament_angle: f32,
    pub photo_angle: f32,
}

pub struct AnimationFrame {
    reader: InteractionReader,
    audio: Box<dyn AudioSampler>,
    meter: LevelMeter,
    rng: StdRng,
    cloud: HeartCloud,
    ornaments: OrnamentRing,
    photos: PhotoGallery,
    bursts: BurstSystem,
    camera: CameraRig,
    trail: HandTrail,
    state: InteractionState,
    last_instant: Instant,

    points: Vec<PointInstance>,
    beads: Vec<BeadInstance>,
    photo_instances: Vec<PhotoInstance>,
    particles: Vec<ParticleInstance>,
}

impl AnimationFrame {
    pub fn new(
        reader: InteractionReader,
        audio: Box<dyn AudioSampler>,
        config: &EngineConfig,
    ) -> Self {
        let mut build_rng = StdRng::seed_from_u64(config.seed_for(2));
        let cloud = HeartCloud::generate(config.heart_points, &mut build_rng);
        let ornaments =
            OrnamentRing::new(config.ornament_rows, config.ornament_cols, &mut build_rng);
        let photos = PhotoGallery::new(config.photo_count, &mut build_rng);
        log::info!(
            "[frame] {} points, {} beads, {} photos, {} burst effects",
            cloud.elements().len(),
            ornaments.beads().len(),
            photos.len(),
            config.bursts.len()
        );
        let state = reader.snapshot();
        Self {
            reader,
            audio,
            meter: LevelMeter::default(),
            rng: StdRng::seed_from_u64(config.seed_for(3)),
            cloud,
            ornaments,
            photos,
            bursts: BurstSystem::new(&config.bursts),
            camera: CameraRig::new(config.aspect, config.narrow_viewport),
            trail: HandTrail::default(),
            state,
            last_instant: Instant::now(),
            points: Vec::new(),
            beads: Vec::new(),
            photo_instances: Vec::new(),
            particles: Vec::new(),
        }
    }

    /// Advance by wall-clock time since the previous call.
    pub fn frame(&mut self) -> FrameSummary {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        self.advance(dt.as_secs_f32())
    }

    /// Advance by an explicit `dt_sec`, clamped so a stall does not teleport
    /// everything.
    pub fn advance(&mut self, dt_sec: f32) -> FrameSummary {
        let dt_sec = if dt_sec.is_finite() {
            dt_sec.clamp(0.0, MAX_FRAME_DT_SEC)
        } else {
            0.0
        };
        self.state = self.reader.snapshot();
        let state = self.state;
        let level = self.meter.update(self.audio.level(), dt_sec);

        self.camera.advance(dt_sec, &state);
        self.trail.advance(dt_sec, &state);
        self.cloud.advance(dt_sec, &state, level);
        self.ornaments.advance(dt_sec, &state);
        self.photos.advance(dt_sec, &state, self.camera.eye());
        self.bursts.tick(dt_sec, &state, &mut self.rng);

        self.points.clear();
        self.cloud.write_instances(&mut self.points, level);
        self.beads.clear();
        self.ornaments.write_instances(&mut self.beads);
        self.photo_instances.clear();
        self.photos.write_instances(&mut self.photo_instances, &state);
        self.particles.clear();
        self.bursts.write_instances(&mut self.particles, &mut self.rng);

        self.summary()
    }

    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            mode: self.state.mode,
            progress: self.cloud.progress(),
            audio_level: self.meter.level(),
            active_particles: self.bursts.active_count(),
            focused_index: self.state.focused_index,
            hand_detected: self.state.is_hand_detected,
            shaking: self.state.is_shaking,
            ornament_angle: self.ornaments.rotation().angle,
            photo_angle: self.photos.rotation().angle,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn cloud(&self) -> &HeartCloud {
        &self.cloud
    }

    pub fn ornaments(&self) -> &OrnamentRing {
        &self.ornaments
    }

    pub fn photos(&self) -> &PhotoGallery {
        &self.photos
    }

    pub fn bursts(&self) -> &BurstSystem {
        &self.bursts
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn trail(&self) -> &HandTrail {
        &self.trail
    }

    pub fn points(&self) -> &[PointInstance] {
        &self.points
    }

    pub fn beads(&self) -> &[BeadInstance] {
        &self.beads
    }

    pub fn photo_instances(&self) -> &[PhotoInstance] {
        &self.photo_instances
    }

    pub fn particles(&self) -> &[ParticleInstance] {
        &self.particles
    }
}
