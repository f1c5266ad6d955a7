//! Chaos <-> heart interpolation for the primary point cloud, plus the
//! smoothing helpers every animated subsystem shares.

use crate::constants::*;
use crate::state::{InteractionState, Mode};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

/// Fraction of the remaining distance covered in `dt_sec` when easing at
/// `rate` per second. Independent of frame rate: two half steps equal one
/// full step.
#[inline]
pub fn smoothing_alpha(rate: f32, dt_sec: f32) -> f32 {
    1.0 - (-rate * dt_sec.max(0.0)).exp()
}

#[inline]
pub fn approach(current: f32, target: f32, rate: f32, dt_sec: f32) -> f32 {
    current + (target - current) * smoothing_alpha(rate, dt_sec)
}

#[inline]
pub fn approach_vec3(current: Vec3, target: Vec3, rate: f32, dt_sec: f32) -> Vec3 {
    current.lerp(target, smoothing_alpha(rate, dt_sec))
}

/// Wrap into (-PI, PI].
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Group spin shared by the ornament ring and the photo ring.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationState {
    pub angle: f32,
}

impl RotationState {
    /// Spin fast while shaking, slowly while assembled, and unwind to zero
    /// otherwise.
    pub fn advance(&mut self, dt_sec: f32, mode: Mode, shaking: bool) {
        let dt_sec = dt_sec.max(0.0);
        if shaking {
            self.angle = wrap_angle(self.angle + SPIN_SHAKE_RATE * dt_sec);
        } else if mode == Mode::Formed {
            self.angle = wrap_angle(self.angle + SPIN_BASE_RATE * dt_sec);
        } else {
            self.angle = approach(wrap_angle(self.angle), 0.0, ROTATION_DECAY_RATE, dt_sec);
        }
    }
}

/// One point of the heart cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationElement {
    pub chaos_target: Vec3,
    pub assembled_target: Vec3,
    pub position: Vec3,
    /// 0 = chaotic, 1 = assembled.
    pub progress: f32,
    pub speed: f32,
    pub size: f32,
    pub glow: f32,
}

/// Renderer record for a heart-cloud point.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub pos: [f32; 3],
    pub size: f32,
    pub glow: f32,
    pub _pad: [f32; 3],
}

/// Implicit heart surface, negative inside. Input is in sampling space.
pub fn heart_implicit(p: Vec3) -> f32 {
    let q = p / HEART_IMPLICIT_SCALE;
    let a = q.x * q.x + 2.25 * q.y * q.y + q.z * q.z - 1.0;
    let z3 = q.z * q.z * q.z;
    a * a * a - q.x * q.x * z3 - (9.0 / 80.0) * q.y * q.y * z3
}

/// Rejection-sample a point inside the heart volume, scaled to world units.
pub fn sample_heart_point<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    for _ in 0..HEART_SAMPLE_MAX_TRIES {
        let p = Vec3::new(
            rng.gen_range(-HEART_SAMPLE_HALF_EXTENT..HEART_SAMPLE_HALF_EXTENT),
            rng.gen_range(-HEART_SAMPLE_HALF_EXTENT..HEART_SAMPLE_HALF_EXTENT),
            rng.gen_range(-HEART_SAMPLE_HALF_EXTENT..HEART_SAMPLE_HALF_EXTENT),
        );
        if heart_implicit(p) < 0.0 {
            return p * HEART_SCALE;
        }
    }
    // The origin is inside the heart.
    Vec3::ZERO
}

pub struct HeartCloud {
    elements: Vec<FormationElement>,
    time: f32,
}

impl HeartCloud {
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let elements = (0..count)
            .map(|_| {
                let chaos_target = Vec3::new(
                    rng.gen_range(-CHAOS_HALF_EXTENT..CHAOS_HALF_EXTENT),
                    rng.gen_range(-CHAOS_HALF_EXTENT..CHAOS_HALF_EXTENT),
                    rng.gen_range(-CHAOS_HALF_EXTENT..CHAOS_HALF_EXTENT),
                );
                FormationElement {
                    chaos_target,
                    assembled_target: sample_heart_point(rng),
                    position: chaos_target,
                    progress: 0.0,
                    speed: rng.gen::<f32>(),
                    size: rng.gen::<f32>(),
                    glow: 0.0,
                }
            })
            .collect();
        Self {
            elements,
            time: 0.0,
        }
    }

    /// Advance by `dt_sec` toward the mode in `state`. `audio_level` is the
    /// [0, 1] loudness; it only affects points that are nearly assembled.
    pub fn advance(&mut self, dt_sec: f32, state: &InteractionState, audio_level: f32) {
        let dt_sec = dt_sec.max(0.0);
        self.time += dt_sec;
        let t = self.time;
        let target = if state.mode == Mode::Formed { 1.0 } else { 0.0 };
        let audio = audio_level.clamp(0.0, 1.0);
        let beat = 1.0 + BEAT_AMPLITUDE * (BEAT_FREQ * t).sin();

        for e in &mut self.elements {
            e.progress = approach(e.progress, target, PROGRESS_RATE, dt_sec).clamp(0.0, 1.0);

            let phase = t * e.speed;
            let drift = Vec3::new(
                (phase + e.chaos_target.x).sin(),
                (phase + e.chaos_target.y).cos(),
                (phase + e.chaos_target.z).sin(),
            );
            let chaos_pos = e.chaos_target + drift * CHAOS_DRIFT;

            let pulsing = e.progress > AUDIO_PULSE_THRESHOLD;
            let expand = if pulsing { AUDIO_EXPAND * audio } else { 0.0 };
            let heart_pos = e.assembled_target * (beat + expand);

            e.position = chaos_pos.lerp(heart_pos, e.progress);
            let height = (0.5 + e.position.y / (2.0 * CHAOS_HALF_EXTENT)).clamp(0.0, 1.0);
            e.glow = height + 0.1 * e.progress;
        }
    }

    pub fn elements(&self) -> &[FormationElement] {
        &self.elements
    }

    /// Mean progress over all points; 0 for an empty cloud.
    pub fn progress(&self) -> f32 {
        if self.elements.is_empty() {
            return 0.0;
        }
        self.elements.iter().map(|e| e.progress).sum::<f32>() / self.elements.len() as f32
    }

    pub fn write_instances(&self, out: &mut Vec<PointInstance>, audio_level: f32) {
        let audio = audio_level.clamp(0.0, 1.0);
        out.extend(self.elements.iter().map(|e| {
            let boost = if e.progress > AUDIO_PULSE_THRESHOLD {
                1.0 + AUDIO_SIZE_BOOST * audio
            } else {
                1.0
            };
            PointInstance {
                pos: e.position.to_array(),
                size: e.size * boost,
                glow: e.glow,
                _pad: [0.0; 3],
            }
        }));
    }
}
