//! The bead heart: a grid of small spheres laid out on a parametric heart
//! surface that orbit loosely in chaos and snap into place when formed.

use crate::constants::{
    ORNAMENT_CHAOS_RATE, ORNAMENT_CHAOS_WOBBLE, ORNAMENT_DEPTH, ORNAMENT_FORMED_RATE,
    ORNAMENT_SCALE, ORNAMENT_SHAKE_SPIN,
};
use crate::formation::{approach_vec3, RotationState};
use crate::state::{InteractionState, Mode};
use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

/// Point on the heart surface for `t` in [0, 2PI) around the outline and `p`
/// in [0, PI] from front to back.
pub fn heart_surface(t: f32, p: f32) -> Vec3 {
    let x = 16.0 * t.sin().powi(3) * p.sin();
    let y = (13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos())
        * p.sin();
    let z = ORNAMENT_DEPTH * p.cos();
    Vec3::new(x, y, z)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bead {
    pub assembled: Vec3,
    pub orbit_center: Vec3,
    pub orbit_radius: f32,
    pub phase: f32,
    /// rad/sec
    pub phase_speed: f32,
    pub position: Vec3,
    pub scale: f32,
}

impl Bead {
    fn chaos_target(&self) -> Vec3 {
        let (s, c) = self.phase.sin_cos();
        self.orbit_center + Vec3::new(s, c, s) * self.orbit_radius
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BeadInstance {
    pub pos: [f32; 3],
    pub scale: f32,
}

pub struct OrnamentRing {
    beads: Vec<Bead>,
    rotation: RotationState,
    time: f32,
}

impl OrnamentRing {
    pub fn new<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let mut beads = Vec::with_capacity(rows * cols);
        for u in 0..rows {
            for v in 0..cols {
                let t = u as f32 / rows as f32 * TAU;
                let p = v as f32 / cols as f32 * PI;
                beads.push(Bead {
                    assembled: heart_surface(t, p) * ORNAMENT_SCALE,
                    orbit_center: Vec3::new(
                        rng.gen_range(-50.0..50.0),
                        rng.gen_range(-50.0..50.0),
                        rng.gen_range(-50.0..50.0),
                    ),
                    orbit_radius: rng.gen_range(20.0..120.0),
                    phase: rng.gen_range(0.0..100.0),
                    phase_speed: rng.gen_range(0.6..0.9),
                    position: Vec3::ZERO,
                    scale: 1.0,
                });
            }
        }
        Self {
            beads,
            rotation: RotationState::default(),
            time: 0.0,
        }
    }

    pub fn advance(&mut self, dt_sec: f32, state: &InteractionState) {
        let dt_sec = dt_sec.max(0.0);
        self.time += dt_sec;
        self.rotation.advance(dt_sec, state.mode, state.is_shaking);

        let formed = state.mode == Mode::Formed;
        let rate = if formed {
            ORNAMENT_FORMED_RATE
        } else {
            ORNAMENT_CHAOS_RATE
        };
        let shake_spin = Quat::from_rotation_y(self.time * ORNAMENT_SHAKE_SPIN);

        for (i, bead) in self.beads.iter_mut().enumerate() {
            bead.phase += bead.phase_speed * dt_sec;
            let target = if formed {
                bead.assembled
            } else if state.is_shaking {
                shake_spin * bead.chaos_target()
            } else {
                bead.chaos_target()
            };
            bead.position = approach_vec3(bead.position, target, rate, dt_sec);
            bead.scale = if formed {
                1.0
            } else {
                1.0 + (self.time + i as f32).sin() * ORNAMENT_CHAOS_WOBBLE
            };
        }
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn beads(&self) -> &[Bead] {
        &self.beads
    }

    /// World-space records with the ring rotation applied.
    pub fn write_instances(&self, out: &mut Vec<BeadInstance>) {
        let spin = Quat::from_rotation_y(self.rotation.angle);
        out.extend(self.beads.iter().map(|b| BeadInstance {
            pos: (spin * b.position).to_array(),
            scale: b.scale,
        }));
    }
}
