//! Photo gallery: scattered frames that gather into a ring when formed, with
//! one frame optionally pulled up in front of the camera for inspection.
//!
//! Poses are kept in the ring's local space; the ring's group rotation is
//! applied when building model matrices. The inspection pose is defined in
//! world space and mapped back through the current rotation, so a photo that
//! loses focus eases back from exactly where it was shown.

use crate::constants::{
    INSPECT_OFFSET, INSPECT_SCALE, PHOTO_BOB_SPEED, PHOTO_FOCUS_RATE, PHOTO_FORMED_RATE,
    PHOTO_RING_HEIGHT, PHOTO_RING_RADIUS, PHOTO_SCATTER_HALF_EXTENT, PHOTO_SCATTER_RATE,
};
use crate::formation::{approach, approach_vec3, smoothing_alpha, RotationState};
use crate::state::{InteractionState, Mode};
use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

/// Rotation that points local +Z along `dir`.
pub fn facing(dir: Vec3) -> Quat {
    let z = dir.normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut x = Vec3::Y.cross(z);
    if x.length_squared() < 1e-8 {
        x = Vec3::X;
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Slot `i` of `count` on the formed ring.
pub fn ring_position(i: usize, count: usize) -> Vec3 {
    let angle = i as f32 / count.max(1) as f32 * TAU;
    Vec3::new(
        angle.cos() * PHOTO_RING_RADIUS,
        (i as f32).sin() * PHOTO_RING_HEIGHT,
        angle.sin() * PHOTO_RING_RADIUS,
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Photo {
    pub scatter_position: Vec3,
    pub scatter_orientation: Quat,
    pub float_speed: f32,
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PhotoInstance {
    pub model: [[f32; 4]; 4],
    /// 1 for the inspected photo.
    pub highlight: f32,
    pub _pad: [f32; 3],
}

pub struct PhotoGallery {
    photos: Vec<Photo>,
    rotation: RotationState,
    time: f32,
}

impl PhotoGallery {
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let e = PHOTO_SCATTER_HALF_EXTENT;
        let photos = (0..count)
            .map(|_| Photo {
                scatter_position: Vec3::new(
                    rng.gen_range(-e..e),
                    rng.gen_range(-e..e),
                    rng.gen_range(-e..e),
                ),
                scatter_orientation: Quat::from_euler(
                    EulerRot::XYZ,
                    rng.gen_range(0.0..PI),
                    rng.gen_range(0.0..PI),
                    0.0,
                ),
                float_speed: rng.gen_range(0.2..0.7),
                position: Vec3::ZERO,
                orientation: Quat::IDENTITY,
                scale: 1.0,
            })
            .collect();
        Self {
            photos,
            rotation: RotationState::default(),
            time: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    /// Focused index if it names an existing photo.
    fn focused(&self, state: &InteractionState) -> Option<usize> {
        state.focused_index.filter(|&i| i < self.photos.len())
    }

    pub fn advance(&mut self, dt_sec: f32, state: &InteractionState, camera_eye: Vec3) {
        let dt_sec = dt_sec.max(0.0);
        self.time += dt_sec;
        let focused = self.focused(state);

        // Hold the ring still while a photo is inspected in the formed layout.
        let inspecting = focused.is_some() && state.mode == Mode::Formed && !state.is_shaking;
        if !inspecting {
            self.rotation.advance(dt_sec, state.mode, state.is_shaking);
        }

        let to_local = Quat::from_rotation_y(self.rotation.angle).inverse();
        let inspect_pos = to_local * (camera_eye + INSPECT_OFFSET);
        // From the inspection spot back toward the eye.
        let look = to_local * facing(-INSPECT_OFFSET);
        let count = self.photos.len();
        let t = self.time;

        for (i, photo) in self.photos.iter_mut().enumerate() {
            if focused == Some(i) {
                photo.position =
                    approach_vec3(photo.position, inspect_pos, PHOTO_FOCUS_RATE, dt_sec);
                photo.orientation = photo
                    .orientation
                    .slerp(look, smoothing_alpha(PHOTO_FOCUS_RATE, dt_sec));
                photo.scale = approach(photo.scale, INSPECT_SCALE, PHOTO_FOCUS_RATE, dt_sec);
                continue;
            }
            photo.scale = approach(photo.scale, 1.0, PHOTO_FOCUS_RATE, dt_sec);
            photo.position.y += (t * photo.float_speed + i as f32).sin() * PHOTO_BOB_SPEED * dt_sec;

            match state.mode {
                Mode::Formed => {
                    let target = ring_position(i, count);
                    photo.position =
                        approach_vec3(photo.position, target, PHOTO_FORMED_RATE, dt_sec);
                    // Face away from the ring center.
                    photo.orientation = photo
                        .orientation
                        .slerp(facing(target), smoothing_alpha(PHOTO_FORMED_RATE, dt_sec));
                }
                Mode::Chaos => {
                    photo.position = approach_vec3(
                        photo.position,
                        photo.scatter_position,
                        PHOTO_SCATTER_RATE,
                        dt_sec,
                    );
                    photo.orientation = photo.orientation.slerp(
                        photo.scatter_orientation,
                        smoothing_alpha(PHOTO_FORMED_RATE, dt_sec),
                    );
                }
            }
        }
    }

    /// World-space transform of photo `i`.
    pub fn model_matrix(&self, i: usize) -> Option<Mat4> {
        let photo = self.photos.get(i)?;
        let group = Mat4::from_rotation_y(self.rotation.angle);
        Some(
            group
                * Mat4::from_scale_rotation_translation(
                    Vec3::splat(photo.scale),
                    photo.orientation,
                    photo.position,
                ),
        )
    }

    /// World-space position of photo `i`.
    pub fn world_position(&self, i: usize) -> Option<Vec3> {
        let photo = self.photos.get(i)?;
        Some(Quat::from_rotation_y(self.rotation.angle) * photo.position)
    }

    pub fn write_instances(&self, out: &mut Vec<PhotoInstance>, state: &InteractionState) {
        let focused = self.focused(state);
        for i in 0..self.photos.len() {
            if let Some(model) = self.model_matrix(i) {
                out.push(PhotoInstance {
                    model: model.to_cols_array_2d(),
                    highlight: if focused == Some(i) { 1.0 } else { 0.0 },
                    _pad: [0.0; 3],
                });
            }
        }
    }
}
