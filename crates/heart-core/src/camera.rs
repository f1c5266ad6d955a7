//! Scene camera and the hand-following trail.
//!
//! The camera eases toward a point offset by the hand so the scene parallaxes
//! as the hand moves, and recenters when the hand is lost.

use crate::constants::{
    CAMERA_BASE_Z, CAMERA_BASE_Z_NARROW, CAMERA_FOVY_DEG, CAMERA_HAND_RANGE, CAMERA_RATE,
    HAND_SCENE_Z, TRAIL_RATE,
};
use crate::formation::approach_vec3;
use crate::particles::hand_to_scene;
use crate::state::InteractionState;
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

pub struct CameraRig {
    camera: Camera,
    base_z: f32,
}

impl CameraRig {
    pub fn new(aspect: f32, narrow_viewport: bool) -> Self {
        let base_z = if narrow_viewport {
            CAMERA_BASE_Z_NARROW
        } else {
            CAMERA_BASE_Z
        };
        Self {
            camera: Camera {
                eye: Vec3::new(0.0, 0.0, base_z),
                target: Vec3::ZERO,
                up: Vec3::Y,
                aspect,
                fovy_radians: CAMERA_FOVY_DEG.to_radians(),
                znear: 0.1,
                zfar: 200.0,
            },
            base_z,
        }
    }

    /// Where the eye wants to be for this state.
    pub fn target_eye(&self, state: &InteractionState) -> Vec3 {
        if state.is_hand_detected {
            let h = state.hand_position;
            Vec3::new(
                (h.x - 0.5) * CAMERA_HAND_RANGE,
                (h.y - 0.5) * CAMERA_HAND_RANGE,
                self.base_z,
            )
        } else {
            Vec3::new(0.0, 0.0, self.base_z)
        }
    }

    pub fn advance(&mut self, dt_sec: f32, state: &InteractionState) {
        let target = self.target_eye(state);
        self.camera.eye = approach_vec3(self.camera.eye, target, CAMERA_RATE, dt_sec);
        self.camera.target = Vec3::ZERO;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn eye(&self) -> Vec3 {
        self.camera.eye
    }

    pub fn base_z(&self) -> f32 {
        self.base_z
    }
}

/// A glowing point that follows the hand, or wanders on a Lissajous path when
/// there is no hand.
#[derive(Clone, Debug, Default)]
pub struct HandTrail {
    position: Vec3,
    time: f32,
}

impl HandTrail {
    pub fn target(&self, state: &InteractionState) -> Vec3 {
        if state.is_hand_detected {
            hand_to_scene(state.hand_position)
        } else {
            Vec3::new(
                self.time.sin() * 5.0,
                (self.time * 1.5).cos() * 3.0,
                HAND_SCENE_Z,
            )
        }
    }

    pub fn advance(&mut self, dt_sec: f32, state: &InteractionState) {
        self.time += dt_sec.max(0.0);
        let target = self.target(state);
        self.position = approach_vec3(self.position, target, TRAIL_RATE, dt_sec);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

