// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The per-renderer state threaded through every draw call of a frame.

use crate::math::Mat4;
use crate::renderer::light::Light;

/// Camera, projection, lights and the animation clock.
///
/// The camera is stored twice: as the camera's world transform and as its inverse
/// (the view matrix). The pair is private so that it can only change together.
///
/// Times are in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramState {
    camera_transform: Mat4,
    camera_inverse: Mat4,
    /// The projection applied after the view transform.
    pub projection_transform: Mat4,
    /// The active lights, in upload order.
    pub lights: Vec<Light>,
    /// When `false` the animation clock holds still while frames keep rendering.
    pub animate: bool,
    /// Accumulated animation time.
    pub animation_time: f32,
    /// Wall-clock time elapsed since the previous frame.
    pub animation_delta_time: f32,
}

impl ProgramState {
    /// Creates a state from a view matrix and a projection.
    pub fn new(view: Mat4, projection_transform: Mat4) -> Self {
        Self {
            camera_transform: view.inverse(),
            camera_inverse: view,
            projection_transform,
            lights: Vec::new(),
            animate: true,
            animation_time: 0.0,
            animation_delta_time: 0.0,
        }
    }

    /// Replaces the camera with the given view matrix, recomputing its world transform.
    pub fn set_camera(&mut self, view: Mat4) {
        self.camera_transform = view.inverse();
        self.camera_inverse = view;
    }

    /// The camera's world transform.
    pub fn camera_transform(&self) -> &Mat4 {
        &self.camera_transform
    }

    /// The view matrix (inverse of the camera's world transform).
    pub fn camera_inverse(&self) -> &Mat4 {
        &self.camera_inverse
    }

    /// Moves the camera by `motion`, expressed in the camera's own frame.
    ///
    /// The world transform is post-multiplied by `motion` and the view matrix is
    /// pre-multiplied by its inverse, so both stay consistent.
    pub fn transform_camera(&mut self, motion: &Mat4) {
        self.camera_transform.post_multiply(motion);
        self.camera_inverse.pre_multiply(&motion.inverse());
    }

    /// Advances the clock by `delta` milliseconds if animation is enabled.
    pub fn advance_clock(&mut self, delta: f32) {
        self.animation_delta_time = delta;
        if self.animate {
            self.animation_time += delta;
        }
    }
}

impl Default for ProgramState {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq_eps, Vec3, Vec4};

    fn mat4_approx_eq(a: &Mat4, b: &Mat4) -> bool {
        a.rows
            .iter()
            .flatten()
            .zip(b.rows.iter().flatten())
            .all(|(x, y)| approx_eq_eps(*x, *y, 1e-4))
    }

    #[test]
    fn set_camera_keeps_pair_consistent() {
        let mut state = ProgramState::default();
        let view = Mat4::translation(Vec3::new(0.0, 0.0, -8.0));
        state.set_camera(view);

        assert_eq!(state.camera_inverse(), &view);
        let eye = *state.camera_transform() * Vec4::ORIGIN;
        assert_eq!(eye, Vec4::new(0.0, 0.0, 8.0, 1.0));
        assert!(mat4_approx_eq(
            &(*state.camera_transform() * *state.camera_inverse()),
            &Mat4::IDENTITY
        ));
    }

    #[test]
    fn transform_camera_updates_both_matrices() {
        let mut state = ProgramState::new(
            Mat4::look_at(Vec3::new(0.0, 10.0, 20.0), Vec3::ZERO, Vec3::Y).unwrap(),
            Mat4::IDENTITY,
        );
        state.transform_camera(&Mat4::rotation(0.3, Vec3::Y));
        state.transform_camera(&Mat4::translation(Vec3::new(0.0, 0.0, -2.0)));

        assert!(mat4_approx_eq(
            &(*state.camera_transform() * *state.camera_inverse()),
            &Mat4::IDENTITY
        ));
    }

    #[test]
    fn clock_respects_animate_flag() {
        let mut state = ProgramState::default();
        assert!(state.animate);
        state.advance_clock(16.0);
        state.advance_clock(16.0);
        assert_eq!(state.animation_time, 32.0);

        state.animate = false;
        state.advance_clock(10.0);
        assert_eq!(state.animation_time, 32.0);
        assert_eq!(state.animation_delta_time, 10.0);
    }
}
