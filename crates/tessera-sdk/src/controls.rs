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

//! First-person fly-around controls for the camera.

use crate::canvas::Canvas;
use crate::control_panel::ControlPanel;
use crate::scene::SceneNode;
use tessera_core::math::{Mat4, Vec3, Vec4};
use tessera_core::renderer::{ProgramState, RenderError};

/// Button label, key, thrust axis and direction for each movement key.
const BINDINGS: [(&str, &str, usize, f32); 6] = [
    ("Up", " ", 1, -1.0),
    ("Forward", "w", 2, 1.0),
    ("Left", "a", 0, 1.0),
    ("Back", "s", 2, -1.0),
    ("Right", "d", 0, -1.0),
    ("Down", "z", 1, 1.0),
];

/// A scene node that moves the camera while movement keys are held.
///
/// Each frame the camera is rolled by `-0.1 * roll` radians and translated by
/// `-thrust` times the meters covered in that frame, both in the camera's own
/// frame. Speeds are per second of animation time.
#[derive(Debug, Clone)]
pub struct MovementControls {
    /// Held movement directions, each axis in `-1..=1`.
    pub thrust: Vec3,
    /// Roll rate around the viewing axis.
    pub roll: f32,
    /// Scales both speeds.
    pub speed_multiplier: f32,
    /// Turn speed.
    pub radians_per_frame: f32,
    /// Travel speed.
    pub meters_per_frame: f32,
    pos: Vec4,
    z_axis: Vec4,
}

impl Default for MovementControls {
    fn default() -> Self {
        Self {
            thrust: Vec3::ZERO,
            roll: 0.0,
            speed_multiplier: 1.0,
            radians_per_frame: 1.0 / 200.0,
            meters_per_frame: 20.0,
            pos: Vec4::ZERO,
            z_axis: Vec4::ZERO,
        }
    }
}

impl MovementControls {
    /// Creates controls at rest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts moving along the direction bound to `key`. Returns `false` for unbound keys.
    pub fn press(&mut self, key: &str) -> bool {
        self.set_thrust(key, true)
    }

    /// Stops moving along the axis bound to `key`. Returns `false` for unbound keys.
    pub fn release(&mut self, key: &str) -> bool {
        self.set_thrust(key, false)
    }

    fn set_thrust(&mut self, key: &str, pressed: bool) -> bool {
        let Some(&(_, _, axis, direction)) = BINDINGS.iter().find(|(_, k, _, _)| *k == key) else {
            return false;
        };
        let value = if pressed { direction } else { 0.0 };
        match axis {
            0 => self.thrust.x = value,
            1 => self.thrust.y = value,
            _ => self.thrust.z = value,
        }
        true
    }

    /// The origin mapped through the view matrix after the last frame.
    pub fn pos(&self) -> Vec4 {
        self.pos
    }

    /// The `+z` direction mapped through the view matrix after the last frame.
    pub fn z_axis(&self) -> Vec4 {
        self.z_axis
    }

    /// The camera-space motion for a frame that lasted `dt` seconds.
    fn frame_motion(&self, dt: f32) -> Option<Mat4> {
        if self.thrust == Vec3::ZERO && self.roll == 0.0 {
            return None;
        }
        let meters = self.speed_multiplier * self.meters_per_frame * dt;
        Some(
            Mat4::rotation(-0.1 * self.roll, Vec3::Z)
                * Mat4::translation(self.thrust * -meters),
        )
    }
}

impl SceneNode for MovementControls {
    fn name(&self) -> &str {
        "Movement Controls"
    }

    fn display(&mut self, _canvas: &mut Canvas, state: &mut ProgramState) -> Result<(), RenderError> {
        let dt = state.animation_delta_time / 1000.0;
        if let Some(motion) = self.frame_motion(dt) {
            state.transform_camera(&motion);
        }
        let view = *state.camera_inverse();
        self.pos = view * Vec4::ORIGIN;
        self.z_axis = view * Vec4::new(0.0, 0.0, 1.0, 0.0);
        Ok(())
    }

    fn make_control_panel(&mut self, panel: &mut dyn ControlPanel) {
        panel.live_string(&format!(
            "Position: {:.2}, {:.2}, {:.2}",
            self.pos.x, self.pos.y, self.pos.z
        ));
        for (i, (description, key, _, _)) in BINDINGS.iter().enumerate() {
            panel.key_triggered_button(description, &[*key]);
            if i == 1 || i == 4 {
                panel.new_line();
            }
        }
    }

    fn handle_key(&mut self, key: &str, pressed: bool) -> bool {
        if pressed {
            self.press(key)
        } else {
            self.release(key)
        }
    }
}
