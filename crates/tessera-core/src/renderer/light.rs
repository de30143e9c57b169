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

//! Defines the light sources the shading lanes consume.

use crate::math::Vec4;

/// A point or directional light.
///
/// The homogeneous `w` of `position` selects the kind: `w = 1` places a point
/// light at `position.xyz`, `w = 0` makes `position.xyz` the direction towards a
/// light infinitely far away.
///
/// # Examples
///
/// ```
/// use tessera_core::math::Vec4;
/// use tessera_core::renderer::Light;
///
/// let lamp = Light::new(Vec4::new(10.0, 10.0, 10.0, 1.0), Vec4::ONE, 1000.0);
/// assert_eq!(lamp.attenuation, 0.001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Position (`w = 1`) or direction (`w = 0`).
    pub position: Vec4,
    /// RGBA color of the emitted light.
    pub color: Vec4,
    /// The falloff factor `k` in `1 / (1 + k * d^2)`.
    pub attenuation: f32,
}

impl Light {
    /// Creates a light whose attenuation factor is `1 / size`: larger lights reach further.
    pub fn new(position: Vec4, color: Vec4, size: f32) -> Self {
        Self {
            position,
            color,
            attenuation: 1.0 / size,
        }
    }

    /// Returns `true` for a directional light (`w = 0`).
    pub fn is_directional(&self) -> bool {
        self.position.w == 0.0
    }
}
