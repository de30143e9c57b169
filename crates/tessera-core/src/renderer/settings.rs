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

//! Global settings for the rendering system.

use crate::math::Vec4;
use crate::renderer::instances::DEFAULT_CONTEXT_CEILING;
use serde::{Deserialize, Serialize};

/// A collection of settings that affect every frame of a canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// The color the color buffer is cleared to before each frame.
    pub background_color: Vec4,
    /// Drawable width in pixels.
    pub width: u32,
    /// Drawable height in pixels.
    pub height: u32,
    /// How many distinct contexts a single resource may be uploaded to. Resources
    /// pick it up through their `from_settings` or `with_context_ceiling` constructors.
    pub context_ceiling: usize,
    /// Number of light slots compiled into the lighting shaders.
    pub num_lights: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            background_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            width: 1080,
            height: 600,
            context_ceiling: DEFAULT_CONTEXT_CEILING,
            num_lights: 2,
        }
    }
}

impl RenderSettings {
    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
