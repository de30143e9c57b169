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

//! Defines data structures related to GPU textures and their sampling state.

use serde::{Deserialize, Serialize};

/// An opaque handle to a GPU texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// The filter used when a texture is magnified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MagFilter {
    /// Point sampling.
    Nearest,
    /// Linear interpolation between the four nearest texels.
    #[default]
    Linear,
}

/// The policy used when a texture is minified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MinFilter {
    /// Point sampling of the base level.
    Nearest,
    /// Linear interpolation on the base level.
    Linear,
    /// Trilinear filtering across a generated mipmap chain.
    #[default]
    LinearMipmapLinear,
}

impl MinFilter {
    /// Returns `true` if this policy samples a mipmap chain that must be generated.
    pub fn requires_mipmaps(self) -> bool {
        matches!(self, MinFilter::LinearMipmapLinear)
    }
}

/// Sampling state applied to a texture when it is first staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureSampling {
    /// Flip rows on upload so that `v = 0` is the bottom of the image.
    pub flip_y: bool,
    /// The magnification filter.
    pub mag_filter: MagFilter,
    /// The minification filter.
    pub min_filter: MinFilter,
}

impl TextureSampling {
    /// The sampling state used for image textures: flipped, linear magnification,
    /// and the given minification policy.
    pub fn for_images(min_filter: MinFilter) -> Self {
        Self {
            flip_y: true,
            mag_filter: MagFilter::Linear,
            min_filter,
        }
    }
}
