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

//! Shader programs, textures and materials.
//!
//! A [`Shader`] generates its two WGSL stages and knows how to push a frame's
//! state into the uniforms of its linked program. The program itself lives in a
//! [`ShaderProgram`], which compiles and links once per rendering context and
//! keeps the resolved uniform and attribute locations next to the handles.
//! Shader families share their lighting code through a [`LightingBlock`] rather
//! than through a base type.

mod lighting;
mod material;
mod phong;
mod program;
mod texture;
mod textured_phong;

pub use self::lighting::{LightingBlock, Surface};
pub use self::material::{Material, MaterialError, MaterialOptions, MaterialValue};
pub use self::phong::PhongShader;
pub use self::program::{ProgramInstance, ProgramLocations, Shader, ShaderProgram};
pub use self::texture::Texture;
pub use self::textured_phong::TexturedPhong;
