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

use super::lighting::LightingBlock;
use super::material::Material;
use super::program::{ProgramLocations, Shader, ShaderProgram};
use tessera_core::math::Mat4;
use tessera_core::renderer::{
    GraphicsContext, ProgramState, RenderError, RenderSettings, UniformValue,
};

/// Texture unit the surface image is bound to.
const TEXTURE_UNIT: u32 = 0;

/// Phong shading over an image sampled at the `texture_coord` attribute.
///
/// The sampled color is added to the material color before lighting. Texels whose
/// alpha is below `0.01` are discarded outright. While the material's texture is
/// still loading the program draws with whatever unit 0 holds.
#[derive(Debug)]
pub struct TexturedPhong {
    lighting: LightingBlock,
    program: ShaderProgram,
}

impl TexturedPhong {
    /// Creates the shader with room for `num_lights` lights.
    pub fn new(num_lights: usize) -> Self {
        Self {
            lighting: LightingBlock::new(num_lights),
            program: ShaderProgram::new("textured_phong"),
        }
    }

    /// Creates the shader sized by `settings`: its light slots and the number of
    /// contexts its program may be compiled on.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            lighting: LightingBlock::new(settings.num_lights),
            program: ShaderProgram::with_ceiling("textured_phong", settings.context_ceiling),
        }
    }

    /// The lighting block this shader compiles in.
    pub fn lighting(&self) -> &LightingBlock {
        &self.lighting
    }

    fn shared_wgsl(&self) -> String {
        self.lighting
            .shared_wgsl("\n    @location(2) f_tex_coord: vec2<f32>,")
            + r#"
@group(0) @binding(1) var texture_map: texture_2d<f32>;
@group(0) @binding(2) var texture_sampler: sampler;
@group(0) @binding(3) var<uniform> animation_time: f32;
"#
    }
}

impl Shader for TexturedPhong {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn vertex_source(&self) -> String {
        self.shared_wgsl()
            + r#"
@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texture_coord: vec2<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.n = object_space_normal_to_world(normal);
    out.vertex_worldspace = (u.model_transform * vec4<f32>(position, 1.0)).xyz;
    out.clip = u.projection_camera_model_transform * vec4<f32>(position, 1.0);
    out.f_tex_coord = texture_coord;
    return out;
}
"#
    }

    fn fragment_source(&self) -> String {
        self.shared_wgsl()
            + r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let tex_color = textureSample(texture_map, texture_sampler, in.f_tex_coord);
    if (tex_color.w < 0.01) {
        discard;
    }
    let base = (tex_color.xyz + u.shape_color.xyz) * u.ambient;
    let lit = base + phong_model_lights(normalize(in.n), in.vertex_worldspace);
    return vec4<f32>(lit, u.shape_color.w * tex_color.w);
}
"#
    }

    fn update_gpu(
        &self,
        ctx: &mut dyn GraphicsContext,
        locations: &ProgramLocations,
        state: &ProgramState,
        model_transform: &Mat4,
        material: &Material,
    ) -> Result<(), RenderError> {
        self.lighting.send_material(ctx, locations, material)?;
        self.lighting
            .send_gpu_state(ctx, locations, state, model_transform)?;
        locations.send(
            ctx,
            "animation_time",
            UniformValue::Float(state.animation_time / 1000.0),
        )?;

        if let Some(texture) = material.texture.as_deref().filter(|t| t.is_ready()) {
            locations.send(ctx, "texture_map", UniformValue::Int(TEXTURE_UNIT as i32))?;
            texture.activate(ctx, TEXTURE_UNIT)?;
        }
        Ok(())
    }
}
