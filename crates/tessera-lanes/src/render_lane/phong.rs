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
use tessera_core::renderer::{GraphicsContext, ProgramState, RenderError, RenderSettings};

/// Per-fragment Phong shading of an untextured surface.
///
/// Reads the `position` and `normal` attributes.
#[derive(Debug)]
pub struct PhongShader {
    lighting: LightingBlock,
    program: ShaderProgram,
}

impl PhongShader {
    /// Creates the shader with room for `num_lights` lights.
    pub fn new(num_lights: usize) -> Self {
        Self {
            lighting: LightingBlock::new(num_lights),
            program: ShaderProgram::new("phong"),
        }
    }

    /// Creates the shader sized by `settings`: its light slots and the number of
    /// contexts its program may be compiled on.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            lighting: LightingBlock::new(settings.num_lights),
            program: ShaderProgram::with_ceiling("phong", settings.context_ceiling),
        }
    }

    /// The lighting block this shader compiles in.
    pub fn lighting(&self) -> &LightingBlock {
        &self.lighting
    }
}

impl Shader for PhongShader {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn vertex_source(&self) -> String {
        self.lighting.shared_wgsl("")
            + r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.n = object_space_normal_to_world(normal);
    out.vertex_worldspace = (u.model_transform * vec4<f32>(position, 1.0)).xyz;
    out.clip = u.projection_camera_model_transform * vec4<f32>(position, 1.0);
    return out;
}
"#
    }

    fn fragment_source(&self) -> String {
        self.lighting.shared_wgsl("")
            + r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let ambient_color = u.shape_color.xyz * u.ambient;
    let lit = ambient_color + phong_model_lights(normalize(in.n), in.vertex_worldspace);
    return vec4<f32>(lit, u.shape_color.w);
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
            .send_gpu_state(ctx, locations, state, model_transform)
    }
}
