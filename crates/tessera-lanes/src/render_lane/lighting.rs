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

//! The Phong lighting code shared by every lit shader family.

use super::material::Material;
use super::program::ProgramLocations;
use tessera_core::math::{Mat4, Vec3, Vec4};
use tessera_core::renderer::{GraphicsContext, Light, ProgramState, RenderError, UniformValue};

/// Material coefficients as the lighting model sees them, defaults filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// Base color of the surface.
    pub color: Vec4,
    /// Fraction of the base color emitted regardless of lights.
    pub ambient: f32,
    /// Weight of the diffuse term.
    pub diffusivity: f32,
    /// Weight of the specular term.
    pub specularity: f32,
    /// Specular exponent.
    pub smoothness: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            ambient: 0.0,
            diffusivity: 1.0,
            specularity: 1.0,
            smoothness: 40.0,
        }
    }
}

impl Surface {
    /// Resolves a material's optional fields against the defaults.
    pub fn from_material(material: &Material) -> Self {
        let defaults = Self::default();
        Self {
            color: material.color.unwrap_or(defaults.color),
            ambient: material.ambient.unwrap_or(defaults.ambient),
            diffusivity: material.diffusivity.unwrap_or(defaults.diffusivity),
            specularity: material.specularity.unwrap_or(defaults.specularity),
            smoothness: material.smoothness.unwrap_or(defaults.smoothness),
        }
    }
}

/// Shared uniform block, vertex interface and light accumulation for `num_lights` lights.
///
/// Shader families embed [`LightingBlock::shared_wgsl`] at the top of both stages and
/// call [`send_material`](LightingBlock::send_material) and
/// [`send_gpu_state`](LightingBlock::send_gpu_state) from their `update_gpu`.
///
/// The contribution of each light is
/// `attenuation * (color * light_color * diffusivity * max(N.L, 0) + light_color * specularity * max(N.H, 0)^smoothness)`
/// with `attenuation = 1 / (1 + k d^2)`, added to `ambient * color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightingBlock {
    num_lights: usize,
}

impl LightingBlock {
    /// Creates the block for a fixed number of lights.
    pub fn new(num_lights: usize) -> Self {
        Self { num_lights }
    }

    /// The number of lights compiled into the shaders.
    pub fn num_lights(&self) -> usize {
        self.num_lights
    }

    /// The WGSL shared by both stages. `varyings` are extra vertex output fields
    /// appended after the ones the lighting needs.
    pub fn shared_wgsl(&self, varyings: &str) -> String {
        // Zero-length arrays are not valid WGSL.
        let slots = self.num_lights.max(1);
        let n = self.num_lights;
        format!(
            r#"
struct Uniforms {{
    model_transform: mat4x4<f32>,
    projection_camera_model_transform: mat4x4<f32>,
    shape_color: vec4<f32>,
    camera_center: vec3<f32>,
    squared_scale: vec3<f32>,
    ambient: f32,
    diffusivity: f32,
    specularity: f32,
    smoothness: f32,
    light_positions_or_vectors: array<vec4<f32>, {slots}>,
    light_colors: array<vec4<f32>, {slots}>,
    light_attenuation_factors: array<vec4<f32>, {slots}>,
}}
@group(0) @binding(0) var<uniform> u: Uniforms;

struct VertexOutput {{
    @builtin(position) clip: vec4<f32>,
    @location(0) n: vec3<f32>,
    @location(1) vertex_worldspace: vec3<f32>,{varyings}
}}

fn phong_model_lights(N: vec3<f32>, vertex_worldspace: vec3<f32>) -> vec3<f32> {{
    let E = normalize(u.camera_center - vertex_worldspace);
    var result = vec3<f32>(0.0, 0.0, 0.0);
    for (var i = 0u; i < {n}u; i = i + 1u) {{
        let light = u.light_positions_or_vectors[i];
        let surface_to_light_vector = light.xyz - light.w * vertex_worldspace;
        let distance_to_light = length(surface_to_light_vector);

        let L = normalize(surface_to_light_vector);
        let H = normalize(L + E);
        let diffuse = max(dot(N, L), 0.0);
        let specular = pow(max(dot(N, H), 0.0), u.smoothness);
        let attenuation = 1.0 / (1.0 + u.light_attenuation_factors[i].x * distance_to_light * distance_to_light);

        let light_color = u.light_colors[i].xyz;
        let light_contribution = u.shape_color.xyz * light_color * u.diffusivity * diffuse
            + light_color * u.specularity * specular;
        result = result + attenuation * light_contribution;
    }}
    return result;
}}

fn object_space_normal_to_world(normal: vec3<f32>) -> vec3<f32> {{
    let m = u.model_transform;
    let linear = mat3x3<f32>(m[0].xyz, m[1].xyz, m[2].xyz);
    return normalize(linear * normal / u.squared_scale);
}}
"#
        )
    }

    /// Pushes the material's surface coefficients.
    pub fn send_material(
        &self,
        ctx: &mut dyn GraphicsContext,
        locations: &ProgramLocations,
        material: &Material,
    ) -> Result<(), RenderError> {
        let surface = Surface::from_material(material);
        locations.send(ctx, "shape_color", UniformValue::Vec4(surface.color.to_array()))?;
        locations.send(ctx, "ambient", UniformValue::Float(surface.ambient))?;
        locations.send(ctx, "diffusivity", UniformValue::Float(surface.diffusivity))?;
        locations.send(ctx, "specularity", UniformValue::Float(surface.specularity))?;
        locations.send(ctx, "smoothness", UniformValue::Float(surface.smoothness))?;
        Ok(())
    }

    /// Pushes the camera, the transforms of this draw and the lights.
    ///
    /// The light arrays are left untouched when the frame has no lights. Lights
    /// beyond [`num_lights`](Self::num_lights) are dropped.
    pub fn send_gpu_state(
        &self,
        ctx: &mut dyn GraphicsContext,
        locations: &ProgramLocations,
        state: &ProgramState,
        model_transform: &Mat4,
    ) -> Result<(), RenderError> {
        let camera_center = (*state.camera_transform() * Vec4::ORIGIN).truncate();
        locations.send(ctx, "camera_center", UniformValue::Vec3(camera_center.to_array()))?;
        locations.send(
            ctx,
            "squared_scale",
            UniformValue::Vec3(squared_scale(model_transform).to_array()),
        )?;

        let pcm = state.projection_transform * *state.camera_inverse() * *model_transform;
        locations.send(ctx, "model_transform", UniformValue::Mat4(model_transform.to_cols_array()))?;
        locations.send(
            ctx,
            "projection_camera_model_transform",
            UniformValue::Mat4(pcm.to_cols_array()),
        )?;

        if state.lights.is_empty() {
            return Ok(());
        }
        if state.lights.len() > self.num_lights {
            log::trace!(
                "LightingBlock: {} lights in the frame, only {} are uploaded",
                state.lights.len(),
                self.num_lights
            );
        }
        let lights = &state.lights[..state.lights.len().min(self.num_lights)];
        if lights.is_empty() {
            return Ok(());
        }
        locations.send(
            ctx,
            "light_positions_or_vectors",
            UniformValue::Vec4Array(lights.iter().map(|l| l.position.to_array()).collect()),
        )?;
        locations.send(
            ctx,
            "light_colors",
            UniformValue::Vec4Array(lights.iter().map(|l| l.color.to_array()).collect()),
        )?;
        locations.send(
            ctx,
            "light_attenuation_factors",
            UniformValue::Vec4Array(
                lights
                    .iter()
                    .map(|l| [l.attenuation, 0.0, 0.0, 0.0])
                    .collect(),
            ),
        )?;
        Ok(())
    }

    /// Evaluates the lighting model on the CPU for one surface point.
    ///
    /// Mirrors the WGSL of [`shared_wgsl`](Self::shared_wgsl): `normal` must be a
    /// unit vector in world space.
    pub fn shade(
        &self,
        surface: &Surface,
        normal: Vec3,
        vertex_worldspace: Vec3,
        camera_center: Vec3,
        lights: &[Light],
    ) -> Vec4 {
        let e = (camera_center - vertex_worldspace).normalize();
        let base = surface.color.truncate();
        let mut result = base * surface.ambient;

        for light in lights.iter().take(self.num_lights) {
            let to_light = light.position.truncate() - vertex_worldspace * light.position.w;
            let distance = to_light.length();
            let l = to_light.normalize();
            let h = (l + e).normalize();

            let diffuse = normal.dot(l).max(0.0);
            let specular = normal.dot(h).max(0.0).powf(surface.smoothness);
            let attenuation = 1.0 / (1.0 + light.attenuation * distance * distance);

            let light_color = light.color.truncate();
            let contribution = base * light_color * surface.diffusivity * diffuse
                + light_color * surface.specularity * specular;
            result += contribution * attenuation;
        }
        result.to4(false) + Vec4::new(0.0, 0.0, 0.0, surface.color.w)
    }
}

/// Squared length of each basis column of `m`, undoing non-uniform scale on normals.
fn squared_scale(m: &Mat4) -> Vec3 {
    let sum = m
        .rows
        .iter()
        .map(|row| Vec4::from(*row))
        .fold(Vec4::ZERO, |acc, row| acc + row * row);
    sum.truncate()
}
