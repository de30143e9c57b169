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

use anyhow::Result;
use tessera_core::asset::ImageData;
use tessera_core::math::Vec4;
use tessera_core::renderer::{
    BufferTarget, GraphicsContext, MinFilter, PrimitiveType, ProgramId, ResourceError,
    ShaderError, ShaderStage, TextureSampling, UniformValue,
};
use tessera_infra::{Command, HeadlessContext};

const VERTEX: &str = r#"
struct Uniforms {
    model_transform: mat4x4<f32>,
    shape_color: vec4<f32>,
}
@group(0) @binding(0) var<uniform> u: Uniforms;

struct VertexOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) shade: vec4<f32>,
}

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip = u.model_transform * vec4<f32>(position, 1.0);
    out.shade = u.shape_color;
    return out;
}
"#;

const FRAGMENT: &str = r#"
@fragment
fn fs_main(@location(0) shade: vec4<f32>) -> @location(0) vec4<f32> {
    return shade;
}
"#;

fn linked_program(ctx: &mut HeadlessContext) -> Result<ProgramId> {
    let vs = ctx.create_shader(ShaderStage::Vertex);
    ctx.compile_shader(vs, VERTEX)?;
    let fs = ctx.create_shader(ShaderStage::Fragment);
    ctx.compile_shader(fs, FRAGMENT)?;
    let program = ctx.create_program();
    ctx.attach_shader(program, vs)?;
    ctx.attach_shader(program, fs)?;
    ctx.link_program(program)?;
    Ok(program)
}

fn triangle_positions() -> Vec<u8> {
    let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    bytemuck::cast_slice(&positions).to_vec()
}

#[test]
fn test_indexed_draw_is_recorded_with_uniforms() -> Result<()> {
    let mut ctx = HeadlessContext::new(800, 600);
    let program = linked_program(&mut ctx)?;
    ctx.use_program(program)?;

    let color = ctx
        .uniform_location(program, "shape_color")
        .ok_or_else(|| anyhow::anyhow!("shape_color missing"))?;
    ctx.set_uniform(color, UniformValue::Vec4([1.0, 0.5, 0.0, 1.0]))?;

    let positions = ctx.create_buffer(BufferTarget::Vertex);
    ctx.buffer_data(positions, &triangle_positions())?;
    let indices = ctx.create_buffer(BufferTarget::Index);
    ctx.buffer_data(indices, bytemuck::cast_slice(&[0u32, 1, 2]))?;

    let attributes = ctx.active_attributes(program)?;
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0].name, "position");
    ctx.enable_vertex_attribute(attributes[0].location, positions, attributes[0].components)?;

    ctx.clear(Vec4::new(0.0, 0.0, 0.0, 1.0), true);
    ctx.draw_elements(PrimitiveType::Triangles, indices, 3)?;

    assert_eq!(ctx.clear_count(), 1);
    let calls = ctx.draw_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].is_indexed());
    assert_eq!(calls[0].count, 3);
    assert_eq!(
        calls[0].uniform("shape_color"),
        Some(&UniformValue::Vec4([1.0, 0.5, 0.0, 1.0]))
    );
    assert_eq!(calls[0].attributes.get(&0), Some(&positions));
    Ok(())
}

#[test]
fn test_compile_errors_carry_stage_and_diagnostics() {
    let mut ctx = HeadlessContext::default();
    let vs = ctx.create_shader(ShaderStage::Vertex);
    let err = ctx
        .compile_shader(vs, "@vertex fn vs_main( -> {")
        .unwrap_err();
    match err {
        ShaderError::CompilationFailed { stage, details } => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(!details.is_empty());
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_link_fails_without_a_fragment_stage() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let vs = ctx.create_shader(ShaderStage::Vertex);
    ctx.compile_shader(vs, VERTEX)?;
    let program = ctx.create_program();
    ctx.attach_shader(program, vs)?;

    let err = ctx.link_program(program).unwrap_err();
    assert!(matches!(err, ShaderError::LinkFailed { .. }));
    assert!(ctx.use_program(program).is_err());
    Ok(())
}

#[test]
fn test_relinking_the_same_program_keeps_its_handle() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let program = linked_program(&mut ctx)?;
    ctx.link_program(program)?;

    assert_eq!(ctx.program_count(), 1);
    assert_eq!(ctx.program_links(program), Some(2));
    Ok(())
}

#[test]
fn test_uniform_kind_mismatch_is_rejected() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let program = linked_program(&mut ctx)?;
    ctx.use_program(program)?;
    let model = ctx
        .uniform_location(program, "model_transform")
        .ok_or_else(|| anyhow::anyhow!("model_transform missing"))?;

    assert!(ctx.set_uniform(model, UniformValue::Float(1.0)).is_err());
    assert!(ctx.uniform_location(program, "not_there").is_none());
    Ok(())
}

#[test]
fn test_draws_outside_the_vertex_data_fail() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let program = linked_program(&mut ctx)?;
    ctx.use_program(program)?;

    let positions = ctx.create_buffer(BufferTarget::Vertex);
    ctx.buffer_data(positions, &triangle_positions())?;
    ctx.enable_vertex_attribute(0, positions, 3)?;

    let indices = ctx.create_buffer(BufferTarget::Index);
    ctx.buffer_data(indices, bytemuck::cast_slice(&[0u32, 1, 7]))?;

    assert_eq!(
        ctx.draw_elements(PrimitiveType::Triangles, indices, 3),
        Err(ResourceError::OutOfBounds)
    );
    assert_eq!(
        ctx.draw_arrays(PrimitiveType::Triangles, 4),
        Err(ResourceError::OutOfBounds)
    );
    ctx.draw_arrays(PrimitiveType::Triangles, 3)?;
    assert_eq!(ctx.draw_calls().len(), 1);
    Ok(())
}

#[test]
fn test_locations_the_program_does_not_read_are_ignored() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let program = linked_program(&mut ctx)?;
    ctx.use_program(program)?;

    let positions = ctx.create_buffer(BufferTarget::Vertex);
    ctx.buffer_data(positions, &triangle_positions())?;
    ctx.enable_vertex_attribute(0, positions, 3)?;

    // Left over from a program with a texture coordinate input.
    let stale = ctx.create_buffer(BufferTarget::Vertex);
    ctx.buffer_data(stale, bytemuck::cast_slice(&[0.0f32, 0.0]))?;
    ctx.enable_vertex_attribute(2, stale, 2)?;

    ctx.draw_arrays(PrimitiveType::Triangles, 3)?;
    let calls = ctx.draw_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].attributes.len(), 1);
    assert_eq!(calls[0].attributes.get(&2), None);
    Ok(())
}

#[test]
fn test_sub_data_updates_in_place() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let buffer = ctx.create_buffer(BufferTarget::Vertex);
    ctx.buffer_data(buffer, &[0u8; 8])?;
    ctx.buffer_sub_data(buffer, 4, &[1, 2, 3, 4])?;

    assert_eq!(ctx.buffer_contents(buffer), Some(&[0, 0, 0, 0, 1, 2, 3, 4][..]));
    assert_eq!(ctx.buffer_allocations(buffer), Some(1));
    assert_eq!(
        ctx.buffer_sub_data(buffer, 6, &[9, 9, 9, 9]),
        Err(ResourceError::OutOfBounds)
    );
    assert!(matches!(
        ctx.commands().last(),
        Some(Command::BufferSubData { offset: 4, len: 4, .. })
    ));
    Ok(())
}

#[test]
fn test_texture_upload_and_mipmaps() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let texture = ctx.create_texture();
    assert!(ctx.generate_mipmaps(texture).is_err());

    let sampling = TextureSampling::for_images(MinFilter::LinearMipmapLinear);
    ctx.set_texture_sampling(texture, sampling)?;
    ctx.upload_texture(texture, &ImageData::solid(8, 4, [255, 255, 255, 255]))?;
    assert_eq!(ctx.texture_mip_levels(texture), Some(1));
    ctx.generate_mipmaps(texture)?;
    assert_eq!(ctx.texture_mip_levels(texture), Some(4));

    ctx.bind_texture(0, texture)?;
    assert_eq!(ctx.bound_texture(0), Some(texture));
    assert_eq!(ctx.texture_sampling(texture), Some(sampling));

    let broken = ImageData {
        width: 2,
        height: 2,
        rgba: vec![0; 3],
    };
    assert!(ctx.upload_texture(texture, &broken).is_err());
    Ok(())
}

#[test]
fn test_every_context_has_its_own_identity() {
    let a = HeadlessContext::default();
    let b = HeadlessContext::default();
    assert_ne!(a.id(), b.id());
}
