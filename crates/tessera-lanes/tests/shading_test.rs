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
use std::collections::BTreeMap;
use std::rc::Rc;
use tessera_core::asset::{ImageData, ImageLoader, PendingImage};
use tessera_core::math::{Mat4, Vec3, Vec4};
use tessera_core::renderer::{
    BufferId, BufferTarget, GraphicsContext, Light, MinFilter, ProgramState, RenderError,
    RenderSettings, ResourceError, ShaderError, ShaderStage, UniformValue,
};
use tessera_infra::HeadlessContext;
use tessera_lanes::{
    Material, PhongShader, ProgramLocations, Shader, ShaderProgram, Texture, TexturedPhong,
};

// --- Test Setup: loaders and geometry ---
struct ImmediateLoader;
impl ImageLoader for ImmediateLoader {
    fn load(&self, _source: &str) -> PendingImage {
        PendingImage::ready(ImageData::solid(4, 4, [255, 255, 255, 255]))
    }
}

struct NeverLoader;
impl ImageLoader for NeverLoader {
    fn load(&self, _source: &str) -> PendingImage {
        PendingImage::pending()
    }
}

fn upload(ctx: &mut HeadlessContext, data: &[f32]) -> Result<BufferId> {
    let id = ctx.create_buffer(BufferTarget::Vertex);
    ctx.buffer_data(id, bytemuck::cast_slice(data))?;
    Ok(id)
}

fn triangle_buffers(ctx: &mut HeadlessContext, textured: bool) -> Result<BTreeMap<String, BufferId>> {
    let mut buffers = BTreeMap::new();
    buffers.insert(
        "position".to_string(),
        upload(ctx, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])?,
    );
    buffers.insert(
        "normal".to_string(),
        upload(ctx, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0])?,
    );
    if textured {
        buffers.insert(
            "texture_coord".to_string(),
            upload(ctx, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0])?,
        );
    }
    Ok(buffers)
}

fn lit_state() -> ProgramState {
    let mut state = ProgramState::new(
        Mat4::translation(Vec3::new(0.0, 0.0, -8.0)),
        Mat4::perspective(std::f32::consts::FRAC_PI_4, 1080.0 / 600.0, 1.0, 100.0),
    );
    state
        .lights
        .push(Light::new(Vec4::new(10.0, 10.0, 10.0, 1.0), Vec4::ONE, 1000.0));
    state
}
// ---

#[test]
fn test_phong_draw_pushes_material_and_lights() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let shader: Rc<dyn Shader> = Rc::new(PhongShader::new(2));
    let material = Material::new(shader.clone())
        .with_color(Vec4::new(1.0, 0.0, 0.0, 1.0))
        .with_ambient(0.4);
    let buffers = triangle_buffers(&mut ctx, false)?;
    let model = Mat4::translation(Vec3::new(2.0, 0.0, 0.0));

    shader.activate(&mut ctx, &buffers, &lit_state(), &model, &material)?;
    ctx.draw_arrays(Default::default(), 3)?;

    let call = &ctx.draw_calls()[0];
    assert_eq!(call.uniform("ambient"), Some(&UniformValue::Float(0.4)));
    assert_eq!(call.uniform("smoothness"), Some(&UniformValue::Float(40.0)));
    assert_eq!(
        call.uniform("shape_color"),
        Some(&UniformValue::Vec4([1.0, 0.0, 0.0, 1.0]))
    );
    assert_eq!(
        call.uniform("model_transform"),
        Some(&UniformValue::Mat4(model.to_cols_array()))
    );
    assert_eq!(
        call.uniform("camera_center"),
        Some(&UniformValue::Vec3([0.0, 0.0, 8.0]))
    );
    assert_eq!(
        call.uniform("light_attenuation_factors"),
        Some(&UniformValue::Vec4Array(vec![[0.001, 0.0, 0.0, 0.0]]))
    );
    assert_eq!(call.attributes.len(), 2);
    Ok(())
}

#[test]
fn test_program_is_staged_once_per_context() -> Result<()> {
    let mut first = HeadlessContext::default();
    let mut second = HeadlessContext::default();
    let shader = PhongShader::new(2);
    let material = Material::new(Rc::new(PhongShader::new(2)));
    let state = ProgramState::default();

    for ctx in [&mut first, &mut second] {
        let buffers = triangle_buffers(ctx, false)?;
        shader.activate(ctx, &buffers, &state, &Mat4::IDENTITY, &material)?;
        shader.activate(ctx, &buffers, &state, &Mat4::IDENTITY, &material)?;
    }

    assert_eq!(first.program_count(), 1);
    assert_eq!(second.program_count(), 1);
    assert_eq!(shader.program().context_count(), 2);
    let a = shader.program().instance(first.id()).map(|i| i.program);
    let b = shader.program().instance(second.id()).map(|i| i.program);
    assert!(a.is_some() && b.is_some());
    Ok(())
}

#[test]
fn test_restaging_reuses_the_program_object() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let shader = PhongShader::new(1);
    let program = shader.program();
    program.stage(&mut ctx, &shader.vertex_source(), &shader.fragment_source())?;
    let before = program.instance(ctx.id()).map(|i| i.program);

    program.stage(&mut ctx, &shader.vertex_source(), &shader.fragment_source())?;
    let after = program.instance(ctx.id()).map(|i| i.program);

    assert_eq!(before, after);
    assert_eq!(ctx.program_count(), 1);
    assert_eq!(ctx.shader_count(), 2);
    let id = after.ok_or_else(|| anyhow::anyhow!("program missing"))?;
    assert_eq!(ctx.program_links(id), Some(2));
    Ok(())
}

#[test]
fn test_locations_strip_array_suffixes() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let shader = TexturedPhong::new(2);
    let program = shader.program();
    program.stage(&mut ctx, &shader.vertex_source(), &shader.fragment_source())?;

    let instance = program
        .instance(ctx.id())
        .ok_or_else(|| anyhow::anyhow!("not staged"))?;
    let locations: &ProgramLocations = &instance.locations;
    assert!(locations.uniform("light_colors").is_some());
    assert!(locations.uniform("texture_map").is_some());
    assert!(locations.uniform("animation_time").is_some());
    let names: Vec<_> = locations.attributes.keys().cloned().collect();
    assert_eq!(names, ["normal", "position", "texture_coord"]);
    Ok(())
}

#[test]
fn test_ceiling_stops_runaway_contexts() -> Result<()> {
    let shader = PhongShader::new(1);
    let program = ShaderProgram::with_ceiling("bounded", 1);
    let mut first = HeadlessContext::default();
    let mut second = HeadlessContext::default();

    program.stage(&mut first, &shader.vertex_source(), &shader.fragment_source())?;
    let err = program
        .stage(&mut second, &shader.vertex_source(), &shader.fragment_source())
        .unwrap_err();

    assert_eq!(
        err,
        RenderError::ResourceError(ResourceError::TooManyGpuObjects { limit: 1 })
    );
    assert_eq!(second.program_count(), 0);
    Ok(())
}

#[test]
fn test_settings_bound_shader_and_texture_contexts() -> Result<()> {
    let settings = RenderSettings {
        context_ceiling: 1,
        num_lights: 3,
        ..RenderSettings::default()
    };
    let shader: Rc<dyn Shader> = Rc::new(TexturedPhong::from_settings(&settings));
    let texture = Rc::new(
        Texture::new("stars.png", MinFilter::Nearest, &ImmediateLoader)
            .with_context_ceiling(settings.context_ceiling),
    );
    let material = Material::new(shader.clone()).with_texture(texture.clone());
    let mut first = HeadlessContext::default();
    let mut second = HeadlessContext::default();

    let buffers = triangle_buffers(&mut first, true)?;
    shader.activate(&mut first, &buffers, &lit_state(), &Mat4::IDENTITY, &material)?;
    assert!(first.program_count() > 0);
    assert_eq!(
        texture.stage(&mut second, true),
        Err(RenderError::ResourceError(ResourceError::TooManyGpuObjects { limit: 1 }))
    );

    let buffers = triangle_buffers(&mut second, true)?;
    let err = shader
        .activate(&mut second, &buffers, &lit_state(), &Mat4::IDENTITY, &material)
        .unwrap_err();
    assert_eq!(
        err,
        RenderError::ResourceError(ResourceError::TooManyGpuObjects { limit: 1 })
    );
    assert_eq!(second.program_count(), 0);
    Ok(())
}

#[derive(Debug)]
struct BrokenShader {
    program: ShaderProgram,
}

impl Shader for BrokenShader {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }
    fn vertex_source(&self) -> String {
        "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }".into()
    }
    fn fragment_source(&self) -> String {
        "@fragment fn fs_main( -> {".into()
    }
    fn update_gpu(
        &self,
        _ctx: &mut dyn GraphicsContext,
        _locations: &ProgramLocations,
        _state: &ProgramState,
        _model_transform: &Mat4,
        _material: &Material,
    ) -> Result<(), RenderError> {
        Ok(())
    }
}

#[test]
fn test_compile_failure_reports_the_stage() {
    let mut ctx = HeadlessContext::default();
    let shader = Rc::new(BrokenShader {
        program: ShaderProgram::new("broken"),
    });
    let material = Material::new(shader.clone());

    let err = shader
        .activate(
            &mut ctx,
            &BTreeMap::new(),
            &ProgramState::default(),
            &Mat4::IDENTITY,
            &material,
        )
        .unwrap_err();
    match err {
        RenderError::ResourceError(ResourceError::Shader(ShaderError::CompilationFailed {
            stage,
            ..
        })) => assert_eq!(stage, ShaderStage::Fragment),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!shader.program().is_staged(ctx.id()));
}

#[test]
fn test_texture_waits_for_its_image() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let texture = Texture::new("earth.gif", MinFilter::LinearMipmapLinear, &NeverLoader);

    texture.activate(&mut ctx, 0)?;
    assert_eq!(ctx.texture_count(), 0);
    assert_eq!(ctx.bound_texture(0), None);
    assert_eq!(
        texture.stage(&mut ctx, true),
        Err(RenderError::ResourceError(ResourceError::TextureNotReady))
    );
    Ok(())
}

#[test]
fn test_texture_stages_once_and_generates_mipmaps() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let texture = Texture::new("earth.gif", MinFilter::LinearMipmapLinear, &ImmediateLoader);

    texture.activate(&mut ctx, 0)?;
    texture.activate(&mut ctx, 1)?;

    let id = texture
        .handle(ctx.id())
        .ok_or_else(|| anyhow::anyhow!("texture not staged"))?;
    assert_eq!(ctx.texture_count(), 1);
    assert_eq!(ctx.texture_uploads(id), Some(1));
    assert_eq!(ctx.texture_mip_levels(id), Some(3));
    assert_eq!(ctx.bound_texture(1), Some(id));
    let sampling = ctx
        .texture_sampling(id)
        .ok_or_else(|| anyhow::anyhow!("no sampling"))?;
    assert!(sampling.flip_y);
    assert_eq!(sampling.min_filter, MinFilter::LinearMipmapLinear);
    Ok(())
}

#[test]
fn test_nearest_texture_skips_mipmaps() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let texture = Texture::new("stars.png", MinFilter::Nearest, &ImmediateLoader);
    let id = texture.stage(&mut ctx, true)?;
    assert_eq!(ctx.texture_mip_levels(id), Some(1));

    // Re-staging uploads again into the same object.
    let again = texture.stage(&mut ctx, false)?;
    assert_eq!(again, id);
    assert_eq!(ctx.texture_uploads(id), Some(2));
    Ok(())
}

#[test]
fn test_textured_phong_binds_unit_zero_when_ready() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let shader: Rc<dyn Shader> = Rc::new(TexturedPhong::new(2));
    let texture = Rc::new(Texture::new("stars.png", MinFilter::Nearest, &ImmediateLoader));
    let material = Material::new(shader.clone())
        .with_color(Vec4::new(0.0, 0.0, 0.0, 1.0))
        .with_ambient(1.0)
        .with_diffusivity(0.1)
        .with_specularity(0.1)
        .with_texture(texture.clone());
    let buffers = triangle_buffers(&mut ctx, true)?;
    let mut state = lit_state();
    state.animation_time = 2500.0;

    shader.activate(&mut ctx, &buffers, &state, &Mat4::IDENTITY, &material)?;
    ctx.draw_arrays(Default::default(), 3)?;

    let call = &ctx.draw_calls()[0];
    assert_eq!(call.uniform("texture_map"), Some(&UniformValue::Int(0)));
    assert_eq!(call.uniform("animation_time"), Some(&UniformValue::Float(2.5)));
    assert_eq!(call.textures.get(&0).copied(), texture.handle(ctx.id()));
    assert_eq!(call.attributes.len(), 3);
    Ok(())
}

#[test]
fn test_missing_geometry_attribute_is_disabled() -> Result<()> {
    let mut ctx = HeadlessContext::default();
    let shader: Rc<dyn Shader> = Rc::new(TexturedPhong::new(2));
    let loading = Rc::new(Texture::new("slow.png", MinFilter::Nearest, &NeverLoader));
    let material = Material::new(shader.clone()).with_texture(loading);
    let buffers = triangle_buffers(&mut ctx, false)?;

    shader.activate(&mut ctx, &buffers, &lit_state(), &Mat4::IDENTITY, &material)?;
    ctx.draw_arrays(Default::default(), 3)?;

    let call = &ctx.draw_calls()[0];
    assert_eq!(call.attributes.len(), 2);
    assert!(call.textures.is_empty());
    assert_eq!(call.uniform("texture_map"), None);
    Ok(())
}
