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

//! An in-memory [`GraphicsContext`] that validates and records every call.

use super::record::{Command, DrawCall};
use super::reflect::{self, CompiledStage, LinkedProgram};
use std::any::Any;
use std::collections::BTreeMap;
use tessera_core::asset::ImageData;
use tessera_core::math::Vec4;
use tessera_core::renderer::{
    ActiveAttribute, ActiveUniform, BufferId, BufferTarget, ContextId, GraphicsContext,
    PrimitiveType, ProgramId, ResourceError, ShaderError, ShaderId, ShaderStage, TextureId,
    TextureSampling, UniformKind, UniformLocation, UniformValue,
};

#[derive(Debug)]
struct BufferRecord {
    target: BufferTarget,
    data: Vec<u8>,
    allocations: u32,
}

#[derive(Debug)]
struct ShaderRecord {
    stage: ShaderStage,
    compiled: Option<CompiledStage>,
    compilations: u32,
}

#[derive(Debug, Default)]
struct ProgramRecord {
    attached: Vec<ShaderId>,
    linked: Option<LinkedProgram>,
    links: u32,
    values: BTreeMap<UniformLocation, UniformValue>,
}

#[derive(Debug, Default)]
struct TextureRecord {
    sampling: Option<TextureSampling>,
    size: Option<(u32, u32)>,
    mip_levels: u32,
    uploads: u32,
}

/// A rendering context with no window and no GPU.
///
/// Shaders are WGSL, compiled and validated with naga, so compile and link errors
/// carry real diagnostics. Buffers and textures are kept in memory. Every draw is
/// checked against the bound state (program, attributes, index range) and recorded
/// as a [`DrawCall`] so tests and tools can inspect what a frame submitted.
#[derive(Debug)]
pub struct HeadlessContext {
    id: ContextId,
    size: (u32, u32),
    buffers: Vec<BufferRecord>,
    shaders: Vec<ShaderRecord>,
    programs: Vec<ProgramRecord>,
    textures: Vec<TextureRecord>,
    current_program: Option<ProgramId>,
    enabled_attributes: BTreeMap<u32, (BufferId, u32)>,
    texture_units: BTreeMap<u32, TextureId>,
    clear_color: Option<Vec4>,
    clears: u32,
    draw_calls: Vec<DrawCall>,
    commands: Vec<Command>,
}

impl HeadlessContext {
    /// Creates a context with a fresh identity and the given drawable size.
    pub fn new(width: u32, height: u32) -> Self {
        let id = ContextId::next();
        log::info!("HeadlessContext: created context {} ({width}x{height})", id.raw());
        Self {
            id,
            size: (width, height),
            buffers: Vec::new(),
            shaders: Vec::new(),
            programs: Vec::new(),
            textures: Vec::new(),
            current_program: None,
            enabled_attributes: BTreeMap::new(),
            texture_units: BTreeMap::new(),
            clear_color: None,
            clears: 0,
            draw_calls: Vec::new(),
            commands: Vec::new(),
        }
    }

    // --- Inspection ---

    /// Every draw call issued so far.
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Returns and forgets the recorded draw calls.
    pub fn take_draw_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draw_calls)
    }

    /// Every mutating call issued so far, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of buffers allocated.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Current content of a buffer.
    pub fn buffer_contents(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(id.0).map(|b| b.data.as_slice())
    }

    /// How many times a buffer's storage was (re)allocated by `buffer_data`.
    pub fn buffer_allocations(&self, id: BufferId) -> Option<u32> {
        self.buffers.get(id.0).map(|b| b.allocations)
    }

    /// Number of program objects allocated.
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Number of shader objects allocated.
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// How many times a shader object was compiled.
    pub fn shader_compilations(&self, id: ShaderId) -> Option<u32> {
        self.shaders.get(id.0).map(|s| s.compilations)
    }

    /// How many times a program was successfully linked.
    pub fn program_links(&self, id: ProgramId) -> Option<u32> {
        self.programs.get(id.0).map(|p| p.links)
    }

    /// The last value written to a uniform of `program`, by name.
    pub fn uniform_value(&self, program: ProgramId, name: &str) -> Option<&UniformValue> {
        let location = self.uniform_location(program, name)?;
        self.programs.get(program.0)?.values.get(&location)
    }

    /// Number of textures allocated.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Sampling state applied to a texture, if any.
    pub fn texture_sampling(&self, id: TextureId) -> Option<TextureSampling> {
        self.textures.get(id.0).and_then(|t| t.sampling)
    }

    /// Number of mip levels present (`1` after an upload, more after mipmap generation).
    pub fn texture_mip_levels(&self, id: TextureId) -> Option<u32> {
        self.textures.get(id.0).map(|t| t.mip_levels)
    }

    /// How many times a texture's base level was uploaded.
    pub fn texture_uploads(&self, id: TextureId) -> Option<u32> {
        self.textures.get(id.0).map(|t| t.uploads)
    }

    /// The texture bound to `unit`.
    pub fn bound_texture(&self, unit: u32) -> Option<TextureId> {
        self.texture_units.get(&unit).copied()
    }

    /// Number of `clear` calls (one per rendered frame in practice).
    pub fn clear_count(&self) -> u32 {
        self.clears
    }

    /// The color of the last clear.
    pub fn clear_color(&self) -> Option<Vec4> {
        self.clear_color
    }

    // --- Internal helpers ---

    fn buffer_mut(&mut self, id: BufferId) -> Result<&mut BufferRecord, ResourceError> {
        self.buffers.get_mut(id.0).ok_or(ResourceError::InvalidHandle)
    }

    fn program(&self, id: ProgramId) -> Result<&ProgramRecord, ResourceError> {
        self.programs.get(id.0).ok_or(ResourceError::InvalidHandle)
    }

    fn linked(&self, id: ProgramId) -> Result<&LinkedProgram, ResourceError> {
        self.program(id)?
            .linked
            .as_ref()
            .ok_or_else(|| ResourceError::BackendError(format!("{id:?} is not linked")))
    }

    fn texture_mut(&mut self, id: TextureId) -> Result<&mut TextureRecord, ResourceError> {
        self.textures.get_mut(id.0).ok_or(ResourceError::InvalidHandle)
    }

    fn current_program(&self) -> Result<ProgramId, ResourceError> {
        self.current_program
            .ok_or_else(|| ResourceError::BackendError("no program in use".to_string()))
    }

    /// Enabled attributes the current program actually reads.
    ///
    /// Locations left enabled by an earlier program are ignored, as a draw never
    /// fetches from them.
    fn read_attributes(&self) -> Result<BTreeMap<u32, (BufferId, u32)>, ResourceError> {
        let linked = self.linked(self.current_program()?)?;
        Ok(self
            .enabled_attributes
            .iter()
            .filter(|(location, _)| linked.attributes.iter().any(|a| a.location == **location))
            .map(|(location, binding)| (*location, *binding))
            .collect())
    }

    /// Smallest number of vertices available across the attributes the draw reads.
    fn available_vertices(&self) -> Result<usize, ResourceError> {
        let mut available = usize::MAX;
        for (buffer, components) in self.read_attributes()?.values() {
            let record = self.buffers.get(buffer.0).ok_or(ResourceError::InvalidHandle)?;
            let stride = (*components as usize) * std::mem::size_of::<f32>();
            available = available.min(record.data.len() / stride.max(1));
        }
        Ok(available)
    }

    fn record_draw(
        &mut self,
        primitive: PrimitiveType,
        count: u32,
        index_buffer: Option<BufferId>,
    ) -> Result<(), ResourceError> {
        let program = self.current_program()?;
        let linked = self.linked(program)?;
        let values = &self.program(program)?.values;
        let uniforms = values
            .iter()
            .filter_map(|(location, value)| {
                let uniform = linked.uniforms.get(location.0 as usize)?;
                Some((uniform.base_name().to_string(), value.clone()))
            })
            .collect();
        let attributes = self
            .read_attributes()?
            .into_iter()
            .map(|(location, (buffer, _))| (location, buffer))
            .collect();

        self.draw_calls.push(DrawCall {
            program,
            primitive,
            count,
            index_buffer,
            uniforms,
            attributes,
            textures: self.texture_units.clone(),
        });
        self.commands.push(Command::Draw {
            primitive,
            count,
            indexed: index_buffer.is_some(),
        });
        Ok(())
    }
}

impl Default for HeadlessContext {
    fn default() -> Self {
        Self::new(1080, 600)
    }
}

/// Returns `true` if `value` can be written to a uniform of this shape.
fn accepts(uniform: &ActiveUniform, value: &UniformValue) -> bool {
    match (uniform.kind, value) {
        (UniformKind::Scalar, UniformValue::Float(_) | UniformValue::Int(_)) => true,
        (UniformKind::Texture, UniformValue::Int(unit)) => *unit >= 0,
        (UniformKind::Vector(3), UniformValue::Vec3(_)) => true,
        (UniformKind::Vector(4), UniformValue::Vec4(_)) => true,
        (UniformKind::Scalar, UniformValue::FloatArray(values)) => {
            values.len() <= uniform.count as usize
        }
        (UniformKind::Vector(4), UniformValue::Vec4Array(values)) => {
            values.len() <= uniform.count as usize
        }
        (UniformKind::Matrix { columns: 4, rows: 4 }, UniformValue::Mat4(_)) => true,
        _ => false,
    }
}

impl GraphicsContext for HeadlessContext {
    fn id(&self) -> ContextId {
        self.id
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        log::debug!("HeadlessContext: viewport set to {width}x{height}");
        self.size = (width, height);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn create_buffer(&mut self, target: BufferTarget) -> BufferId {
        let id = BufferId(self.buffers.len());
        self.buffers.push(BufferRecord {
            target,
            data: Vec::new(),
            allocations: 0,
        });
        log::debug!("HeadlessContext: Created {target:?} buffer {id:?}");
        self.commands.push(Command::CreateBuffer(id));
        id
    }

    fn buffer_data(&mut self, id: BufferId, data: &[u8]) -> Result<(), ResourceError> {
        let record = self.buffer_mut(id)?;
        record.data = data.to_vec();
        record.allocations += 1;
        self.commands.push(Command::BufferData {
            id,
            len: data.len(),
        });
        Ok(())
    }

    fn buffer_sub_data(
        &mut self,
        id: BufferId,
        offset: u64,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let record = self.buffer_mut(id)?;
        let start = offset as usize;
        let end = start + data.len();
        let target = record
            .data
            .get_mut(start..end)
            .ok_or(ResourceError::OutOfBounds)?;
        target.copy_from_slice(data);
        self.commands.push(Command::BufferSubData {
            id,
            offset,
            len: data.len(),
        });
        Ok(())
    }

    fn create_shader(&mut self, stage: ShaderStage) -> ShaderId {
        let id = ShaderId(self.shaders.len());
        self.shaders.push(ShaderRecord {
            stage,
            compiled: None,
            compilations: 0,
        });
        self.commands.push(Command::CreateShader(id));
        id
    }

    fn compile_shader(&mut self, id: ShaderId, source: &str) -> Result<(), ShaderError> {
        let stage = match self.shaders.get(id.0) {
            Some(record) => record.stage,
            None => {
                return Err(ShaderError::CompilationFailed {
                    stage: ShaderStage::Vertex,
                    details: format!("{id:?} does not name a shader object"),
                })
            }
        };
        self.commands.push(Command::CompileShader(id));
        let result = reflect::compile(stage, source);
        let record = &mut self.shaders[id.0];
        record.compilations += 1;
        match result {
            Ok(compiled) => {
                log::trace!("HeadlessContext: compiled {stage} shader {id:?}");
                record.compiled = Some(compiled);
                Ok(())
            }
            Err(details) => {
                record.compiled = None;
                Err(ShaderError::CompilationFailed { stage, details })
            }
        }
    }

    fn create_program(&mut self) -> ProgramId {
        let id = ProgramId(self.programs.len());
        self.programs.push(ProgramRecord::default());
        log::debug!("HeadlessContext: Created program {id:?}");
        self.commands.push(Command::CreateProgram(id));
        id
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) -> Result<(), ResourceError> {
        if shader.0 >= self.shaders.len() {
            return Err(ResourceError::InvalidHandle);
        }
        let record = self
            .programs
            .get_mut(program.0)
            .ok_or(ResourceError::InvalidHandle)?;
        if !record.attached.contains(&shader) {
            record.attached.push(shader);
        }
        self.commands.push(Command::AttachShader(program, shader));
        Ok(())
    }

    fn detach_shader(&mut self, program: ProgramId, shader: ShaderId) -> Result<(), ResourceError> {
        let record = self
            .programs
            .get_mut(program.0)
            .ok_or(ResourceError::InvalidHandle)?;
        record.attached.retain(|s| *s != shader);
        self.commands.push(Command::DetachShader(program, shader));
        Ok(())
    }

    fn link_program(&mut self, program: ProgramId) -> Result<(), ShaderError> {
        let link_error = |details: String| ShaderError::LinkFailed { program, details };
        let attached = self
            .programs
            .get(program.0)
            .map(|p| p.attached.clone())
            .ok_or_else(|| link_error("not a program object".to_string()))?;
        self.commands.push(Command::LinkProgram(program));

        let stage_of = |wanted: ShaderStage| {
            attached
                .iter()
                .filter_map(|id| self.shaders.get(id.0))
                .find(|s| s.stage == wanted)
        };
        let vertex = stage_of(ShaderStage::Vertex)
            .ok_or_else(|| link_error("no vertex shader attached".to_string()))?
            .compiled
            .as_ref()
            .ok_or_else(|| link_error("vertex shader is not compiled".to_string()))?;
        let fragment = stage_of(ShaderStage::Fragment)
            .ok_or_else(|| link_error("no fragment shader attached".to_string()))?
            .compiled
            .as_ref()
            .ok_or_else(|| link_error("fragment shader is not compiled".to_string()))?;

        let linked = reflect::link(vertex, fragment).map_err(link_error)?;
        let record = &mut self.programs[program.0];
        record.linked = Some(linked);
        record.values.clear();
        record.links += 1;
        Ok(())
    }

    fn active_uniforms(&self, program: ProgramId) -> Result<Vec<ActiveUniform>, ResourceError> {
        Ok(self.linked(program)?.uniforms.clone())
    }

    fn active_attributes(
        &self,
        program: ProgramId,
    ) -> Result<Vec<ActiveAttribute>, ResourceError> {
        Ok(self.linked(program)?.attributes.clone())
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let linked = self.programs.get(program.0)?.linked.as_ref()?;
        linked
            .uniforms
            .iter()
            .position(|u| u.base_name() == name)
            .map(|index| UniformLocation(index as u32))
    }

    fn use_program(&mut self, program: ProgramId) -> Result<(), ResourceError> {
        self.linked(program)?;
        self.current_program = Some(program);
        self.commands.push(Command::UseProgram(program));
        Ok(())
    }

    fn set_uniform(
        &mut self,
        location: UniformLocation,
        value: UniformValue,
    ) -> Result<(), ResourceError> {
        let program = self.current_program()?;
        let uniform = self
            .linked(program)?
            .uniforms
            .get(location.0 as usize)
            .ok_or(ResourceError::OutOfBounds)?;
        if !accepts(uniform, &value) {
            return Err(ResourceError::BackendError(format!(
                "uniform `{}` ({:?} x{}) cannot hold {value:?}",
                uniform.base_name(),
                uniform.kind,
                uniform.count
            )));
        }
        self.programs[program.0].values.insert(location, value);
        Ok(())
    }

    fn enable_vertex_attribute(
        &mut self,
        location: u32,
        buffer: BufferId,
        components: u32,
    ) -> Result<(), ResourceError> {
        match self.buffers.get(buffer.0) {
            Some(record) if record.target == BufferTarget::Vertex => {}
            Some(_) => {
                return Err(ResourceError::BackendError(format!(
                    "{buffer:?} is not a vertex buffer"
                )))
            }
            None => return Err(ResourceError::InvalidHandle),
        }
        self.enabled_attributes.insert(location, (buffer, components));
        Ok(())
    }

    fn disable_vertex_attribute(&mut self, location: u32) {
        self.enabled_attributes.remove(&location);
    }

    fn create_texture(&mut self) -> TextureId {
        let id = TextureId(self.textures.len());
        self.textures.push(TextureRecord::default());
        log::debug!("HeadlessContext: Created texture {id:?}");
        self.commands.push(Command::CreateTexture(id));
        id
    }

    fn set_texture_sampling(
        &mut self,
        id: TextureId,
        sampling: TextureSampling,
    ) -> Result<(), ResourceError> {
        self.texture_mut(id)?.sampling = Some(sampling);
        Ok(())
    }

    fn upload_texture(&mut self, id: TextureId, image: &ImageData) -> Result<(), ResourceError> {
        let expected = (image.width as usize) * (image.height as usize) * 4;
        if image.rgba.len() != expected {
            return Err(ResourceError::BackendError(format!(
                "image data is {} bytes, expected {expected} for {}x{}",
                image.rgba.len(),
                image.width,
                image.height
            )));
        }
        let record = self.texture_mut(id)?;
        record.size = Some((image.width, image.height));
        record.mip_levels = 1;
        record.uploads += 1;
        self.commands.push(Command::UploadTexture(id));
        Ok(())
    }

    fn generate_mipmaps(&mut self, id: TextureId) -> Result<(), ResourceError> {
        let record = self.texture_mut(id)?;
        let (width, height) = record.size.ok_or_else(|| {
            ResourceError::BackendError(format!("{id:?} has no image to build mipmaps from"))
        })?;
        record.mip_levels = 32 - width.max(height).max(1).leading_zeros();
        self.commands.push(Command::GenerateMipmaps(id));
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, id: TextureId) -> Result<(), ResourceError> {
        if id.0 >= self.textures.len() {
            return Err(ResourceError::InvalidHandle);
        }
        self.texture_units.insert(unit, id);
        self.commands.push(Command::BindTexture { unit, id });
        Ok(())
    }

    fn clear(&mut self, color: Vec4, depth: bool) {
        self.clear_color = Some(color);
        self.clears += 1;
        self.commands.push(Command::Clear { depth });
    }

    fn draw_arrays(&mut self, primitive: PrimitiveType, count: u32) -> Result<(), ResourceError> {
        if count as usize > self.available_vertices()? {
            return Err(ResourceError::OutOfBounds);
        }
        self.record_draw(primitive, count, None)
    }

    fn draw_elements(
        &mut self,
        primitive: PrimitiveType,
        index_buffer: BufferId,
        count: u32,
    ) -> Result<(), ResourceError> {
        let record = self
            .buffers
            .get(index_buffer.0)
            .ok_or(ResourceError::InvalidHandle)?;
        if record.target != BufferTarget::Index {
            return Err(ResourceError::BackendError(format!(
                "{index_buffer:?} is not an index buffer"
            )));
        }
        let bytes = record
            .data
            .get(..count as usize * std::mem::size_of::<u32>())
            .ok_or(ResourceError::OutOfBounds)?;
        let indices: Vec<u32> = bytes
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<u32>)
            .collect();
        let available = self.available_vertices()?;
        if indices.iter().any(|i| *i as usize >= available) {
            return Err(ResourceError::OutOfBounds);
        }
        self.record_draw(primitive, count, Some(index_buffer))
    }
}
