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

use crate::asset::ImageData;
use crate::math::Vec4;
use crate::renderer::api::*;
use crate::renderer::error::{ResourceError, ShaderError};
use std::any::Any;

/// One rendering context: the surface-bound session every GPU resource is uploaded to.
///
/// The context is an external collaborator. The engine only relies on its identity
/// ([`GraphicsContext::id`]) as the cache key for uploaded resources, and on the
/// operations below. Every call is synchronous: a slow upload stalls the frame it
/// happens in.
pub trait GraphicsContext {
    /// Returns the identity used as the key of every GPU resource cache.
    fn id(&self) -> ContextId;

    /// Returns the drawable size in pixels as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Sets the viewport to cover `width` x `height` pixels.
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Allows downcasting to the concrete backend.
    fn as_any(&self) -> &dyn Any;

    /// Allows mutable downcasting to the concrete backend.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    // --- Buffers ---

    /// Allocates a new, empty buffer for the given binding point.
    fn create_buffer(&mut self, target: BufferTarget) -> BufferId;

    /// Replaces the whole content of a buffer, reallocating its storage.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If `id` does not name a live buffer.
    fn buffer_data(&mut self, id: BufferId, data: &[u8]) -> Result<(), ResourceError>;

    /// Overwrites part of a buffer in place, without reallocating.
    /// ## Arguments
    /// * `id` - The buffer to write to.
    /// * `offset` - Byte offset of the first written byte.
    /// * `data` - The bytes to write.
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If the write does not fit in the current storage.
    /// * `ResourceError::InvalidHandle` - If `id` does not name a live buffer.
    fn buffer_sub_data(&mut self, id: BufferId, offset: u64, data: &[u8])
        -> Result<(), ResourceError>;

    // --- Shaders and programs ---

    /// Allocates an empty shader object for one stage.
    fn create_shader(&mut self, stage: ShaderStage) -> ShaderId;

    /// Sets the source of a shader object and compiles it.
    /// ## Errors
    /// * `ShaderError::CompilationFailed` - Carries the compiler diagnostic text.
    fn compile_shader(&mut self, id: ShaderId, source: &str) -> Result<(), ShaderError>;

    /// Allocates an empty program object.
    fn create_program(&mut self) -> ProgramId;

    /// Attaches a compiled shader to a program.
    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) -> Result<(), ResourceError>;

    /// Detaches a shader from a program so that it can be recompiled in place.
    fn detach_shader(&mut self, program: ProgramId, shader: ShaderId) -> Result<(), ResourceError>;

    /// Links the attached stages.
    /// ## Errors
    /// * `ShaderError::LinkFailed` - Carries the linker diagnostic text.
    fn link_program(&mut self, program: ProgramId) -> Result<(), ShaderError>;

    /// Lists the uniforms of a linked program.
    fn active_uniforms(&self, program: ProgramId) -> Result<Vec<ActiveUniform>, ResourceError>;

    /// Lists the vertex attributes of a linked program.
    fn active_attributes(&self, program: ProgramId)
        -> Result<Vec<ActiveAttribute>, ResourceError>;

    /// Resolves a uniform name (without array suffix) to a location in a linked program.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Makes `program` the target of subsequent uniform writes and draws.
    fn use_program(&mut self, program: ProgramId) -> Result<(), ResourceError>;

    /// Writes a uniform of the program in use.
    fn set_uniform(
        &mut self,
        location: UniformLocation,
        value: UniformValue,
    ) -> Result<(), ResourceError>;

    /// Enables an attribute slot and sources it from `buffer`.
    fn enable_vertex_attribute(
        &mut self,
        location: u32,
        buffer: BufferId,
        components: u32,
    ) -> Result<(), ResourceError>;

    /// Disables an attribute slot.
    fn disable_vertex_attribute(&mut self, location: u32);

    // --- Textures ---

    /// Allocates an empty 2D texture.
    fn create_texture(&mut self) -> TextureId;

    /// Applies sampling state to a texture.
    fn set_texture_sampling(
        &mut self,
        id: TextureId,
        sampling: TextureSampling,
    ) -> Result<(), ResourceError>;

    /// Uploads the base level of a texture.
    fn upload_texture(&mut self, id: TextureId, image: &ImageData) -> Result<(), ResourceError>;

    /// Generates the full mipmap chain from the base level.
    fn generate_mipmaps(&mut self, id: TextureId) -> Result<(), ResourceError>;

    /// Binds a texture to a texture unit.
    fn bind_texture(&mut self, unit: u32, id: TextureId) -> Result<(), ResourceError>;

    // --- Frame ---

    /// Clears the color buffer to `color` and, if requested, the depth buffer.
    fn clear(&mut self, color: Vec4, depth: bool);

    /// Draws `count` vertices from the enabled attributes.
    fn draw_arrays(&mut self, primitive: PrimitiveType, count: u32) -> Result<(), ResourceError>;

    /// Draws `count` indices read from `index_buffer`.
    fn draw_elements(
        &mut self,
        primitive: PrimitiveType,
        index_buffer: BufferId,
        count: u32,
    ) -> Result<(), ResourceError>;
}
