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

//! Records of what the headless context has been asked to do.

use std::collections::BTreeMap;
use tessera_core::renderer::{
    BufferId, PrimitiveType, ProgramId, ShaderId, TextureId, UniformValue,
};

/// One mutating call made on a [`HeadlessContext`](super::HeadlessContext), in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A buffer handle was allocated.
    CreateBuffer(BufferId),
    /// A buffer's storage was (re)allocated and filled.
    BufferData {
        /// The buffer written.
        id: BufferId,
        /// Number of bytes written.
        len: usize,
    },
    /// Part of a buffer was overwritten in place.
    BufferSubData {
        /// The buffer written.
        id: BufferId,
        /// Byte offset of the write.
        offset: u64,
        /// Number of bytes written.
        len: usize,
    },
    /// A shader object was allocated.
    CreateShader(ShaderId),
    /// A shader object was compiled.
    CompileShader(ShaderId),
    /// A program object was allocated.
    CreateProgram(ProgramId),
    /// A shader was attached to a program.
    AttachShader(ProgramId, ShaderId),
    /// A shader was detached from a program.
    DetachShader(ProgramId, ShaderId),
    /// A program was linked.
    LinkProgram(ProgramId),
    /// A program was made current.
    UseProgram(ProgramId),
    /// A texture handle was allocated.
    CreateTexture(TextureId),
    /// A texture's base level was uploaded.
    UploadTexture(TextureId),
    /// A texture's mipmap chain was generated.
    GenerateMipmaps(TextureId),
    /// A texture was bound to a unit.
    BindTexture {
        /// The texture unit.
        unit: u32,
        /// The bound texture.
        id: TextureId,
    },
    /// The color (and possibly depth) buffer was cleared.
    Clear {
        /// Whether depth was cleared too.
        depth: bool,
    },
    /// A draw call was issued.
    Draw {
        /// The primitive topology.
        primitive: PrimitiveType,
        /// Vertex or index count.
        count: u32,
        /// Whether the draw read an index buffer.
        indexed: bool,
    },
}

/// A snapshot of the pipeline state at the moment a draw call was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// The program in use.
    pub program: ProgramId,
    /// The primitive topology.
    pub primitive: PrimitiveType,
    /// Number of vertices (non-indexed) or indices (indexed) drawn.
    pub count: u32,
    /// The index buffer, for indexed draws.
    pub index_buffer: Option<BufferId>,
    /// Every uniform value of the program, keyed by name without array suffix.
    pub uniforms: BTreeMap<String, UniformValue>,
    /// Enabled attribute locations the program reads, and the buffers behind them.
    pub attributes: BTreeMap<u32, BufferId>,
    /// Texture units and the textures bound to them.
    pub textures: BTreeMap<u32, TextureId>,
}

impl DrawCall {
    /// Returns `true` if the draw read an index buffer.
    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }

    /// Returns the value of a uniform at draw time.
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }
}
