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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::math::MathError;
use crate::renderer::api::{ProgramId, ShaderStage};
use std::fmt;

/// An error related to compiling or linking a shader program.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// One stage failed to compile.
    CompilationFailed {
        /// The stage that failed.
        stage: ShaderStage,
        /// The compiler diagnostic.
        details: String,
    },
    /// The compiled stages could not be linked into a program.
    LinkFailed {
        /// The program that failed to link.
        program: ProgramId,
        /// The linker diagnostic.
        details: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationFailed { stage, details } => {
                write!(f, "{stage} shader compile error: {details}")
            }
            ShaderError::LinkFailed { program, details } => {
                write!(f, "Shader linker error for {program:?}: {details}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation or use of a GPU resource (buffers, programs, textures).
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// One resource was uploaded to more distinct contexts than the cache allows.
    /// This almost always means a fresh context is being created every frame.
    TooManyGpuObjects {
        /// The per-resource context ceiling that was exceeded.
        limit: usize,
    },
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// A texture was staged before its image finished loading.
    TextureNotReady,
    /// An attempt was made to access a resource out of its bounds (e.g., in a buffer).
    OutOfBounds,
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::TooManyGpuObjects { limit } => {
                write!(f, "Too many GPU objects: more than {limit} contexts for one resource")
            }
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::TextureNotReady => write!(f, "Texture image is not loaded yet."),
            ResourceError::OutOfBounds => write!(f, "Resource access out of bounds."),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// A high-level error that can interrupt a frame or a staging operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
    /// A transform could not be constructed.
    Math(MathError),
    /// A critical rendering operation failed.
    RenderingFailed(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::Math(err) => write!(f, "Invalid transform: {err}"),
            RenderError::RenderingFailed(msg) => {
                write!(f, "A critical rendering operation failed: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            RenderError::Math(err) => Some(err),
            RenderError::RenderingFailed(_) => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

impl From<ShaderError> for RenderError {
    fn from(err: ShaderError) -> Self {
        RenderError::ResourceError(ResourceError::Shader(err))
    }
}

impl From<MathError> for RenderError {
    fn from(err: MathError) -> Self {
        RenderError::Math(err)
    }
}
