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

use super::material::Material;
use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tessera_core::math::Mat4;
use tessera_core::renderer::{
    ActiveAttribute, BufferId, ContextId, GpuInstances, GraphicsContext, ProgramId, ProgramState,
    RenderError, ResourceError, ShaderId, ShaderStage, UniformLocation, UniformValue,
};

/// Where a linked program expects its inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramLocations {
    /// Uniform names (array suffix stripped) and their locations.
    pub uniforms: HashMap<String, UniformLocation>,
    /// Vertex attribute names and their location and component count.
    pub attributes: BTreeMap<String, ActiveAttribute>,
}

impl ProgramLocations {
    /// Queries a linked program for every active uniform and attribute.
    pub fn resolve(ctx: &dyn GraphicsContext, program: ProgramId) -> Result<Self, ResourceError> {
        let uniforms = ctx
            .active_uniforms(program)?
            .iter()
            .filter_map(|uniform| {
                let name = uniform.base_name();
                ctx.uniform_location(program, name)
                    .map(|location| (name.to_string(), location))
            })
            .collect();
        let attributes = ctx
            .active_attributes(program)?
            .into_iter()
            .map(|attribute| (attribute.name.clone(), attribute))
            .collect();
        Ok(Self {
            uniforms,
            attributes,
        })
    }

    /// Returns the location of a uniform, if the program uses it.
    pub fn uniform(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms.get(name).copied()
    }

    /// Writes `value` to the uniform `name` of the program in use.
    ///
    /// Uniforms the program does not declare are skipped, so a shader family can
    /// send its whole state regardless of which stages read it.
    pub fn send(
        &self,
        ctx: &mut dyn GraphicsContext,
        name: &str,
        value: UniformValue,
    ) -> Result<(), ResourceError> {
        match self.uniform(name) {
            Some(location) => ctx.set_uniform(location, value),
            None => {
                log::trace!("ProgramLocations: no uniform named `{name}`, skipped");
                Ok(())
            }
        }
    }
}

/// A program uploaded to one rendering context.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramInstance {
    /// The linked program object.
    pub program: ProgramId,
    /// The vertex stage object attached to `program`.
    pub vertex: ShaderId,
    /// The fragment stage object attached to `program`.
    pub fragment: ShaderId,
    /// Locations resolved after the last link.
    pub locations: ProgramLocations,
}

/// The per-context compiled form of a shader.
pub struct ShaderProgram {
    label: String,
    instances: RefCell<GpuInstances<ProgramInstance>>,
}

impl ShaderProgram {
    /// Creates a program that has not been uploaded anywhere yet.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            instances: RefCell::new(GpuInstances::new()),
        }
    }

    /// Like [`ShaderProgram::new`] with a custom per-resource context ceiling.
    pub fn with_ceiling(label: impl Into<String>, ceiling: usize) -> Self {
        Self {
            label: label.into(),
            instances: RefCell::new(GpuInstances::with_ceiling(ceiling)),
        }
    }

    /// A name used in logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` if the program has been staged on `ctx`.
    pub fn is_staged(&self, ctx: ContextId) -> bool {
        self.instances.borrow().contains(ctx)
    }

    /// Number of contexts the program lives on.
    pub fn context_count(&self) -> usize {
        self.instances.borrow().len()
    }

    /// Borrows the instance staged on `ctx`.
    pub fn instance(&self, ctx: ContextId) -> Option<Ref<'_, ProgramInstance>> {
        Ref::filter_map(self.instances.borrow(), |instances| instances.get(ctx)).ok()
    }

    /// Compiles and links both stages on `ctx`.
    ///
    /// The first call on a context allocates the shader and program objects. Later
    /// calls detach, recompile and relink on those same objects, so a program can be
    /// hot-swapped without disturbing its copies on other contexts.
    ///
    /// # Errors
    /// Compile and link failures carry the backend's diagnostic text. A new context
    /// past the cache ceiling fails before anything is allocated.
    pub fn stage(
        &self,
        ctx: &mut dyn GraphicsContext,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<(), RenderError> {
        let id = ctx.id();
        let mut instances = self.instances.borrow_mut();

        if let Some(instance) = instances.get_mut(id) {
            log::debug!("ShaderProgram '{}': re-staging on context {}", self.label, id.raw());
            ctx.detach_shader(instance.program, instance.vertex)?;
            ctx.detach_shader(instance.program, instance.fragment)?;
            Self::compile_and_link(
                ctx,
                instance.program,
                instance.vertex,
                vertex_source,
                instance.fragment,
                fragment_source,
            )?;
            instance.locations = ProgramLocations::resolve(&*ctx, instance.program)?;
            return Ok(());
        }

        instances.activate(id, || {
            let vertex = ctx.create_shader(ShaderStage::Vertex);
            let fragment = ctx.create_shader(ShaderStage::Fragment);
            let program = ctx.create_program();
            log::debug!(
                "ShaderProgram '{}': created {program:?} on context {}",
                self.label,
                id.raw()
            );
            Self::compile_and_link(ctx, program, vertex, vertex_source, fragment, fragment_source)?;
            Ok(ProgramInstance {
                program,
                vertex,
                fragment,
                locations: ProgramLocations::resolve(&*ctx, program)?,
            })
        })?;
        Ok(())
    }

    fn compile_and_link(
        ctx: &mut dyn GraphicsContext,
        program: ProgramId,
        vertex: ShaderId,
        vertex_source: &str,
        fragment: ShaderId,
        fragment_source: &str,
    ) -> Result<(), RenderError> {
        ctx.compile_shader(vertex, vertex_source)?;
        ctx.compile_shader(fragment, fragment_source)?;
        ctx.attach_shader(program, vertex)?;
        ctx.attach_shader(program, fragment)?;
        ctx.link_program(program)?;
        Ok(())
    }
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("label", &self.label)
            .field("contexts", &self.context_count())
            .finish()
    }
}

/// A shading strategy: source generation plus the per-draw uniform contract.
///
/// Implementors only describe what is specific to them. [`Shader::activate`]
/// provides the common sequence: stage on first use, make the program current,
/// push the uniforms, then point every attribute the program reads at the matching
/// geometry buffer (or disable it when the geometry has none).
pub trait Shader: fmt::Debug {
    /// The compiled program, one per context.
    fn program(&self) -> &ShaderProgram;

    /// WGSL source of the vertex stage.
    fn vertex_source(&self) -> String;

    /// WGSL source of the fragment stage.
    fn fragment_source(&self) -> String;

    /// Pushes material, transform and frame state into the program's uniforms.
    ///
    /// Called with the program already current on `ctx`.
    fn update_gpu(
        &self,
        ctx: &mut dyn GraphicsContext,
        locations: &ProgramLocations,
        state: &ProgramState,
        model_transform: &Mat4,
        material: &Material,
    ) -> Result<(), RenderError>;

    /// Prepares `ctx` to draw geometry whose attribute buffers are `buffers`.
    fn activate(
        &self,
        ctx: &mut dyn GraphicsContext,
        buffers: &BTreeMap<String, BufferId>,
        state: &ProgramState,
        model_transform: &Mat4,
        material: &Material,
    ) -> Result<(), RenderError> {
        let program = self.program();
        if !program.is_staged(ctx.id()) {
            program.stage(ctx, &self.vertex_source(), &self.fragment_source())?;
        }
        let instance = program
            .instance(ctx.id())
            .ok_or(ResourceError::InvalidHandle)?;

        ctx.use_program(instance.program)?;
        self.update_gpu(ctx, &instance.locations, state, model_transform, material)?;

        for (name, attribute) in &instance.locations.attributes {
            match buffers.get(name) {
                Some(buffer) => {
                    ctx.enable_vertex_attribute(attribute.location, *buffer, attribute.components)?
                }
                None => ctx.disable_vertex_attribute(attribute.location),
            }
        }
        Ok(())
    }
}
