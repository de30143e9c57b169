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

//! WGSL compilation, reflection and link checks for the headless context.
//!
//! Sources are parsed and validated with naga, so diagnostics are exactly what a
//! WebGPU implementation would report. Reflection flattens uniform-buffer structs
//! into one uniform per member, which mirrors how the lighting shaders address
//! their parameters by name.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, ArraySize, Binding, Handle, Module, Type, TypeInner};
use tessera_core::renderer::{ActiveAttribute, ActiveUniform, ShaderStage, UniformKind};

/// A stage-level interface variable (`@location(n)` input or output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Varying {
    pub location: u32,
    pub name: String,
    pub components: u32,
}

/// The reflected interface of one successfully compiled stage.
#[derive(Debug, Clone)]
pub(crate) struct CompiledStage {
    pub stage: ShaderStage,
    pub uniforms: Vec<ActiveUniform>,
    pub inputs: Vec<Varying>,
    pub outputs: Vec<Varying>,
}

/// The result of linking a vertex and a fragment stage.
#[derive(Debug, Clone, Default)]
pub(crate) struct LinkedProgram {
    /// Indexed by uniform location.
    pub uniforms: Vec<ActiveUniform>,
    pub attributes: Vec<ActiveAttribute>,
}

/// Parses, validates and reflects one stage.
pub(crate) fn compile(stage: ShaderStage, source: &str) -> Result<CompiledStage, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;

    let naga_stage = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };
    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == naga_stage)
        .ok_or_else(|| format!("no {stage} entry point found in module"))?;

    let inputs = entry
        .function
        .arguments
        .iter()
        .flat_map(|arg| varyings(&module, arg.name.as_deref(), arg.ty, arg.binding.as_ref()))
        .collect();
    let outputs = entry
        .function
        .result
        .as_ref()
        .map(|r| varyings(&module, None, r.ty, r.binding.as_ref()))
        .unwrap_or_default();

    Ok(CompiledStage {
        stage,
        uniforms: reflect_uniforms(&module),
        inputs,
        outputs,
    })
}

/// Checks that the two stages agree and builds the program interface.
pub(crate) fn link(
    vertex: &CompiledStage,
    fragment: &CompiledStage,
) -> Result<LinkedProgram, String> {
    if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
        return Err("a program needs exactly one vertex and one fragment stage".to_string());
    }

    for input in &fragment.inputs {
        match vertex.outputs.iter().find(|o| o.location == input.location) {
            None => {
                return Err(format!(
                    "fragment input `{}` at location {} is not written by the vertex stage",
                    input.name, input.location
                ))
            }
            Some(output) if output.components != input.components => {
                return Err(format!(
                    "location {} is written with {} components but read with {}",
                    input.location, output.components, input.components
                ))
            }
            Some(_) => {}
        }
    }

    let mut uniforms = vertex.uniforms.clone();
    for uniform in &fragment.uniforms {
        match uniforms.iter().find(|u| u.base_name() == uniform.base_name()) {
            Some(existing) if existing.kind != uniform.kind || existing.count != uniform.count => {
                return Err(format!(
                    "uniform `{}` is declared differently in the vertex and fragment stages",
                    uniform.base_name()
                ))
            }
            Some(_) => {}
            None => uniforms.push(uniform.clone()),
        }
    }

    let attributes = vertex
        .inputs
        .iter()
        .map(|v| ActiveAttribute {
            name: v.name.clone(),
            location: v.location,
            components: v.components,
        })
        .collect();

    Ok(LinkedProgram {
        uniforms,
        attributes,
    })
}

fn varyings(
    module: &Module,
    name: Option<&str>,
    ty: Handle<Type>,
    binding: Option<&Binding>,
) -> Vec<Varying> {
    match binding {
        Some(Binding::Location { location, .. }) => vec![Varying {
            location: *location,
            name: name.unwrap_or_default().to_string(),
            components: components(&module.types[ty].inner),
        }],
        Some(Binding::BuiltIn(_)) => Vec::new(),
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .flat_map(|m| varyings(module, m.name.as_deref(), m.ty, m.binding.as_ref()))
                .collect(),
            _ => Vec::new(),
        },
    }
}

fn components(inner: &TypeInner) -> u32 {
    match inner {
        TypeInner::Scalar(_) => 1,
        TypeInner::Vector { size, .. } => *size as u32,
        _ => 0,
    }
}

fn reflect_uniforms(module: &Module) -> Vec<ActiveUniform> {
    let mut uniforms = Vec::new();
    for (_, var) in module.global_variables.iter() {
        let var_name = var.name.as_deref().unwrap_or_default();
        match (var.space, &module.types[var.ty].inner) {
            (AddressSpace::Uniform, TypeInner::Struct { members, .. }) => {
                for member in members {
                    let member_name = member.name.as_deref().unwrap_or_default();
                    uniforms.extend(uniform(module, member_name, member.ty));
                }
            }
            (AddressSpace::Uniform, _) => uniforms.extend(uniform(module, var_name, var.ty)),
            (AddressSpace::Handle, TypeInner::Image { .. }) => uniforms.push(ActiveUniform {
                name: var_name.to_string(),
                kind: UniformKind::Texture,
                count: 1,
            }),
            _ => {}
        }
    }
    uniforms
}

fn uniform(module: &Module, name: &str, ty: Handle<Type>) -> Option<ActiveUniform> {
    match &module.types[ty].inner {
        TypeInner::Array {
            base,
            size: ArraySize::Constant(count),
            ..
        } => Some(ActiveUniform {
            name: format!("{name}[0]"),
            kind: element_kind(&module.types[*base].inner)?,
            count: count.get(),
        }),
        inner => Some(ActiveUniform {
            name: name.to_string(),
            kind: element_kind(inner)?,
            count: 1,
        }),
    }
}

fn element_kind(inner: &TypeInner) -> Option<UniformKind> {
    match inner {
        TypeInner::Scalar(_) => Some(UniformKind::Scalar),
        TypeInner::Vector { size, .. } => Some(UniformKind::Vector(*size as u32)),
        TypeInner::Matrix { columns, rows, .. } => Some(UniformKind::Matrix {
            columns: *columns as u32,
            rows: *rows as u32,
        }),
        _ => None,
    }
}
