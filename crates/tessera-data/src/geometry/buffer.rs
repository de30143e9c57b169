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

use super::array::VertexArray;
use super::error::GeometryError;
use std::collections::BTreeMap;
use tessera_core::math::Mat4;
use tessera_core::renderer::{
    BufferId, BufferTarget, GpuInstances, GraphicsContext, PrimitiveType, ProgramState,
    RenderError, ResourceError,
};
use tessera_lanes::Material;

/// Attribute carrying vertex positions.
pub const POSITION: &str = "position";
/// Attribute carrying surface normals.
pub const NORMAL: &str = "normal";
/// Attribute carrying texture coordinates.
pub const TEXTURE_COORD: &str = "texture_coord";
/// Attribute carrying tangent vectors.
pub const TANGENTS: &str = "tangents";

/// A vertex buffer uploaded to one rendering context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferInstance {
    /// One GPU buffer per attribute name.
    pub buffers: BTreeMap<String, BufferId>,
    /// The index buffer, once indices have been written.
    pub index_buffer: Option<BufferId>,
    allocated: BTreeMap<BufferId, usize>,
}

/// Named vertex attribute columns plus an index list.
///
/// Columns keep their insertion order, so the first column decides the vertex
/// count of a non-indexed draw.
#[derive(Debug, Default)]
pub struct VertexBuffer {
    arrays: Vec<(String, VertexArray)>,
    /// Triangle (or other primitive) indices into the columns.
    pub indices: Vec<u32>,
    instances: GpuInstances<BufferInstance>,
}

impl VertexBuffer {
    /// Creates a buffer with no columns and no indices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a column, builder style.
    pub fn with_array(mut self, name: &str, array: impl Into<VertexArray>) -> Self {
        self.set_array(name, array);
        self
    }

    /// Caps the number of contexts the buffer may be staged on, builder style.
    pub fn with_context_ceiling(mut self, ceiling: usize) -> Self {
        self.instances.set_ceiling(ceiling);
        self
    }

    /// Sets the index list, builder style.
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = indices;
        self
    }

    /// Adds a column, or replaces the column with the same name in place.
    pub fn set_array(&mut self, name: &str, array: impl Into<VertexArray>) {
        let array = array.into();
        match self.array_mut(name) {
            Some(existing) => *existing = array,
            None => self.arrays.push((name.to_string(), array)),
        }
    }

    /// The column called `name`.
    pub fn array(&self, name: &str) -> Option<&VertexArray> {
        self.arrays.iter().find(|(n, _)| n == name).map(|(_, a)| a)
    }

    /// The column called `name`, mutably.
    pub fn array_mut(&mut self, name: &str) -> Option<&mut VertexArray> {
        self.arrays
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, a)| a)
    }

    /// Every column in insertion order.
    pub fn arrays(&self) -> impl Iterator<Item = (&str, &VertexArray)> {
        self.arrays.iter().map(|(n, a)| (n.as_str(), a))
    }

    /// Applies `f` to the column called `name`. Returns `false` if there is no such column.
    pub fn map_array<F>(&mut self, name: &str, f: F) -> bool
    where
        F: FnOnce(&mut VertexArray),
    {
        match self.array_mut(name) {
            Some(array) => {
                f(array);
                true
            }
            None => false,
        }
    }

    /// Number of vertices, taken from the first column.
    pub fn vertex_count(&self) -> usize {
        self.arrays.first().map_or(0, |(_, a)| a.len())
    }

    /// Appends `source`, with its positions and tangents moved by `transform` and its
    /// normals by the inverse transpose of `transform`.
    ///
    /// Other columns are copied as they are. Indices are shifted past the vertices
    /// already present, so the winding of every copied primitive is preserved.
    ///
    /// # Errors
    /// * `GeometryError::MismatchedAttribute` if a column exists in both buffers with
    ///   different row sizes.
    /// * `GeometryError::NotTransformable` if a position, normal or tangent column of
    ///   `source` is not three-component.
    ///
    /// Nothing is appended in either case.
    pub fn append_transformed(
        &mut self,
        source: &VertexBuffer,
        transform: &Mat4,
    ) -> Result<(), GeometryError> {
        for (name, column) in &source.arrays {
            if matches!(name.as_str(), POSITION | NORMAL | TANGENTS) && column.components() != 3 {
                return Err(GeometryError::NotTransformable {
                    name: name.clone(),
                    found: column.components(),
                });
            }
            if let Some(existing) = self.array(name) {
                if existing.components() != column.components() {
                    return Err(GeometryError::MismatchedAttribute {
                        name: name.clone(),
                        expected: existing.components(),
                        found: column.components(),
                    });
                }
            }
        }

        let offset = self.array(POSITION).map_or(0, VertexArray::len) as u32;
        let normal_transform = transform.transpose().inverse();

        for (name, column) in &source.arrays {
            let copied = match (name.as_str(), column) {
                (POSITION | TANGENTS, VertexArray::Vec3(points)) => VertexArray::Vec3(
                    points
                        .iter()
                        .map(|p| (*transform * p.to4(true)).truncate())
                        .collect(),
                ),
                (NORMAL, VertexArray::Vec3(normals)) => VertexArray::Vec3(
                    normals
                        .iter()
                        .map(|n| (normal_transform * n.to4(true)).truncate())
                        .collect(),
                ),
                _ => column.clone(),
            };
            match self.array_mut(name) {
                Some(existing) => {
                    existing.extend_from(&copied);
                }
                None => self.arrays.push((name.clone(), copied)),
            }
        }
        self.indices
            .extend(source.indices.iter().map(|index| index + offset));
        Ok(())
    }

    /// Returns `true` if the buffer has been staged on the context `ctx` identifies.
    pub fn is_staged(&self, ctx: &dyn GraphicsContext) -> bool {
        self.instances.contains(ctx.id())
    }

    /// Writes the current columns (all of them, or only `selection`) and optionally
    /// the indices to `ctx`.
    ///
    /// GPU buffers are created on the first call for a context. Later calls write
    /// into the same buffers in place; a buffer is reallocated only if its data grew.
    pub fn stage(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        selection: Option<&[&str]>,
        write_indices: bool,
    ) -> Result<(), RenderError> {
        let id = ctx.id();
        let instance = self
            .instances
            .activate(id, || Ok(BufferInstance::default()))?;

        for (name, column) in &self.arrays {
            if selection.is_some_and(|names| !names.contains(&name.as_str())) {
                continue;
            }
            let buffer = match instance.buffers.get(name) {
                Some(buffer) => *buffer,
                None => {
                    let buffer = ctx.create_buffer(BufferTarget::Vertex);
                    log::debug!("VertexBuffer: created {buffer:?} for '{name}' on context {}", id.raw());
                    instance.buffers.insert(name.clone(), buffer);
                    buffer
                }
            };
            write(ctx, &mut instance.allocated, buffer, column.as_bytes())?;
        }

        if write_indices && !self.indices.is_empty() {
            let buffer = match instance.index_buffer {
                Some(buffer) => buffer,
                None => {
                    let buffer = ctx.create_buffer(BufferTarget::Index);
                    instance.index_buffer = Some(buffer);
                    buffer
                }
            };
            write(ctx, &mut instance.allocated, buffer, bytemuck::cast_slice(&self.indices))?;
        }
        Ok(())
    }

    /// Returns this buffer's instance on `ctx`, staging everything on first use.
    pub fn activate(&mut self, ctx: &mut dyn GraphicsContext) -> Result<&BufferInstance, RenderError> {
        if !self.instances.contains(ctx.id()) {
            self.stage(ctx, None, true)?;
        }
        self.instances
            .get(ctx.id())
            .ok_or(RenderError::ResourceError(ResourceError::InvalidHandle))
    }

    /// Draws the buffer with `material` at `model_transform`.
    ///
    /// Issues an indexed draw when indices exist, otherwise a draw of
    /// [`vertex_count`](Self::vertex_count) vertices.
    pub fn draw(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        state: &ProgramState,
        model_transform: &Mat4,
        material: &Material,
        primitive: PrimitiveType,
    ) -> Result<(), RenderError> {
        self.activate(ctx)?;
        let instance = self
            .instances
            .get(ctx.id())
            .ok_or(ResourceError::InvalidHandle)?;
        material
            .shader
            .activate(ctx, &instance.buffers, state, model_transform, material)?;

        match instance.index_buffer {
            Some(index_buffer) if !self.indices.is_empty() => {
                ctx.draw_elements(primitive, index_buffer, self.indices.len() as u32)?
            }
            _ => ctx.draw_arrays(primitive, self.vertex_count() as u32)?,
        }
        Ok(())
    }
}

/// Full write on first use of a buffer, in-place update afterwards.
fn write(
    ctx: &mut dyn GraphicsContext,
    allocated: &mut BTreeMap<BufferId, usize>,
    buffer: BufferId,
    bytes: &[u8],
) -> Result<(), ResourceError> {
    match allocated.get(&buffer) {
        Some(capacity) if bytes.len() <= *capacity => ctx.buffer_sub_data(buffer, 0, bytes),
        _ => {
            ctx.buffer_data(buffer, bytes)?;
            allocated.insert(buffer, bytes.len());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::math::{Vec2, Vec3};

    fn quad() -> VertexBuffer {
        VertexBuffer::new()
            .with_array(POSITION, vec![Vec3::ZERO, Vec3::X, Vec3::Y])
            .with_array(NORMAL, vec![Vec3::Z; 3])
            .with_array(TEXTURE_COORD, vec![Vec2::ZERO; 3])
            .with_indices(vec![0, 1, 2])
    }

    #[test]
    fn columns_keep_insertion_order() {
        let buffer = quad();
        let names: Vec<_> = buffer.arrays().map(|(n, _)| n).collect();
        assert_eq!(names, [POSITION, NORMAL, TEXTURE_COORD]);
        assert_eq!(buffer.vertex_count(), 3);
    }

    #[test]
    fn set_array_replaces_in_place() {
        let mut buffer = quad();
        buffer.set_array(POSITION, vec![Vec3::ONE]);
        assert_eq!(buffer.arrays().next().map(|(n, a)| (n, a.len())), Some((POSITION, 1)));
    }

    #[test]
    fn append_shifts_indices() {
        let mut recipient = quad();
        recipient
            .append_transformed(&quad(), &Mat4::IDENTITY)
            .unwrap();
        assert_eq!(recipient.indices, [0, 1, 2, 3, 4, 5]);
        assert_eq!(recipient.vertex_count(), 6);
    }

    #[test]
    fn append_rejects_mismatched_columns() {
        let mut recipient = quad();
        let odd = VertexBuffer::new().with_array(TEXTURE_COORD, vec![Vec3::ZERO]);
        let err = recipient
            .append_transformed(&odd, &Mat4::IDENTITY)
            .unwrap_err();
        assert_eq!(
            err,
            GeometryError::MismatchedAttribute {
                name: TEXTURE_COORD.to_string(),
                expected: 2,
                found: 3,
            }
        );
        assert_eq!(recipient.vertex_count(), 3);
    }

    #[test]
    fn append_refuses_to_skip_the_transform() {
        let mut recipient = VertexBuffer::new();
        let flat = VertexBuffer::new()
            .with_array(POSITION, vec![Vec2::ZERO, Vec2::new(1.0, 0.0)])
            .with_array(NORMAL, vec![Vec3::Z; 2]);
        let err = recipient
            .append_transformed(&flat, &Mat4::translation(Vec3::X))
            .unwrap_err();
        assert_eq!(
            err,
            GeometryError::NotTransformable {
                name: POSITION.to_string(),
                found: 2,
            }
        );
        assert_eq!(recipient.vertex_count(), 0);
        assert!(recipient.array(NORMAL).is_none());
    }

    #[test]
    fn map_array_reports_missing_columns() {
        let mut buffer = quad();
        assert!(!buffer.map_array("color", |_| {}));
        assert!(buffer.map_array(TEXTURE_COORD, |a| {
            if let VertexArray::Vec2(rows) = a {
                rows.iter_mut().for_each(|uv| *uv = *uv * 2.0);
            }
        }));
    }
}
