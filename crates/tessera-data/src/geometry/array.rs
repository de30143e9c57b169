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

use tessera_core::math::{Vec2, Vec3, Vec4};

/// One vertex attribute: a column of equally sized rows.
#[derive(Debug, Clone, PartialEq)]
pub enum VertexArray {
    /// Two components per vertex, e.g. texture coordinates.
    Vec2(Vec<Vec2>),
    /// Three components per vertex, e.g. positions and normals.
    Vec3(Vec<Vec3>),
    /// Four components per vertex, e.g. colors.
    Vec4(Vec<Vec4>),
}

impl VertexArray {
    /// Number of vertices in the column.
    pub fn len(&self) -> usize {
        match self {
            VertexArray::Vec2(rows) => rows.len(),
            VertexArray::Vec3(rows) => rows.len(),
            VertexArray::Vec4(rows) => rows.len(),
        }
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `f32` components per row.
    pub fn components(&self) -> u32 {
        match self {
            VertexArray::Vec2(_) => 2,
            VertexArray::Vec3(_) => 3,
            VertexArray::Vec4(_) => 4,
        }
    }

    /// The rows flattened to bytes, in row order, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            VertexArray::Vec2(rows) => bytemuck::cast_slice(rows),
            VertexArray::Vec3(rows) => bytemuck::cast_slice(rows),
            VertexArray::Vec4(rows) => bytemuck::cast_slice(rows),
        }
    }

    /// An empty column of the same kind.
    pub fn empty_like(&self) -> Self {
        match self {
            VertexArray::Vec2(_) => VertexArray::Vec2(Vec::new()),
            VertexArray::Vec3(_) => VertexArray::Vec3(Vec::new()),
            VertexArray::Vec4(_) => VertexArray::Vec4(Vec::new()),
        }
    }

    /// Appends the rows of `other`. Returns `false`, leaving `self` untouched, when the
    /// two columns have different row sizes.
    pub fn extend_from(&mut self, other: &VertexArray) -> bool {
        match (self, other) {
            (VertexArray::Vec2(a), VertexArray::Vec2(b)) => a.extend_from_slice(b),
            (VertexArray::Vec3(a), VertexArray::Vec3(b)) => a.extend_from_slice(b),
            (VertexArray::Vec4(a), VertexArray::Vec4(b)) => a.extend_from_slice(b),
            _ => return false,
        }
        true
    }
}

impl From<Vec<Vec2>> for VertexArray {
    fn from(rows: Vec<Vec2>) -> Self {
        VertexArray::Vec2(rows)
    }
}

impl From<Vec<Vec3>> for VertexArray {
    fn from(rows: Vec<Vec3>) -> Self {
        VertexArray::Vec3(rows)
    }
}

impl From<Vec<Vec4>> for VertexArray {
    fn from(rows: Vec<Vec4>) -> Self {
        VertexArray::Vec4(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_follow_row_order() {
        let column = VertexArray::from(vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]);
        let floats: &[f32] = bytemuck::cast_slice(column.as_bytes());
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(column.components(), 2);
    }

    #[test]
    fn extend_rejects_other_kinds() {
        let mut column = VertexArray::from(vec![Vec3::ZERO]);
        assert!(!column.extend_from(&VertexArray::from(vec![Vec2::ZERO])));
        assert!(column.extend_from(&VertexArray::from(vec![Vec3::ONE])));
        assert_eq!(column.len(), 2);
        assert!(column.empty_like().is_empty());
    }
}
