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

//! Defines uniform locations, reflected uniform shapes and the values pushed to them.

/// A resolved uniform slot inside one linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniformLocation(pub u32);

/// The shape of a uniform as reported by program reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    /// A single scalar.
    Scalar,
    /// A vector with the given number of components.
    Vector(u32),
    /// A matrix with the given number of columns and rows.
    Matrix {
        /// Number of columns.
        columns: u32,
        /// Number of rows.
        rows: u32,
    },
    /// A 2D texture sampled through a texture unit.
    Texture,
}

/// A uniform reported by a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUniform {
    /// The name as reported by the program. Array uniforms carry an index
    /// suffix such as `lights[0]`.
    pub name: String,
    /// The element shape.
    pub kind: UniformKind,
    /// Number of array elements, `1` for non-arrays.
    pub count: u32,
}

impl ActiveUniform {
    /// Returns the name with any trailing `[...]` index suffix removed.
    pub fn base_name(&self) -> &str {
        self.name.split('[').next().unwrap_or(&self.name)
    }
}

/// A value written to a uniform location.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// A single `f32`.
    Float(f32),
    /// A single `i32`, also used for texture unit indices.
    Int(i32),
    /// A 3-component vector.
    Vec3([f32; 3]),
    /// A 4-component vector.
    Vec4([f32; 4]),
    /// An array of `f32`.
    FloatArray(Vec<f32>),
    /// An array of 4-component vectors.
    Vec4Array(Vec<[f32; 4]>),
    /// A 4x4 matrix in column-major order.
    Mat4([f32; 16]),
}
