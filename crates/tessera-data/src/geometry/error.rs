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

use std::fmt;

/// An error raised while composing geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// An attribute holds rows of a different size in the two buffers being merged.
    MismatchedAttribute {
        /// The attribute name.
        name: String,
        /// Components per row in the recipient.
        expected: u32,
        /// Components per row in the copied geometry.
        found: u32,
    },
    /// A column that is transformed as points or directions is not three-component.
    NotTransformable {
        /// The attribute name.
        name: String,
        /// Components per row found in the column.
        found: u32,
    },
    /// A surface of revolution was asked for an empty or oversized grid.
    InvalidGrid {
        /// Subdivisions along the profile.
        rows: u32,
        /// Subdivisions around the axis.
        columns: u32,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::MismatchedAttribute {
                name,
                expected,
                found,
            } => write!(
                f,
                "Attribute '{name}' has {expected} components per vertex but {found} were supplied"
            ),
            GeometryError::NotTransformable { name, found } => write!(
                f,
                "Attribute '{name}' must have 3 components per vertex to be transformed, found {found}"
            ),
            GeometryError::InvalidGrid { rows, columns } => write!(
                f,
                "Cannot revolve a {rows}x{columns} grid: both counts must be non-zero and the vertex count must fit in u32"
            ),
        }
    }
}

impl std::error::Error for GeometryError {}
