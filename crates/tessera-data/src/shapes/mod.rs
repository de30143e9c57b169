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

//! Procedural shapes.
//!
//! Every shape emits `position`, `normal` and `texture_coord` columns plus
//! triangle indices. Compound shapes are assembled with
//! [`insert_transformed_copy_into`].

mod axis_arrows;
mod sphere;
mod square;
mod tube;

pub use self::axis_arrows::AxisArrows;
pub use self::sphere::SubdivisionSphere;
pub use self::square::{Cube, Square};
pub use self::tube::{ClosedCone, CylindricalTube};

use crate::geometry::{GeometryError, VertexBuffer};
use tessera_core::math::Mat4;

/// A generator of vertex data.
pub trait Shape {
    /// Builds a fresh, unstaged buffer holding the shape.
    fn build(&self) -> Result<VertexBuffer, GeometryError>;
}

/// Builds `shape` and appends it to `recipient`, moved by `transform`.
///
/// Positions go through `transform`, normals through its inverse transpose, and
/// indices are shifted past the recipient's existing vertices.
///
/// # Examples
///
/// ```
/// use tessera_core::math::{Mat4, Vec3};
/// use tessera_data::{insert_transformed_copy_into, Square, VertexBuffer};
///
/// let mut floor = VertexBuffer::new();
/// for x in [-1.0, 1.0] {
///     let at = Mat4::translation(Vec3::new(x, 0.0, 0.0));
///     insert_transformed_copy_into(&mut floor, &Square, &at).unwrap();
/// }
/// assert_eq!(floor.vertex_count(), 8);
/// assert_eq!(floor.indices.len(), 12);
/// ```
pub fn insert_transformed_copy_into(
    recipient: &mut VertexBuffer,
    shape: &dyn Shape,
    transform: &Mat4,
) -> Result<(), GeometryError> {
    recipient.append_transformed(&shape.build()?, transform)
}
