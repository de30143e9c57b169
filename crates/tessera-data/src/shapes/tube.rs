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

use super::Shape;
use crate::geometry::{GeometryError, VertexBuffer, NORMAL, POSITION, TEXTURE_COORD};
use tessera_core::math::{Vec2, Vec3, TAU};

/// An open cylinder of radius 1 around the Z axis, from `z = 0.5` down to `z = -0.5`.
#[derive(Debug, Clone, Copy)]
pub struct CylindricalTube {
    /// Subdivisions along the axis.
    pub rows: u32,
    /// Subdivisions around the axis.
    pub columns: u32,
}

impl CylindricalTube {
    /// Creates a tube generator.
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }
}

impl Shape for CylindricalTube {
    fn build(&self) -> Result<VertexBuffer, GeometryError> {
        revolve(self.rows, self.columns, |angle, ratio| {
            let (sin, cos) = angle.sin_cos();
            (Vec3::new(cos, sin, 0.5 - ratio), Vec3::new(cos, sin, 0.0))
        })
    }
}

/// A cone around the Z axis with its unit base at `z = -1` and its tip at `z = 1`.
#[derive(Debug, Clone, Copy)]
pub struct ClosedCone {
    /// Subdivisions from base to tip.
    pub rows: u32,
    /// Subdivisions around the axis.
    pub columns: u32,
}

impl ClosedCone {
    /// Creates a cone generator.
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }
}

impl Shape for ClosedCone {
    fn build(&self) -> Result<VertexBuffer, GeometryError> {
        revolve(self.rows, self.columns, |angle, ratio| {
            let (sin, cos) = angle.sin_cos();
            let p = Vec3::new(cos * (1.0 - ratio), sin * (1.0 - ratio), -1.0 + 2.0 * ratio);
            (p, Vec3::new(cos, sin, 0.5).normalize())
        })
    }
}

/// Sweeps a profile around the Z axis on a `(columns + 1) x (rows + 1)` grid.
///
/// `profile(angle, ratio)` returns the position and normal of the vertex at that
/// angle and fraction along the rows. Both counts must be non-zero and every
/// vertex must be addressable by a `u32` index.
fn revolve<F>(rows: u32, columns: u32, profile: F) -> Result<VertexBuffer, GeometryError>
where
    F: Fn(f32, f32) -> (Vec3, Vec3),
{
    let invalid = GeometryError::InvalidGrid { rows, columns };
    if rows == 0 || columns == 0 {
        return Err(invalid);
    }
    let vertices = rows
        .checked_add(1)
        .zip(columns.checked_add(1))
        .and_then(|(r, c)| r.checked_mul(c))
        .ok_or(invalid)? as usize;
    let mut positions = Vec::with_capacity(vertices);
    let mut normals = Vec::with_capacity(vertices);
    let mut texture_coords = Vec::with_capacity(vertices);

    for j in 0..=columns {
        let angle = TAU * j as f32 / columns as f32;
        for i in 0..=rows {
            let ratio = i as f32 / rows as f32;
            let (p, n) = profile(angle, ratio);
            positions.push(p);
            normals.push(n);
            texture_coords.push(Vec2::new(j as f32 / columns as f32, ratio));
        }
    }

    let mut indices = Vec::with_capacity(rows as usize * columns as usize * 6);
    for j in 0..columns {
        for i in 0..rows {
            let a = j * (rows + 1) + i;
            let b = a + 1;
            let c = (j + 1) * (rows + 1) + i;
            let d = c + 1;
            indices.extend([a, c, b, b, c, d]);
        }
    }

    Ok(VertexBuffer::new()
        .with_array(POSITION, positions)
        .with_array(NORMAL, normals)
        .with_array(TEXTURE_COORD, texture_coords)
        .with_indices(indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::VertexArray;
    use approx::assert_relative_eq;

    fn positions(buffer: &VertexBuffer) -> Vec<Vec3> {
        match buffer.array(POSITION) {
            Some(VertexArray::Vec3(p)) => p.clone(),
            _ => panic!("no positions"),
        }
    }

    #[test]
    fn tube_grid_and_winding() {
        let tube = CylindricalTube::new(2, 3).build().unwrap();
        assert_eq!(tube.vertex_count(), 3 * 4);
        assert_eq!(tube.indices.len(), 2 * 3 * 6);
        assert_eq!(&tube.indices[..6], &[0, 3, 1, 1, 3, 4]);

        let p = positions(&tube);
        assert_relative_eq!(p[0].z, 0.5);
        assert_relative_eq!(p[2].z, -0.5);
        for v in &p {
            assert_relative_eq!(Vec2::new(v.x, v.y).length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn empty_or_oversized_grids_are_rejected() {
        assert_eq!(
            CylindricalTube::new(0, 4).build().unwrap_err(),
            GeometryError::InvalidGrid { rows: 0, columns: 4 }
        );
        assert_eq!(
            ClosedCone::new(3, 0).build().unwrap_err(),
            GeometryError::InvalidGrid { rows: 3, columns: 0 }
        );
        assert_eq!(
            CylindricalTube::new(u32::MAX, 1).build().unwrap_err(),
            GeometryError::InvalidGrid { rows: u32::MAX, columns: 1 }
        );
        assert_eq!(
            ClosedCone::new(70_000, 70_000).build().unwrap_err(),
            GeometryError::InvalidGrid { rows: 70_000, columns: 70_000 }
        );
    }

    #[test]
    fn cone_narrows_to_its_tip() {
        let cone = ClosedCone::new(4, 10).build().unwrap();
        let p = positions(&cone);
        assert_relative_eq!(p[0].z, -1.0);
        assert_relative_eq!(p[0].x, 1.0);
        assert_relative_eq!(p[4].z, 1.0);
        assert_relative_eq!(p[4].x, 0.0);
        assert_eq!(cone.indices.len(), 4 * 10 * 6);
    }
}
