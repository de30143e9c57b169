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

use super::{insert_transformed_copy_into, Shape};
use crate::geometry::{GeometryError, VertexBuffer, NORMAL, POSITION, TEXTURE_COORD};
use tessera_core::math::{Mat4, Vec2, Vec3, FRAC_PI_2, PI};

/// A 2x2 square in the XY plane facing +Z, centered on the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Square;

impl Shape for Square {
    fn build(&self) -> Result<VertexBuffer, GeometryError> {
        Ok(VertexBuffer::new()
            .with_array(
                POSITION,
                vec![
                    Vec3::new(-1.0, -1.0, 0.0),
                    Vec3::new(1.0, -1.0, 0.0),
                    Vec3::new(-1.0, 1.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                ],
            )
            .with_array(NORMAL, vec![Vec3::Z; 4])
            .with_array(
                TEXTURE_COORD,
                vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(1.0, 0.0),
                    Vec2::new(0.0, 1.0),
                    Vec2::new(1.0, 1.0),
                ],
            )
            .with_indices(vec![0, 1, 2, 1, 3, 2]))
    }
}

/// A 2x2x2 cube made of six squares, with flat normals per face.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cube;

impl Shape for Cube {
    fn build(&self) -> Result<VertexBuffer, GeometryError> {
        let mut cube = VertexBuffer::new();
        for i in 0..3 {
            for j in 0..2 {
                let tilt = if i == 0 { FRAC_PI_2 } else { 0.0 };
                let turn = PI * j as f32 - if i == 1 { FRAC_PI_2 } else { 0.0 };
                let face = Mat4::rotation(tilt, Vec3::X)
                    * Mat4::rotation(turn, Vec3::Y)
                    * Mat4::translation(Vec3::new(0.0, 0.0, 1.0));
                insert_transformed_copy_into(&mut cube, &Square, &face)?;
            }
        }
        Ok(cube)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::VertexArray;
    use approx::assert_relative_eq;

    #[test]
    fn square_layout() {
        let square = Square.build().unwrap();
        assert_eq!(square.vertex_count(), 4);
        assert_eq!(square.indices, [0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn cube_faces_sit_on_the_unit_box() {
        let cube = Cube.build().unwrap();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.indices.len(), 36);

        let Some(VertexArray::Vec3(positions)) = cube.array(POSITION) else {
            panic!("cube has no positions");
        };
        let Some(VertexArray::Vec3(normals)) = cube.array(NORMAL) else {
            panic!("cube has no normals");
        };
        for (p, n) in positions.iter().zip(normals) {
            // Every vertex lies on the face its normal points out of.
            assert_relative_eq!(p.dot(*n), 1.0, epsilon = 1e-5);
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-5);
        }
    }
}
