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
use tessera_core::math::{Vec2, Vec3, PI, TAU};

/// A unit sphere obtained by recursively bisecting the faces of a tetrahedron.
///
/// Every bisection pushes three new vertices, so edges shared by two triangles
/// carry duplicate vertices. Normals equal positions.
#[derive(Debug, Clone, Copy)]
pub struct SubdivisionSphere {
    /// Recursion depth. `0` yields the bare tetrahedron.
    pub max_subdivisions: u32,
}

impl SubdivisionSphere {
    /// Creates a sphere generator with the given recursion depth.
    pub fn new(max_subdivisions: u32) -> Self {
        Self { max_subdivisions }
    }
}

struct Builder {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Builder {
    fn subdivide_triangle(&mut self, a: u32, b: u32, c: u32, count: u32) {
        if count == 0 {
            self.indices.extend([a, b, c]);
            return;
        }
        let midpoint = |p: u32, q: u32, positions: &[Vec3]| {
            positions[p as usize]
                .mix(positions[q as usize], 0.5)
                .normalize()
        };
        let ab_vert = midpoint(a, b, &self.positions);
        let ac_vert = midpoint(a, c, &self.positions);
        let bc_vert = midpoint(b, c, &self.positions);

        let ab = self.push(ab_vert);
        let ac = self.push(ac_vert);
        let bc = self.push(bc_vert);

        self.subdivide_triangle(a, ab, ac, count - 1);
        self.subdivide_triangle(ab, b, bc, count - 1);
        self.subdivide_triangle(ac, bc, c, count - 1);
        self.subdivide_triangle(ab, bc, ac, count - 1);
    }

    fn push(&mut self, p: Vec3) -> u32 {
        self.positions.push(p);
        (self.positions.len() - 1) as u32
    }
}

impl Shape for SubdivisionSphere {
    fn build(&self) -> Result<VertexBuffer, GeometryError> {
        let mut builder = Builder {
            positions: vec![
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(0.0, 0.9428, 0.3333),
                Vec3::new(-0.8165, -0.4714, 0.3333),
                Vec3::new(0.8165, -0.4714, 0.3333),
            ],
            indices: Vec::new(),
        };
        let n = self.max_subdivisions;
        builder.subdivide_triangle(0, 1, 2, n);
        builder.subdivide_triangle(3, 2, 1, n);
        builder.subdivide_triangle(1, 0, 3, n);
        builder.subdivide_triangle(0, 2, 3, n);

        let texture_coords: Vec<Vec2> = builder
            .positions
            .iter()
            .map(|p| Vec2::new(0.5 - p.z.atan2(p.x) / TAU, 0.5 + p.y.asin() / PI))
            .collect();

        Ok(VertexBuffer::new()
            .with_array(POSITION, builder.positions.clone())
            .with_array(NORMAL, builder.positions)
            .with_array(TEXTURE_COORD, texture_coords)
            .with_indices(builder.indices))
    }
}
