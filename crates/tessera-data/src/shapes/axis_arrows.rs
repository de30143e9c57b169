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

use super::{
    insert_transformed_copy_into, ClosedCone, Cube, CylindricalTube, Shape, SubdivisionSphere,
};
use crate::geometry::{GeometryError, VertexBuffer};
use tessera_core::math::{Mat4, Vec3, FRAC_PI_2};

/// Three axis arrows around a small sphere, for visualising a transform.
///
/// Each axis is a tube ending in a cone, with three thin bars beside it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisArrows;

impl AxisArrows {
    fn draw_one_axis(recipient: &mut VertexBuffer, transform: &Mat4) -> Result<(), GeometryError> {
        let at = |offset: Vec3, scale: Vec3| {
            *transform * Mat4::translation(offset) * Mat4::scale(scale)
        };

        insert_transformed_copy_into(
            recipient,
            &ClosedCone::new(4, 10),
            &at(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.25, 0.25, 0.25)),
        )?;
        insert_transformed_copy_into(
            recipient,
            &Cube,
            &at(Vec3::new(0.95, 0.95, 0.45), Vec3::new(0.05, 0.05, 0.45)),
        )?;
        insert_transformed_copy_into(
            recipient,
            &Cube,
            &at(Vec3::new(0.95, 0.0, 0.5), Vec3::new(0.05, 0.05, 0.4)),
        )?;
        insert_transformed_copy_into(
            recipient,
            &Cube,
            &at(Vec3::new(0.0, 0.95, 0.5), Vec3::new(0.05, 0.05, 0.4)),
        )?;
        insert_transformed_copy_into(
            recipient,
            &CylindricalTube::new(7, 7),
            &at(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.1, 0.1, 2.0)),
        )
    }
}

impl Shape for AxisArrows {
    fn build(&self) -> Result<VertexBuffer, GeometryError> {
        let mut arrows = VertexBuffer::new();
        insert_transformed_copy_into(
            &mut arrows,
            &SubdivisionSphere::new(3),
            &(Mat4::rotation(FRAC_PI_2, Vec3::Y) * Mat4::scale(Vec3::new(0.25, 0.25, 0.25))),
        )?;
        Self::draw_one_axis(&mut arrows, &Mat4::IDENTITY)?;
        Self::draw_one_axis(
            &mut arrows,
            &(Mat4::rotation(-FRAC_PI_2, Vec3::X) * Mat4::scale(Vec3::new(1.0, -1.0, 1.0))),
        )?;
        Self::draw_one_axis(
            &mut arrows,
            &(Mat4::rotation(FRAC_PI_2, Vec3::Y) * Mat4::scale(Vec3::new(-1.0, 1.0, 1.0))),
        )?;
        Ok(arrows)
    }
}
