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

//! # Tessera Data
//!
//! Geometry as the renderer consumes it: named vertex attribute columns plus an
//! index list, staged once per rendering context, and the procedural shapes built
//! from them.

#![warn(missing_docs)]

pub mod geometry;
pub mod shapes;

pub use geometry::{GeometryError, VertexArray, VertexBuffer};
pub use shapes::{
    insert_transformed_copy_into, AxisArrows, ClosedCone, Cube, CylindricalTube, Shape, Square,
    SubdivisionSphere,
};
