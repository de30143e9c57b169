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

//! Provides the linear-algebra kernel that drives model, view and projection math.
//!
//! The kernel is deliberately small: fixed-size vectors, row-major matrices of any
//! size, and the handful of 4x4 constructors a renderer needs (rotation, scale,
//! translation, look-at, perspective and the closed-form inverse).
//!
//! All angular functions in this module operate in **radians**.
//!
//! Degenerate inputs are not guarded: normalizing a zero-length vector or inverting
//! a singular matrix produces NaN components that flow into later transforms. The
//! one exception is [`Mat4::look_at`], which reports [`MathError::DegenerateAxes`].

use std::fmt;

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

// --- Declare Sub-Modules ---

pub mod matrix;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::matrix::{Mat4, Matrix};
pub use self::vector::{Vec2, Vec3, Vec4};

/// An error raised by a math constructor that cannot produce a meaningful result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// `look_at` was given an up vector parallel to the viewing direction, or an
    /// eye position equal to the target, so no camera basis exists.
    DegenerateAxes,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::DegenerateAxes => write!(f, "Two parallel vectors were given"),
        }
    }
}

impl std::error::Error for MathError {}

// --- Utility Functions ---

/// Performs an approximate equality comparison between two floats with a custom tolerance.
///
/// # Examples
///
/// ```
/// use tessera_core::math::approx_eq_eps;
/// assert!(approx_eq_eps(0.001, 0.002, 1e-2));
/// assert!(!approx_eq_eps(0.001, 0.002, 1e-4));
/// ```
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Performs an approximate equality comparison using the module's default [`EPSILON`].
///
/// # Examples
///
/// ```
/// use tessera_core::math::{approx_eq, EPSILON};
/// assert!(approx_eq(1.0, 1.0 + EPSILON / 2.0));
/// assert!(!approx_eq(1.0, 1.0 + EPSILON * 2.0));
/// ```
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}
