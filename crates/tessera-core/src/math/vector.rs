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

//! Provides 2D, 3D, and 4D vector types and their associated operations.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// Implements the component-wise operators shared by every vector type.
macro_rules! impl_vector_ops {
    ($ty:ident { $($field:ident),+ }, $len:literal) => {
        impl Add for $ty {
            type Output = Self;
            /// Adds two vectors component-wise.
            #[inline]
            fn add(self, rhs: Self) -> Self::Output {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl AddAssign for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl Sub for $ty {
            type Output = Self;
            /// Subtracts two vectors component-wise.
            #[inline]
            fn sub(self, rhs: Self) -> Self::Output {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl SubAssign for $ty {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl Mul<f32> for $ty {
            type Output = Self;
            /// Multiplies the vector by a scalar.
            #[inline]
            fn mul(self, rhs: f32) -> Self::Output {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$ty> for f32 {
            type Output = $ty;
            /// Multiplies a scalar by a vector.
            #[inline]
            fn mul(self, rhs: $ty) -> Self::Output {
                rhs * self
            }
        }

        impl Mul<$ty> for $ty {
            type Output = Self;
            /// Multiplies two vectors component-wise (pairwise product).
            #[inline]
            fn mul(self, rhs: $ty) -> Self::Output {
                Self { $($field: self.$field * rhs.$field),+ }
            }
        }

        impl Div<f32> for $ty {
            type Output = Self;
            /// Divides the vector by a scalar.
            #[inline]
            fn div(self, rhs: f32) -> Self::Output {
                let inv_rhs = 1.0 / rhs;
                Self { $($field: self.$field * inv_rhs),+ }
            }
        }

        impl Neg for $ty {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self::Output {
                Self { $($field: -self.$field),+ }
            }
        }

        impl Index<usize> for $ty {
            type Output = f32;
            /// Allows accessing a vector component by index.
            ///
            /// # Panics
            /// Panics if `index` is out of range for this vector.
            #[inline]
            fn index(&self, index: usize) -> &Self::Output {
                let components: &[f32; $len] = bytemuck::cast_ref(self);
                &components[index]
            }
        }

        impl IndexMut<usize> for $ty {
            /// Allows mutably accessing a vector component by index.
            ///
            /// # Panics
            /// Panics if `index` is out of range for this vector.
            #[inline]
            fn index_mut(&mut self, index: usize) -> &mut Self::Output {
                let components: &mut [f32; $len] = bytemuck::cast_mut(self);
                &mut components[index]
            }
        }

        impl From<[f32; $len]> for $ty {
            #[inline]
            fn from(array: [f32; $len]) -> Self {
                bytemuck::cast(array)
            }
        }

        impl From<$ty> for [f32; $len] {
            #[inline]
            fn from(v: $ty) -> Self {
                bytemuck::cast(v)
            }
        }

        impl $ty {
            /// Calculates the dot product of this vector and another.
            #[inline]
            pub fn dot(&self, rhs: Self) -> f32 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            /// Calculates the squared length (magnitude) of the vector.
            #[inline]
            pub fn length_squared(&self) -> f32 {
                self.dot(*self)
            }

            /// Calculates the Euclidean length (magnitude) of the vector.
            #[inline]
            pub fn length(&self) -> f32 {
                self.length_squared().sqrt()
            }

            /// Returns the vector divided by its Euclidean length.
            ///
            /// There is no zero-length guard: normalizing a zero vector yields NaN
            /// components, which callers must avoid.
            #[inline]
            pub fn normalize(&self) -> Self {
                *self * (1.0 / self.length())
            }

            /// Blends towards `other`: `(1 - s) * self + s * other`.
            ///
            /// Unlike a clamped lerp, `s` outside `[0, 1]` extrapolates.
            #[inline]
            pub fn mix(&self, other: Self, s: f32) -> Self {
                Self { $($field: (1.0 - s) * self.$field + s * other.$field),+ }
            }

            /// Returns the components as an array.
            #[inline]
            pub fn to_array(self) -> [f32; $len] {
                self.into()
            }
        }
    };
}

// --- Vec2 ---

/// A 2-dimensional vector with `f32` components, mostly used for texture coordinates.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Vec2 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
}

impl Vec2 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    /// Creates a new `Vec2` with the specified components.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl_vector_ops!(Vec2 { x, y }, 2);

// --- Vec3 ---

/// A 3-dimensional vector with `f32` components.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Vec3 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
    /// The z component of the vector.
    pub z: f32,
}

impl Vec3 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// The unit vector pointing along the positive X-axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// The unit vector pointing along the positive Y-axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// The unit vector pointing along the positive Z-axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a new `Vec3` with the specified components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Computes the cross product of this vector and another.
    ///
    /// The result is perpendicular to both inputs and follows the right-hand rule.
    #[inline]
    pub fn cross(&self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Promotes the vector to homogeneous form.
    ///
    /// `w` is `1.0` for points (affected by translation) and `0.0` for directions.
    #[inline]
    pub fn to4(self, is_point: bool) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, if is_point { 1.0 } else { 0.0 })
    }

    /// Returns `true` if any component is NaN.
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl_vector_ops!(Vec3 { x, y, z }, 3);

// --- Vec4 ---

/// A 4-dimensional vector with `f32` components.
///
/// Used for homogeneous coordinates, light positions and RGBA colors.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Vec4 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
    /// The z component of the vector.
    pub z: f32,
    /// The w component of the vector.
    pub w: f32,
}

impl Vec4 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// The homogeneous origin point `(0, 0, 0, 1)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new `Vec4` with the specified components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates an RGBA color.
    #[inline]
    pub const fn color(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(r, g, b, a)
    }

    /// Parses a `#rrggbb` hex string into an RGBA color with the given alpha.
    ///
    /// The leading `#` is optional and digits are case-insensitive. Malformed input
    /// yields [`Vec4::ZERO`] rather than an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::math::Vec4;
    /// assert_eq!(Vec4::from_hex("#ffffff", 1.0), Vec4::ONE);
    /// assert_eq!(Vec4::from_hex("not a color", 1.0), Vec4::ZERO);
    /// ```
    pub fn from_hex(hex: &str, alpha: f32) -> Self {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::ZERO;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_or(0.0, |v| v as f32 / 255.0)
        };
        Self::new(channel(0..2), channel(2..4), channel(4..6), alpha)
    }

    /// Drops the `w` component.
    #[inline]
    pub fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl_vector_ops!(Vec4 { x, y, z, w }, 4);
