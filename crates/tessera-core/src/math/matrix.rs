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

//! Provides a row-major, fixed-size matrix type and the 4x4 transform constructors.
//!
//! Matrices are stored as an ordered sequence of rows. A product `a * b` multiplies
//! the rows of `a` with the columns of `b`, so transforms compose right to left:
//! `translation * rotation * point` rotates first.

use super::{MathError, Vec3, Vec4, EPSILON};
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// An `R` x `C` matrix of `f32`, stored row by row.
///
/// Every row has exactly `C` entries; the shape is fixed by the type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const R: usize, const C: usize> {
    /// The rows of the matrix. `rows[0]` is the first row, and so on.
    pub rows: [[f32; C]; R],
}

/// A 4x4 transform matrix.
pub type Mat4 = Matrix<4, 4>;

impl<const R: usize, const C: usize> Matrix<R, C> {
    /// Creates a matrix from its rows.
    #[inline]
    pub const fn from_rows(rows: [[f32; C]; R]) -> Self {
        Self { rows }
    }

    /// A matrix with every entry set to `0.0`.
    #[inline]
    pub const fn zeros() -> Self {
        Self {
            rows: [[0.0; C]; R],
        }
    }

    /// Ones on the main diagonal, zeros elsewhere. Non-square shapes get as many
    /// ones as fit.
    pub fn identity() -> Self {
        let mut m = Self::zeros();
        for i in 0..R.min(C) {
            m.rows[i][i] = 1.0;
        }
        m
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    pub fn transpose(&self) -> Matrix<C, R> {
        let mut t = Matrix::<C, R>::zeros();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                t.rows[c][r] = *value;
            }
        }
        t
    }

    /// Multiplies the matrix by a column vector given as an array.
    pub fn mul_vec(&self, v: [f32; C]) -> [f32; R] {
        let mut out = [0.0; R];
        for (o, row) in out.iter_mut().zip(self.rows.iter()) {
            *o = row.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
        }
        out
    }

    /// Returns the entries in row order.
    pub fn flatten(&self) -> Vec<f32> {
        self.rows.iter().flatten().copied().collect()
    }
}

impl<const N: usize> Matrix<N, N> {
    /// Replaces `self` with `b * self`, keeping the same matrix object.
    ///
    /// Holders of a `&mut` to a transform observe the composed value without
    /// re-binding.
    pub fn pre_multiply(&mut self, b: &Self) -> &mut Self {
        *self = *b * *self;
        self
    }

    /// Replaces `self` with `self * b`, keeping the same matrix object.
    pub fn post_multiply(&mut self, b: &Self) -> &mut Self {
        *self = *self * *b;
        self
    }
}

impl<const R: usize, const C: usize> Default for Matrix<R, C> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const R: usize, const C: usize> Add for Matrix<R, C> {
    type Output = Self;
    /// Adds two matrices entry-wise.
    fn add(mut self, rhs: Self) -> Self::Output {
        for (row, rhs_row) in self.rows.iter_mut().zip(rhs.rows.iter()) {
            for (a, b) in row.iter_mut().zip(rhs_row.iter()) {
                *a += b;
            }
        }
        self
    }
}

impl<const R: usize, const C: usize> Sub for Matrix<R, C> {
    type Output = Self;
    /// Subtracts two matrices entry-wise.
    fn sub(mut self, rhs: Self) -> Self::Output {
        for (row, rhs_row) in self.rows.iter_mut().zip(rhs.rows.iter()) {
            for (a, b) in row.iter_mut().zip(rhs_row.iter()) {
                *a -= b;
            }
        }
        self
    }
}

impl<const R: usize, const C: usize> Mul<f32> for Matrix<R, C> {
    type Output = Self;
    /// Scales every entry.
    fn mul(mut self, rhs: f32) -> Self::Output {
        for value in self.rows.iter_mut().flatten() {
            *value *= rhs;
        }
        self
    }
}

impl<const R: usize, const C: usize, const K: usize> Mul<Matrix<C, K>> for Matrix<R, C> {
    type Output = Matrix<R, K>;
    /// Matrix product: rows of `self` times columns of `rhs`.
    fn mul(self, rhs: Matrix<C, K>) -> Self::Output {
        let mut out = Matrix::<R, K>::zeros();
        for r in 0..R {
            for k in 0..K {
                out.rows[r][k] = (0..C).map(|c| self.rows[r][c] * rhs.rows[c][k]).sum();
            }
        }
        out
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    /// Transforms a `Vec4` by this matrix.
    #[inline]
    fn mul(self, v: Vec4) -> Self::Output {
        self.mul_vec(v.into()).into()
    }
}

impl<const R: usize, const C: usize> Index<usize> for Matrix<R, C> {
    type Output = [f32; C];
    /// Allows accessing a matrix row by index.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

impl<const R: usize, const C: usize> IndexMut<usize> for Matrix<R, C> {
    /// Allows mutably accessing a matrix row by index.
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.rows[index]
    }
}

// --- Mat4 ---

impl Matrix<4, 4> {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Creates a rotation of `angle` radians around `axis`.
    ///
    /// The axis does not need to be normalized.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::math::{Mat4, Vec3, Vec4, FRAC_PI_2};
    /// let r = Mat4::rotation(FRAC_PI_2, Vec3::Z);
    /// let v = r * Vec4::new(1.0, 0.0, 0.0, 0.0);
    /// assert!((v.y - 1.0).abs() < 1e-6);
    /// ```
    pub fn rotation(angle: f32, axis: Vec3) -> Self {
        let Vec3 { x: i, y: j, z: k } = axis.normalize();
        let (s, c) = angle.sin_cos();
        let omc = 1.0 - c;
        Self::from_rows([
            [i * i * omc + c, i * j * omc - k * s, i * k * omc + j * s, 0.0],
            [i * j * omc + k * s, j * j * omc + c, j * k * omc - i * s, 0.0],
            [i * k * omc - j * s, j * k * omc + i * s, k * k * omc + c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a non-uniform scale.
    pub fn scale(v: Vec3) -> Self {
        Self::from_rows([
            [v.x, 0.0, 0.0, 0.0],
            [0.0, v.y, 0.0, 0.0],
            [0.0, 0.0, v.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation.
    pub fn translation(v: Vec3) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, v.x],
            [0.0, 1.0, 0.0, v.y],
            [0.0, 0.0, 1.0, v.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a right-handed view matrix for a camera at `eye` looking at `at`.
    ///
    /// The camera looks down its local `-Z` axis, so `at` lands on the negative Z
    /// axis at distance `|eye - at|`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DegenerateAxes`] when `up` is parallel to the viewing
    /// direction or `eye == at`.
    pub fn look_at(eye: Vec3, at: Vec3, up: Vec3) -> Result<Self, MathError> {
        let z = (at - eye).normalize();
        let side = z.cross(up);
        if side.is_nan() || side.length_squared() < EPSILON * EPSILON {
            return Err(MathError::DegenerateAxes);
        }
        let x = side.normalize();
        let y = x.cross(z).normalize();
        let z = -z;

        let basis = Self::from_rows([
            x.to4(false).into(),
            y.to4(false).into(),
            z.to4(false).into(),
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Ok(Self::translation(Vec3::new(-x.dot(eye), -y.dot(eye), -z.dot(eye))) * basis)
    }

    /// Creates a perspective projection mapping view depth to the `[-1, 1]` clip range.
    ///
    /// # Arguments
    ///
    /// * `fov_y`: Vertical field of view in radians.
    /// * `aspect`: Width divided by height of the viewport.
    /// * `near`, `far`: Distances to the clipping planes.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let d = far - near;
        Self::from_rows([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, -(near + far) / d, -2.0 * near * far / d],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Computes the determinant by cofactor expansion along the first column.
    pub fn determinant(&self) -> f32 {
        let adj = self.adjugate();
        let m = &self.rows;
        m[0][0] * adj.rows[0][0]
            + m[1][0] * adj.rows[0][1]
            + m[2][0] * adj.rows[0][2]
            + m[3][0] * adj.rows[0][3]
    }

    /// Computes the inverse with the closed-form adjugate formula.
    ///
    /// The determinant is not checked: a singular matrix yields infinite and NaN
    /// entries.
    pub fn inverse(&self) -> Self {
        let adj = self.adjugate();
        let m = &self.rows;
        let det = m[0][0] * adj.rows[0][0]
            + m[1][0] * adj.rows[0][1]
            + m[2][0] * adj.rows[0][2]
            + m[3][0] * adj.rows[0][3];
        adj * (1.0 / det)
    }

    fn adjugate(&self) -> Self {
        let [[m00, m01, m02, m03], [m10, m11, m12, m13], [m20, m21, m22, m23], [m30, m31, m32, m33]] =
            self.rows;
        Self::from_rows([
            [
                m12 * m23 * m31 - m13 * m22 * m31 + m13 * m21 * m32 - m11 * m23 * m32 - m12 * m21 * m33 + m11 * m22 * m33,
                m03 * m22 * m31 - m02 * m23 * m31 - m03 * m21 * m32 + m01 * m23 * m32 + m02 * m21 * m33 - m01 * m22 * m33,
                m02 * m13 * m31 - m03 * m12 * m31 + m03 * m11 * m32 - m01 * m13 * m32 - m02 * m11 * m33 + m01 * m12 * m33,
                m03 * m12 * m21 - m02 * m13 * m21 - m03 * m11 * m22 + m01 * m13 * m22 + m02 * m11 * m23 - m01 * m12 * m23,
            ],
            [
                m13 * m22 * m30 - m12 * m23 * m30 - m13 * m20 * m32 + m10 * m23 * m32 + m12 * m20 * m33 - m10 * m22 * m33,
                m02 * m23 * m30 - m03 * m22 * m30 + m03 * m20 * m32 - m00 * m23 * m32 - m02 * m20 * m33 + m00 * m22 * m33,
                m03 * m12 * m30 - m02 * m13 * m30 - m03 * m10 * m32 + m00 * m13 * m32 + m02 * m10 * m33 - m00 * m12 * m33,
                m02 * m13 * m20 - m03 * m12 * m20 + m03 * m10 * m22 - m00 * m13 * m22 - m02 * m10 * m23 + m00 * m12 * m23,
            ],
            [
                m11 * m23 * m30 - m13 * m21 * m30 + m13 * m20 * m31 - m10 * m23 * m31 - m11 * m20 * m33 + m10 * m21 * m33,
                m03 * m21 * m30 - m01 * m23 * m30 - m03 * m20 * m31 + m00 * m23 * m31 + m01 * m20 * m33 - m00 * m21 * m33,
                m01 * m13 * m30 - m03 * m11 * m30 + m03 * m10 * m31 - m00 * m13 * m31 - m01 * m10 * m33 + m00 * m11 * m33,
                m03 * m11 * m20 - m01 * m13 * m20 - m03 * m10 * m21 + m00 * m13 * m21 + m01 * m10 * m23 - m00 * m11 * m23,
            ],
            [
                m12 * m21 * m30 - m11 * m22 * m30 - m12 * m20 * m31 + m10 * m22 * m31 + m11 * m20 * m32 - m10 * m21 * m32,
                m01 * m22 * m30 - m02 * m21 * m30 + m02 * m20 * m31 - m00 * m22 * m31 - m01 * m20 * m32 + m00 * m21 * m32,
                m02 * m11 * m30 - m01 * m12 * m30 - m02 * m10 * m31 + m00 * m12 * m31 + m01 * m10 * m32 - m00 * m11 * m32,
                m01 * m12 * m20 - m02 * m11 * m20 + m02 * m10 * m21 - m00 * m12 * m21 - m01 * m10 * m22 + m00 * m11 * m22,
            ],
        ])
    }

    /// Returns the entries in column-major order, the layout shader uniforms expect.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (c, chunk) in out.chunks_exact_mut(4).enumerate() {
            for (r, value) in chunk.iter_mut().enumerate() {
                *value = self.rows[r][c];
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, approx_eq_eps, FRAC_PI_2, FRAC_PI_4, PI};

    fn mat4_approx_eq(a: &Mat4, b: &Mat4) -> bool {
        a.rows
            .iter()
            .flatten()
            .zip(b.rows.iter().flatten())
            .all(|(x, y)| approx_eq_eps(*x, *y, 1e-4))
    }

    fn vec4_approx_eq(a: Vec4, b: Vec4) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z) && approx_eq(a.w, b.w)
    }

    #[test]
    fn test_identity() {
        assert_eq!(Mat4::identity(), Mat4::IDENTITY);
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
        let v = Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(Mat4::IDENTITY * v, v);
    }

    #[test]
    fn test_non_square_product() {
        let a = Matrix::<2, 3>::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let b = Matrix::<3, 2>::from_rows([[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]);
        let p = a * b;
        assert_eq!(p.rows, [[58.0, 64.0], [139.0, 154.0]]);
        assert_eq!(a.transpose().rows, [[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]);
        assert_eq!(a.mul_vec([1.0, 0.0, -1.0]), [-2.0, -2.0]);
    }

    #[test]
    fn test_add_sub_scale() {
        let a = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        let sum = a + Mat4::IDENTITY;
        assert_eq!(sum.rows[0], [2.0, 0.0, 0.0, 1.0]);
        assert_eq!(sum - Mat4::IDENTITY, a);
        assert_eq!((Mat4::IDENTITY * 3.0).rows[2][2], 3.0);
    }

    #[test]
    fn test_translation_and_scale() {
        let p = Vec3::new(1.0, 1.0, 1.0).to4(true);
        let t = Mat4::translation(Vec3::new(2.0, -1.0, 0.5));
        assert_eq!(t * p, Vec4::new(3.0, 0.0, 1.5, 1.0));
        // Directions ignore translation.
        assert_eq!(t * Vec3::X.to4(false), Vec4::new(1.0, 0.0, 0.0, 0.0));
        let s = Mat4::scale(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(s * p, Vec4::new(2.0, 3.0, 4.0, 1.0));
    }

    #[test]
    fn test_rotation() {
        let rz = Mat4::rotation(FRAC_PI_2, Vec3::Z);
        assert!(vec4_approx_eq(rz * Vec4::new(1.0, 0.0, 0.0, 0.0), Vec4::new(0.0, 1.0, 0.0, 0.0)));
        let rx = Mat4::rotation(FRAC_PI_2, Vec3::new(3.0, 0.0, 0.0));
        assert!(vec4_approx_eq(rx * Vec4::new(0.0, 1.0, 0.0, 0.0), Vec4::new(0.0, 0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_pre_and_post_multiply_in_place() {
        let t = Mat4::translation(Vec3::new(1.0, 0.0, 0.0));
        let r = Mat4::rotation(PI / 3.0, Vec3::Y);

        let mut m = t;
        m.post_multiply(&r);
        assert!(mat4_approx_eq(&m, &(t * r)));

        let mut m = t;
        m.pre_multiply(&r);
        assert!(mat4_approx_eq(&m, &(r * t)));

        // Chaining keeps operating on the same object.
        let mut m = Mat4::IDENTITY;
        m.post_multiply(&t).post_multiply(&t);
        assert_eq!(m.rows[0][3], 2.0);
    }

    #[test]
    fn test_inverse() {
        let transforms = [
            Mat4::translation(Vec3::new(1.0, -2.0, 3.0)),
            Mat4::rotation(0.7, Vec3::new(1.0, 2.0, 3.0)) * Mat4::scale(Vec3::new(2.0, 0.5, 3.0)),
            Mat4::translation(Vec3::new(-4.0, 0.0, 2.0))
                * Mat4::rotation(FRAC_PI_4, Vec3::X)
                * Mat4::scale(Vec3::new(0.25, 0.25, 0.25)),
            Mat4::perspective(FRAC_PI_4, 16.0 / 9.0, 1.0, 100.0),
        ];
        for m in transforms {
            let inv = m.inverse();
            assert!(mat4_approx_eq(&(m * inv), &Mat4::IDENTITY), "M * inv(M) should be identity");
            assert!(mat4_approx_eq(&(inv * m), &Mat4::IDENTITY));
        }
    }

    #[test]
    fn test_determinant() {
        assert!(approx_eq(Mat4::IDENTITY.determinant(), 1.0));
        assert!(approx_eq(Mat4::scale(Vec3::new(2.0, 3.0, 4.0)).determinant(), 24.0));
        assert!(approx_eq(Mat4::rotation(1.1, Vec3::Y).determinant(), 1.0));
    }

    #[test]
    fn test_singular_inverse_is_not_finite() {
        let singular = Mat4::scale(Vec3::new(1.0, 0.0, 1.0));
        let inv = singular.inverse();
        assert!(inv.rows.iter().flatten().any(|v| !v.is_finite()));
    }

    #[test]
    fn test_look_at() {
        let eye = Vec3::new(0.0, 10.0, 20.0);
        let at = Vec3::ZERO;
        let view = Mat4::look_at(eye, at, Vec3::Y).expect("valid camera axes");

        let target = view * at.to4(true);
        let distance = (eye - at).length();
        assert!(vec4_approx_eq(target, Vec4::new(0.0, 0.0, -distance, 1.0)));

        // The eye maps to the view-space origin.
        assert!(vec4_approx_eq(view * eye.to4(true), Vec4::new(0.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_look_at_invalid() {
        let eye = Vec3::new(0.0, 10.0, 20.0);
        let at = Vec3::ZERO;
        let parallel_up = at - eye;
        assert_eq!(
            Mat4::look_at(eye, at, parallel_up),
            Err(MathError::DegenerateAxes)
        );
        assert_eq!(
            Mat4::look_at(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Y),
            Err(MathError::DegenerateAxes)
        );
        assert_eq!(Mat4::look_at(eye, eye, Vec3::Y), Err(MathError::DegenerateAxes));
    }

    #[test]
    fn test_perspective() {
        let (near, far) = (1.0, 100.0);
        let p = Mat4::perspective(FRAC_PI_4, 16.0 / 9.0, near, far);
        let f = 1.0 / (FRAC_PI_4 / 2.0).tan();
        assert!(approx_eq(p.rows[1][1], f));
        assert!(approx_eq(p.rows[0][0], f * 9.0 / 16.0));
        assert_eq!(p.rows[3], [0.0, 0.0, -1.0, 0.0]);

        // Near plane maps to -1, far plane to +1 after the perspective divide.
        let n = p * Vec4::new(0.0, 0.0, -near, 1.0);
        assert!(approx_eq(n.z / n.w, -1.0));
        let fp = p * Vec4::new(0.0, 0.0, -far, 1.0);
        assert!(approx_eq_eps(fp.z / fp.w, 1.0, 1e-4));
    }

    #[test]
    fn test_to_cols_array() {
        let t = Mat4::translation(Vec3::new(5.0, 6.0, 7.0));
        let cols = t.to_cols_array();
        assert_eq!(&cols[12..16], &[5.0, 6.0, 7.0, 1.0]);
        assert_eq!(t.flatten()[3], 5.0);
    }
}
