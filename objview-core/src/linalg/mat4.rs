/// 4x4 matrix operations in row-major order
///
/// Matrices follow the row-vector convention: a point transforms as
/// `p' = p · M`, translation lives in row 3 and `multiply(a, b)` applies `a`
/// first. The 16-element arrays produced by [`Mat4::to_row_major`] are the
/// exact layout written into GPU buffers.
use std::fmt;

use nalgebra::{Matrix4, RowVector4};

use super::{check_elements, check_scalar};
use crate::error::LinalgError;

pub const MAT4_SIZE: usize = 16;

/// A 4x4 matrix stored row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(Matrix4<f32>);

impl Mat4 {
    /// Build from 16 row-major elements, rejecting wrong arity and
    /// non-finite values.
    pub fn from_row_major(values: &[f32]) -> Result<Self, LinalgError> {
        Self::from_slice("from_row_major", "matrix", values)
    }

    fn from_slice(op: &'static str, arg: &'static str, values: &[f32]) -> Result<Self, LinalgError> {
        if values.len() != MAT4_SIZE {
            return Err(LinalgError::Shape {
                op,
                arg,
                expected: MAT4_SIZE,
                found: values.len(),
            });
        }
        check_elements(op, arg, values)?;
        Ok(Mat4(Matrix4::from_row_slice(values)))
    }

    pub fn to_row_major(&self) -> [f32; MAT4_SIZE] {
        let mut out = [0.0; MAT4_SIZE];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = self.0[(row, col)];
            }
        }
        out
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[(row, col)]
    }

    /// Transform a point as the row vector `[x, y, z, 1]`, returning the
    /// homogeneous result.
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 4] {
        let out = RowVector4::new(p[0], p[1], p[2], 1.0) * self.0;
        [out[0], out[1], out[2], out[3]]
    }

    /// Transform a direction (`w = 0`), ignoring translation.
    pub fn transform_direction(&self, d: [f32; 3]) -> [f32; 3] {
        let out = RowVector4::new(d[0], d[1], d[2], 0.0) * self.0;
        [out[0], out[1], out[2]]
    }

    fn check(&self, op: &'static str, arg: &'static str) -> Result<(), LinalgError> {
        check_elements(op, arg, self.0.as_slice())
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            if row > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:.2} {:.2} {:.2} {:.2}",
                self.0[(row, 0)],
                self.0[(row, 1)],
                self.0[(row, 2)],
                self.0[(row, 3)]
            )?;
        }
        Ok(())
    }
}

pub fn identity() -> Mat4 {
    Mat4(Matrix4::identity())
}

pub fn translation(tx: f32, ty: f32, tz: f32) -> Result<Mat4, LinalgError> {
    check_scalar("translation", "tx", tx)?;
    check_scalar("translation", "ty", ty)?;
    check_scalar("translation", "tz", tz)?;

    #[rustfmt::skip]
    let m = Matrix4::from_row_slice(&[
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        tx,  ty,  tz,  1.0,
    ]);
    Ok(Mat4(m))
}

pub fn rotation_x(angle: f32) -> Result<Mat4, LinalgError> {
    check_scalar("rotation_x", "angle", angle)?;
    let (s, c) = angle.sin_cos();

    #[rustfmt::skip]
    let m = Matrix4::from_row_slice(&[
        1.0, 0.0, 0.0, 0.0,
        0.0, c,   s,   0.0,
        0.0, -s,  c,   0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);
    Ok(Mat4(m))
}

pub fn rotation_y(angle: f32) -> Result<Mat4, LinalgError> {
    check_scalar("rotation_y", "angle", angle)?;
    let (s, c) = angle.sin_cos();

    #[rustfmt::skip]
    let m = Matrix4::from_row_slice(&[
        c,   0.0, -s,  0.0,
        0.0, 1.0, 0.0, 0.0,
        s,   0.0, c,   0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);
    Ok(Mat4(m))
}

/// Row-major product: `out[r][c] = Σ a[r][k] · b[k][c]`.
pub fn multiply(a: &Mat4, b: &Mat4) -> Result<Mat4, LinalgError> {
    a.check("multiply", "first matrix")?;
    b.check("multiply", "second matrix")?;
    Ok(Mat4(a.0 * b.0))
}

/// Right-handed perspective projection with clip-space depth in [-1, 1].
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<Mat4, LinalgError> {
    check_scalar("perspective", "fov_y", fov_y)?;
    check_scalar("perspective", "aspect", aspect)?;
    check_scalar("perspective", "near", near)?;
    check_scalar("perspective", "far", far)?;

    let range = |message: String| LinalgError::Range {
        op: "perspective",
        message,
    };

    if fov_y <= 0.0 || fov_y >= std::f32::consts::PI {
        return Err(range(format!("fov_y must be between 0 and π radians, got {fov_y}")));
    }
    if aspect <= 0.0 {
        return Err(range(format!("aspect ratio must be positive, got {aspect}")));
    }
    if near <= 0.0 || far <= 0.0 {
        return Err(range(format!(
            "near and far planes must be positive, got near={near}, far={far}"
        )));
    }
    if near >= far {
        return Err(range(format!(
            "near plane must be less than far plane, got near={near}, far={far}"
        )));
    }

    let f = 1.0 / (fov_y / 2.0).tan();
    let range_inv = 1.0 / (near - far);

    #[rustfmt::skip]
    let m = Matrix4::from_row_slice(&[
        f / aspect, 0.0, 0.0,                           0.0,
        0.0,        f,   0.0,                           0.0,
        0.0,        0.0, (far + near) * range_inv,      -1.0,
        0.0,        0.0, 2.0 * far * near * range_inv,  0.0,
    ]);
    Ok(Mat4(m))
}

pub fn transpose(m: &Mat4) -> Result<Mat4, LinalgError> {
    m.check("transpose", "matrix")?;
    Ok(Mat4(m.0.transpose()))
}

/// Left-multiply a uniform scale onto `m`.
pub fn scale(m: &Mat4, factor: f32) -> Result<Mat4, LinalgError> {
    m.check("scale", "matrix")?;
    check_scalar("scale", "factor", factor)?;

    let s = Mat4(Matrix4::new_nonuniform_scaling(&nalgebra::Vector3::new(
        factor, factor, factor,
    )));
    multiply(&s, m)
}
