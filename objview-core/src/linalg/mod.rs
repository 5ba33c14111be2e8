/// Validated vector and 4x4 matrix primitives
///
/// Every operation checks its inputs before doing any arithmetic: wrong arity
/// and non-finite elements are rejected rather than propagated as NaN.
pub mod mat4;
pub mod vec3;

pub use mat4::Mat4;

use crate::error::LinalgError;

pub(crate) fn check_scalar(op: &'static str, arg: &'static str, value: f32) -> Result<f32, LinalgError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LinalgError::Value { op, arg, value })
    }
}

fn check_elements(op: &'static str, arg: &'static str, values: &[f32]) -> Result<(), LinalgError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(LinalgError::NonFinite {
            op,
            arg,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}
