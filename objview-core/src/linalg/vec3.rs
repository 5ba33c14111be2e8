/// 3-component vector operations
use nalgebra::Vector3;

use super::check_elements;
use crate::error::LinalgError;

/// Build a vector from a slice, rejecting anything but three finite floats.
pub fn from_slice(op: &'static str, arg: &'static str, values: &[f32]) -> Result<Vector3<f32>, LinalgError> {
    if values.len() != 3 {
        return Err(LinalgError::Shape {
            op,
            arg,
            expected: 3,
            found: values.len(),
        });
    }
    check_elements(op, arg, values)?;
    Ok(Vector3::new(values[0], values[1], values[2]))
}

fn check(op: &'static str, arg: &'static str, v: &Vector3<f32>) -> Result<(), LinalgError> {
    check_elements(op, arg, v.as_slice())
}

/// Scale `v` to unit length.
///
/// Fails with [`LinalgError::Domain`] when the magnitude is at or below
/// `f32::EPSILON`.
pub fn normalize(v: &Vector3<f32>) -> Result<Vector3<f32>, LinalgError> {
    check("normalize", "input", v)?;

    let len = v.norm();
    if len <= f32::EPSILON {
        return Err(LinalgError::Domain {
            op: "normalize",
            vector: [v.x, v.y, v.z],
        });
    }

    Ok(v / len)
}

pub fn cross(a: &Vector3<f32>, b: &Vector3<f32>) -> Result<Vector3<f32>, LinalgError> {
    check("cross", "first", a)?;
    check("cross", "second", b)?;
    Ok(a.cross(b))
}

pub fn add(a: &Vector3<f32>, b: &Vector3<f32>) -> Result<Vector3<f32>, LinalgError> {
    check("add", "first", a)?;
    check("add", "second", b)?;
    Ok(a + b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &Vector3<f32>, b: &Vector3<f32>) -> bool {
        (a - b).norm() < 1e-6
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = normalize(&Vector3::new(3.0, 0.0, 4.0)).unwrap();
        assert!(close(&n, &Vector3::new(0.6, 0.0, 0.8)));
    }

    #[test]
    fn test_normalize_idempotent() {
        for v in [
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-0.001, 0.0, 0.002),
            Vector3::new(1e4, -2e4, 5.0),
        ] {
            let once = normalize(&v).unwrap();
            let twice = normalize(&once).unwrap();
            assert!(close(&once, &twice));
        }
    }

    #[test]
    fn test_normalize_zero_is_domain_error() {
        let err = normalize(&Vector3::zeros()).unwrap_err();
        assert!(matches!(err, LinalgError::Domain { op: "normalize", .. }));
    }

    #[test]
    fn test_normalize_rejects_nan() {
        let err = normalize(&Vector3::new(f32::NAN, 1.0, 0.0)).unwrap_err();
        assert!(matches!(err, LinalgError::NonFinite { index: 0, .. }));
    }

    #[test]
    fn test_cross_right_handed() {
        let z = cross(&Vector3::x(), &Vector3::y()).unwrap();
        assert!(close(&z, &Vector3::z()));
    }

    #[test]
    fn test_cross_and_add_reject_infinite() {
        let bad = Vector3::new(0.0, f32::INFINITY, 0.0);
        assert!(matches!(
            cross(&Vector3::x(), &bad),
            Err(LinalgError::NonFinite { arg: "second", index: 1, .. })
        ));
        assert!(matches!(
            add(&bad, &Vector3::x()),
            Err(LinalgError::NonFinite { arg: "first", .. })
        ));
    }

    #[test]
    fn test_from_slice_arity() {
        assert!(matches!(
            from_slice("add", "first", &[1.0, 2.0]),
            Err(LinalgError::Shape { expected: 3, found: 2, .. })
        ));
        assert_eq!(
            from_slice("add", "first", &[1.0, 2.0, 3.0]).unwrap(),
            Vector3::new(1.0, 2.0, 3.0)
        );
    }
}
