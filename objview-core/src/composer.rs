/// Per-frame model/view/projection composition
///
/// Pure computation over a borrowed [`TransformState`]; nothing is cached
/// between frames. Invalid numeric state surfaces as a [`LinalgError`].
use nalgebra::Vector3;

use crate::error::LinalgError;
use crate::geometry::MeshBounds;
use crate::linalg::{check_scalar, mat4, Mat4};
use crate::projection::{Projection, Viewport};
use crate::transform::{LightParams, TransformState};

/// The matrices and positions derived for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub mvp: Mat4,
    pub camera_position: Vector3<f32>,
    pub light_position: Vector3<f32>,
}

/// Center the mesh at the origin, then apply the accumulated rotation.
pub fn model_matrix(state: &TransformState, center: &Vector3<f32>) -> Result<Mat4, LinalgError> {
    let to_origin = mat4::translation(-center.x, -center.y, -center.z)?;
    let rotation = mat4::multiply(&mat4::rotation_x(state.rot_x)?, &mat4::rotation_y(state.rot_y)?)?;
    mat4::multiply(&to_origin, &rotation)
}

/// Camera sits on +Z looking down -Z.
pub fn view_matrix(state: &TransformState) -> Result<Mat4, LinalgError> {
    mat4::translation(0.0, 0.0, -state.camera_z)
}

/// Place the light on a sphere of `radius × distance` around the origin.
///
/// Azimuth turns around +Y starting at +X; elevation rises from the XZ
/// plane, so an elevation of 90 degrees is the +Y pole for every azimuth.
pub fn light_position(light: &LightParams, radius: f32) -> Result<Vector3<f32>, LinalgError> {
    light.validate()?;
    check_scalar("light_position", "radius", radius)?;

    let theta = light.azimuth.to_radians();
    let phi = light.elevation.to_radians();
    let distance = radius * light.distance;

    Ok(Vector3::new(
        distance * phi.cos() * theta.cos(),
        distance * phi.sin(),
        distance * phi.cos() * theta.sin(),
    ))
}

/// Derive every per-frame transform from the current state.
///
/// The material is checked here too, so a successful result can always be
/// packed into a [`UniformBlock`](crate::uniforms::UniformBlock).
pub fn compose(
    state: &TransformState,
    bounds: &MeshBounds,
    viewport: Viewport,
    projection: &Projection,
) -> Result<FrameTransforms, LinalgError> {
    state.material.validate()?;
    let light_position = light_position(&state.light, bounds.radius)?;

    let model = model_matrix(state, &bounds.center)?;
    let view = view_matrix(state)?;
    let proj = projection.matrix(viewport.aspect())?;
    let mvp = mat4::multiply(&mat4::multiply(&model, &view)?, &proj)?;

    Ok(FrameTransforms {
        model,
        view,
        projection: proj,
        mvp,
        camera_position: Vector3::new(0.0, 0.0, state.camera_z),
        light_position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn bounds(center: Vector3<f32>, radius: f32) -> MeshBounds {
        MeshBounds { center, radius }
    }

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_light_at_pole_is_azimuth_invariant() {
        for azimuth in [0.0, 90.0, 217.0] {
            let light = LightParams {
                azimuth,
                elevation: 90.0,
                distance: 1.0,
            };
            assert!(close(light_position(&light, 1.0).unwrap(), Vector3::new(0.0, 1.0, 0.0)));
        }
    }

    #[test]
    fn test_light_on_horizon() {
        let east = LightParams {
            azimuth: 0.0,
            elevation: 0.0,
            distance: 2.0,
        };
        assert!(close(light_position(&east, 1.5).unwrap(), Vector3::new(3.0, 0.0, 0.0)));

        let south = LightParams {
            azimuth: 90.0,
            ..east
        };
        assert!(close(light_position(&south, 1.5).unwrap(), Vector3::new(0.0, 0.0, 3.0)));
    }

    #[test]
    fn test_model_centers_mesh() {
        let state = TransformState::new(5.0);
        let model = model_matrix(&state, &Vector3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(model.transform_point([1.0, 2.0, 3.0]), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_model_rotates_after_centering() {
        let mut state = TransformState::new(5.0);
        state.rot_y = FRAC_PI_2;
        let model = model_matrix(&state, &Vector3::new(1.0, 0.0, 0.0)).unwrap();

        // (2, 0, 0) centers to (1, 0, 0), then rotation_y turns +X into -Z
        let p = model.transform_point([2.0, 0.0, 0.0]);
        assert!(close(Vector3::new(p[0], p[1], p[2]), Vector3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_compose_mvp_order() {
        let mut state = TransformState::new(4.0);
        state.rotate(0.3, -0.7);
        let frame = compose(
            &state,
            &bounds(Vector3::new(0.5, -1.0, 2.0), 2.0),
            Viewport::new(640, 480),
            &Projection::default(),
        )
        .unwrap();

        let expected = mat4::multiply(&mat4::multiply(&frame.model, &frame.view).unwrap(), &frame.projection).unwrap();
        assert_eq!(frame.mvp, expected);
        assert_eq!(frame.camera_position, Vector3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn test_centered_point_lands_in_middle_of_screen() {
        let state = TransformState::new(5.0);
        let viewport = Viewport::new(200, 100);
        let frame = compose(
            &state,
            &bounds(Vector3::new(3.0, 3.0, 3.0), 1.0),
            viewport,
            &Projection::default(),
        )
        .unwrap();

        let clip = frame.mvp.transform_point([3.0, 3.0, 3.0]);
        let (x, y, _) = viewport.clip_to_screen(clip).unwrap();
        assert!((x - 100.0).abs() < 1e-3);
        assert!((y - 50.0).abs() < 1e-3);
        // Camera 5 units away: w is the view-space distance
        assert!((clip[3] - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_state_fails_loudly() {
        let mut state = TransformState::new(5.0);
        state.rot_x = f32::NAN;
        let err = compose(
            &state,
            &bounds(Vector3::zeros(), 1.0),
            Viewport::default(),
            &Projection::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LinalgError::Value { op: "rotation_x", .. }));

        let state = TransformState::new(5.0);
        let err = compose(
            &state,
            &bounds(Vector3::zeros(), 1.0),
            Viewport::new(0, 100),
            &Projection::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LinalgError::Range { op: "perspective", .. }));
    }

    #[test]
    fn test_non_finite_light_and_material_rejected() {
        let compose_default = |state: &TransformState| {
            compose(
                state,
                &bounds(Vector3::zeros(), 1.0),
                Viewport::default(),
                &Projection::default(),
            )
        };

        let mut state = TransformState::new(5.0);
        state.light.azimuth = f32::NAN;
        assert!(matches!(
            compose_default(&state),
            Err(LinalgError::Value { op: "light_position", arg: "azimuth", .. })
        ));

        let mut state = TransformState::new(5.0);
        state.material.specular_power = f32::INFINITY;
        assert!(matches!(
            compose_default(&state),
            Err(LinalgError::Value { op: "material", arg: "specular_power", .. })
        ));

        assert!(light_position(&LightParams::default(), f32::NAN).is_err());
    }
}
