/// Pointer-drag orbit, zoom and light controls
///
/// Translates raw input events into [`TransformState`] updates. This is the
/// only writer of the state; the composer only reads it.
use crate::config::InputConfig;
use crate::transform::TransformState;

#[derive(Debug, Clone)]
pub struct OrbitController {
    config: InputConfig,
    radius: f32,
    drag_origin: Option<(f32, f32)>,
}

impl OrbitController {
    pub fn new(config: InputConfig, radius: f32) -> Self {
        Self {
            config,
            radius,
            drag_origin: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    pub fn press(&mut self, x: f32, y: f32) {
        self.drag_origin = Some((x, y));
    }

    /// Horizontal motion spins about Y, vertical motion tilts about X.
    pub fn drag_to(&mut self, state: &mut TransformState, x: f32, y: f32) {
        let Some((last_x, last_y)) = self.drag_origin else {
            return;
        };

        let sensitivity = self.config.drag_sensitivity;
        state.rotate((y - last_y) * sensitivity, (x - last_x) * sensitivity);
        self.drag_origin = Some((x, y));
    }

    pub fn release(&mut self) {
        self.drag_origin = None;
    }

    /// Closest and farthest allowed camera distances.
    pub fn zoom_range(&self) -> (f32, f32) {
        (self.radius * self.config.min_zoom, self.radius * self.config.max_zoom)
    }

    pub fn zoom_in(&mut self, state: &mut TransformState) {
        self.zoom_by(state, -1.0);
    }

    pub fn zoom_out(&mut self, state: &mut TransformState) {
        self.zoom_by(state, 1.0);
    }

    fn zoom_by(&mut self, state: &mut TransformState, direction: f32) {
        // Nothing loaded yet
        if self.radius <= 0.0 {
            return;
        }

        let (min, max) = self.zoom_range();
        let step = self.radius * self.config.zoom_step;
        state.camera_z = (state.camera_z + direction * step).clamp(min, max);
    }

    /// Turn the light around Y, wrapping into `[0, 360)`.
    pub fn orbit_light(&mut self, state: &mut TransformState, steps: f32) {
        let azimuth = state.light.azimuth + steps * self.config.light_step;
        state.light.azimuth = azimuth.rem_euclid(360.0);
    }

    /// Raise or lower the light, clamped to the poles.
    pub fn raise_light(&mut self, state: &mut TransformState, steps: f32) {
        let elevation = state.light.elevation + steps * self.config.light_step;
        state.light.elevation = elevation.clamp(-90.0, 90.0);
    }
}
