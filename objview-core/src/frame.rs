/// Frame driver between the composer and a rendering backend
use tracing::{error, trace};

use crate::composer;
use crate::error::Error;
use crate::geometry::Mesh;
use crate::projection::{Projection, Viewport};
use crate::transform::TransformState;
use crate::uniforms::UniformBlock;

/// Something that can draw the mesh with a packed uniform block.
///
/// The backend owns every GPU (or terminal) resource; the core only hands
/// it plain data.
pub trait RenderBackend {
    /// Current render target size.
    fn viewport(&self) -> Viewport;

    /// Upload `uniforms` and draw `mesh`.
    fn submit(&mut self, uniforms: &UniformBlock, mesh: &Mesh) -> Result<(), Error>;
}

/// Result of a single tick.
#[derive(Debug)]
pub enum FrameOutcome {
    Rendered,
    /// The frame was dropped; the loop keeps going.
    Failed(Error),
}

/// Drives one frame per tick and keeps going when a frame fails.
pub struct FrameLoop {
    mesh: Mesh,
    projection: Projection,
    frame_count: u64,
    failed_frames: u64,
}

impl FrameLoop {
    pub fn new(mesh: Mesh, projection: Projection) -> Self {
        Self {
            mesh,
            projection,
            frame_count: 0,
            failed_frames: 0,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }

    /// Compose the uniforms for the current state without submitting.
    pub fn uniforms(&self, state: &TransformState, viewport: Viewport) -> Result<UniformBlock, Error> {
        let frame = composer::compose(state, &self.mesh.bounds(), viewport, &self.projection)?;
        Ok(UniformBlock::new(&frame, &state.material))
    }

    /// Run one frame. Failures are logged and reported but never stop the
    /// caller's loop.
    pub fn tick<B: RenderBackend>(&mut self, state: &TransformState, backend: &mut B) -> FrameOutcome {
        self.frame_count += 1;

        let result = self
            .uniforms(state, backend.viewport())
            .and_then(|uniforms| backend.submit(&uniforms, &self.mesh));

        match result {
            Ok(()) => {
                trace!(frame = self.frame_count, "frame rendered");
                FrameOutcome::Rendered
            }
            Err(e) => {
                self.failed_frames += 1;
                error!(frame = self.frame_count, "Render error: {}", e);
                FrameOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct RecordingBackend {
        viewport: Viewport,
        submitted: Vec<UniformBlock>,
        fail_next: bool,
    }

    impl RecordingBackend {
        fn new(viewport: Viewport) -> Self {
            Self {
                viewport,
                submitted: Vec::new(),
                fail_next: false,
            }
        }
    }

    impl RenderBackend for RecordingBackend {
        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn submit(&mut self, uniforms: &UniformBlock, _mesh: &Mesh) -> Result<(), Error> {
            if std::mem::take(&mut self.fail_next) {
                return Err(Error::Backend("device lost".into()));
            }
            self.submitted.push(*uniforms);
            Ok(())
        }
    }

    fn triangle() -> Mesh {
        Mesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap()
    }

    #[test]
    fn test_tick_submits_uniforms() {
        let mut frames = FrameLoop::new(triangle(), Projection::default());
        let mut backend = RecordingBackend::new(Viewport::new(320, 240));
        let state = TransformState::new(3.0);

        assert!(matches!(frames.tick(&state, &mut backend), FrameOutcome::Rendered));
        assert_eq!(backend.submitted.len(), 1);
        assert_eq!(backend.submitted[0].camera_position, [0.0, 0.0, 3.0, 0.0]);
    }

    #[test]
    fn test_loop_survives_failed_frames() {
        let mut frames = FrameLoop::new(triangle(), Projection::default());
        let mut backend = RecordingBackend::new(Viewport::new(320, 240));
        let mut state = TransformState::new(3.0);

        backend.fail_next = true;
        match frames.tick(&state, &mut backend) {
            FrameOutcome::Failed(e) => assert_eq!(e.kind(), ErrorKind::Runtime),
            FrameOutcome::Rendered => panic!("backend failure was swallowed"),
        }

        state.rot_x = f32::NAN;
        match frames.tick(&state, &mut backend) {
            FrameOutcome::Failed(e) => assert_eq!(e.kind(), ErrorKind::Validation),
            FrameOutcome::Rendered => panic!("NaN rotation was rendered"),
        }

        state.rot_x = 0.0;
        assert!(matches!(frames.tick(&state, &mut backend), FrameOutcome::Rendered));

        assert_eq!(frames.frame_count(), 3);
        assert_eq!(frames.failed_frames(), 2);
        assert_eq!(backend.submitted.len(), 1);
    }

    #[test]
    fn test_non_finite_lighting_is_a_failed_frame() {
        let mut frames = FrameLoop::new(triangle(), Projection::default());
        let mut backend = RecordingBackend::new(Viewport::new(320, 240));
        let mut state = TransformState::new(3.0);

        state.light.distance = f32::INFINITY;
        assert!(matches!(frames.tick(&state, &mut backend), FrameOutcome::Failed(_)));

        state.light.distance = 1.5;
        state.material.ambient.0[2] = f32::NAN;
        assert!(matches!(frames.tick(&state, &mut backend), FrameOutcome::Failed(_)));

        assert_eq!(frames.failed_frames(), 2);
        assert!(backend.submitted.is_empty());
    }
}
