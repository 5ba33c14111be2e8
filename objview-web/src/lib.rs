/// objview Web - WASM bindings for a browser-side WebGPU backend
///
/// The JavaScript host owns the device, pipeline and render pass. It feeds
/// OBJ text and input events in, and pulls vertex, index and uniform buffers
/// out each frame. A frame error is returned to the host, which logs it and
/// carries on with the next animation frame.
use objview_core::{
    Error, FrameLoop, LightParams, Material, Mesh, OrbitController, Rgb, TransformState, ViewerConfig, Viewport,
    UNIFORM_BLOCK_SIZE,
};
use wasm_bindgen::prelude::*;

/// Viewer state without any JS types, so it can be exercised natively.
struct Session {
    config: ViewerConfig,
    frames: Option<FrameLoop>,
    state: TransformState,
    input: OrbitController,
}

impl Session {
    fn new(config: ViewerConfig) -> Self {
        Self {
            input: OrbitController::new(config.input.clone(), 0.0),
            state: TransformState::default(),
            frames: None,
            config,
        }
    }

    fn load(&mut self, source: &str) -> Result<(), Error> {
        let mesh = Mesh::from_obj_str(source)?;
        let bounds = mesh.bounds();
        tracing::info!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "mesh loaded"
        );

        self.state = TransformState::framing(&self.config, &bounds);
        self.input = OrbitController::new(self.config.input.clone(), bounds.radius);
        self.frames = Some(FrameLoop::new(mesh, self.config.camera.projection()));
        Ok(())
    }

    fn mesh(&self) -> Option<&Mesh> {
        self.frames.as_ref().map(FrameLoop::mesh)
    }

    fn uniforms(&self, width: u32, height: u32) -> Result<Option<Vec<u8>>, Error> {
        let Some(frames) = &self.frames else {
            return Ok(None);
        };
        let block = frames.uniforms(&self.state, Viewport::new(width, height))?;
        Ok(Some(block.as_bytes().to_vec()))
    }

    /// Replace the material only when every term parses and is finite.
    fn set_material(&mut self, ambient: &str, diffuse: &str, specular: &str, power: f32) -> Result<(), Error> {
        let material = Material {
            ambient: Rgb::from_hex(ambient)?,
            diffuse: Rgb::from_hex(diffuse)?,
            specular: Rgb::from_hex(specular)?,
            specular_power: power,
        };
        material.validate()?;
        self.state.material = material;
        Ok(())
    }

    fn set_light(&mut self, azimuth: f32, elevation: f32, distance: f32) -> Result<(), Error> {
        let light = LightParams {
            azimuth,
            elevation,
            distance,
        };
        light.validate()?;
        self.state.light = light;
        Ok(())
    }
}

fn to_js(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct Viewer {
    session: Session,
}

#[wasm_bindgen]
impl Viewer {
    /// Create a viewer, optionally overriding defaults with TOML text.
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: Option<String>) -> Result<Viewer, JsValue> {
        let config = match config_toml {
            Some(text) => ViewerConfig::from_toml_str(&text).map_err(|e| to_js(e.into()))?,
            None => ViewerConfig::default(),
        };
        Ok(Viewer {
            session: Session::new(config),
        })
    }

    /// Parse OBJ text and frame the camera around it.
    pub fn load_obj(&mut self, source: &str) -> Result<(), JsValue> {
        self.session.load(source).map_err(to_js)
    }

    /// Interleaved vertex buffer, 8 floats per vertex.
    pub fn vertex_data(&self) -> Vec<f32> {
        self.session.mesh().map(|m| m.vertex_data().to_vec()).unwrap_or_default()
    }

    pub fn index_data(&self) -> Vec<u32> {
        self.session.mesh().map(|m| m.indices.clone()).unwrap_or_default()
    }

    /// Bytes the host must allocate for the uniform buffer.
    pub fn uniform_size() -> usize {
        UNIFORM_BLOCK_SIZE
    }

    /// Pack this frame's uniform block. Empty until a mesh is loaded.
    pub fn uniforms(&self, width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
        match self.session.uniforms(width, height) {
            Ok(bytes) => Ok(bytes.unwrap_or_default()),
            Err(e) => {
                tracing::error!("Render error: {}", e);
                Err(to_js(e))
            }
        }
    }

    pub fn background(&self) -> Vec<f32> {
        self.session.config.material.background.0.to_vec()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.session.input.press(x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let session = &mut self.session;
        session.input.drag_to(&mut session.state, x, y);
    }

    pub fn pointer_up(&mut self) {
        self.session.input.release();
    }

    /// One zoom step per wheel event: negative `delta` moves closer.
    pub fn zoom(&mut self, delta: f32) {
        let session = &mut self.session;
        if delta < 0.0 {
            session.input.zoom_in(&mut session.state);
        } else if delta > 0.0 {
            session.input.zoom_out(&mut session.state);
        }
    }

    /// Angles in degrees; distance in mesh radii.
    pub fn set_light(&mut self, azimuth: f32, elevation: f32, distance: f32) -> Result<(), JsValue> {
        self.session.set_light(azimuth, elevation, distance).map_err(to_js)
    }

    /// Colours as `#rrggbb`.
    pub fn set_material(&mut self, ambient: &str, diffuse: &str, specular: &str, power: f32) -> Result<(), JsValue> {
        self.session
            .set_material(ambient, diffuse, specular, power)
            .map_err(to_js)
    }
}
