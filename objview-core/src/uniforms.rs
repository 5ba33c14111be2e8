//! The 224-byte lighting uniform block shared with the shader
//!
//! | offset | size | field            |
//! |--------|------|------------------|
//! | 0      | 64   | mvp              |
//! | 64     | 64   | model            |
//! | 128    | 16   | camera position  |
//! | 144    | 16   | light position   |
//! | 160    | 16   | ambient colour   |
//! | 176    | 16   | diffuse colour   |
//! | 192    | 16   | specular colour  |
//! | 208    | 16   | specular power   |
//!
//! Matrices are stored in row-major order; vec3 slots are padded with a
//! zero `w`. Backends must allocate exactly [`UNIFORM_BLOCK_SIZE`] bytes.
use bytemuck::{Pod, Zeroable};
use nalgebra::Vector3;

use crate::composer::FrameTransforms;
use crate::transform::Material;

pub const UNIFORM_BLOCK_SIZE: usize = 224;

pub const MVP_OFFSET: usize = 0;
pub const MODEL_OFFSET: usize = 64;
pub const CAMERA_POSITION_OFFSET: usize = 128;
pub const LIGHT_POSITION_OFFSET: usize = 144;
pub const AMBIENT_OFFSET: usize = 160;
pub const DIFFUSE_OFFSET: usize = 176;
pub const SPECULAR_OFFSET: usize = 192;
pub const SPECULAR_POWER_OFFSET: usize = 208;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct UniformBlock {
    pub mvp: [f32; 16],
    pub model: [f32; 16],
    pub camera_position: [f32; 4],
    pub light_position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub specular_power: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<UniformBlock>() == UNIFORM_BLOCK_SIZE);

fn pad(v: &Vector3<f32>) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}

impl UniformBlock {
    pub fn new(frame: &FrameTransforms, material: &Material) -> Self {
        Self {
            mvp: frame.mvp.to_row_major(),
            model: frame.model.to_row_major(),
            camera_position: pad(&frame.camera_position),
            light_position: pad(&frame.light_position),
            ambient: material.ambient.to_vec4(),
            diffuse: material.diffuse.to_vec4(),
            specular: material.specular.to_vec4(),
            specular_power: [material.specular_power, 0.0, 0.0, 0.0],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(bytemuck::bytes_of(self))
    }
}
