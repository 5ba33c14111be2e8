/// Geometry primitives produced by the mesh builder
use bytemuck::{Pod, Zeroable};
use nalgebra::Vector3;

/// Floats per interleaved vertex: position, normal, texcoord.
pub const FLOATS_PER_VERTEX: usize = 8;
/// Byte stride of one interleaved vertex.
pub const VERTEX_STRIDE: usize = FLOATS_PER_VERTEX * std::mem::size_of::<f32>();

/// An interleaved GPU vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

const _: () = assert!(std::mem::size_of::<Vertex>() == VERTEX_STRIDE);

impl Vertex {
    pub fn new(position: Vector3<f32>, normal: Vector3<f32>, texcoord: [f32; 2]) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            texcoord,
        }
    }
}

/// Axis-aligned bounds over every parsed position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl BoundingBox {
    /// An inverted box that any point will expand.
    pub fn empty() -> Self {
        Self {
            min: Vector3::repeat(f32::INFINITY),
            max: Vector3::repeat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn include(&mut self, p: &Vector3<f32>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) / 2.0
    }

    /// Half the length of the diagonal.
    pub fn radius(&self) -> f32 {
        (self.max - self.min).norm() / 2.0
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// The framing data the transform composer needs from a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBounds {
    pub center: Vector3<f32>,
    pub radius: f32,
}

/// A welded, indexed triangle mesh ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub center: Vector3<f32>,
    pub radius: f32,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> MeshBounds {
        MeshBounds {
            center: self.center,
            radius: self.radius,
        }
    }

    /// The vertex buffer as a flat float array, 8 floats per vertex.
    pub fn vertex_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Walk the index buffer three at a time.
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }
}
