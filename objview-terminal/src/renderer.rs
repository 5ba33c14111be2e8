/// ASCII rasterizer acting as the terminal render backend
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Vector3;
use objview_core::{Error, Mat4, Mesh, RenderBackend, UniformBlock, Vertex, Viewport};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: u32 = 2;

/// Lighting terms unpacked from the uniform block
struct Shading {
    model: Mat4,
    camera: Vector3<f32>,
    light: Vector3<f32>,
    ambient: Vector3<f32>,
    diffuse: Vector3<f32>,
    specular: Vector3<f32>,
    power: f32,
}

impl Shading {
    fn from_uniforms(uniforms: &UniformBlock) -> Result<Self, Error> {
        let xyz = |v: [f32; 4]| Vector3::new(v[0], v[1], v[2]);
        Ok(Self {
            model: Mat4::from_row_major(&uniforms.model)?,
            camera: xyz(uniforms.camera_position),
            light: xyz(uniforms.light_position),
            ambient: xyz(uniforms.ambient),
            diffuse: xyz(uniforms.diffuse),
            specular: xyz(uniforms.specular),
            power: uniforms.specular_power[0],
        })
    }

    /// Blinn-Phong colour at the triangle's centroid.
    fn shade(&self, vertices: [&Vertex; 3]) -> Vector3<f32> {
        let mut position = Vector3::zeros();
        let mut normal = Vector3::zeros();
        for vertex in vertices {
            let p = self.model.transform_point(vertex.position);
            position += Vector3::new(p[0], p[1], p[2]) / 3.0;
            normal += Vector3::from(self.model.transform_direction(vertex.normal));
        }

        let (Some(n), Some(l), Some(v)) = (
            normal.try_normalize(1e-6),
            (self.light - position).try_normalize(1e-6),
            (self.camera - position).try_normalize(1e-6),
        ) else {
            return self.ambient;
        };

        let lambert = n.dot(&l).max(0.0);
        let highlight = match (l + v).try_normalize(1e-6) {
            Some(h) if lambert > 0.0 => n.dot(&h).max(0.0).powf(self.power),
            _ => 0.0,
        };

        self.ambient + self.diffuse * lambert + self.specular * highlight
    }
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// The character drawn at a cell, for inspection.
    pub fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, uniforms: &UniformBlock) -> Result<(), Error> {
        let mvp = Mat4::from_row_major(&uniforms.mvp)?;
        let shading = Shading::from_uniforms(uniforms)?;
        let viewport = self.viewport();

        for triangle in mesh.triangles() {
            // Triangle is clipped
            let Some(screen_coords) = project(&mvp, viewport, triangle) else {
                continue;
            };

            let color = shading.shade(triangle);
            self.rasterize_triangle(&screen_coords, color);
        }
        Ok(())
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], color: Vector3<f32>) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Map brightness to character; covered cells never use the blank
        let brightness = color.max().clamp(0.0, 1.0);
        let char_index = 1 + (brightness * (LUMINOSITY_RAMP.len() - 2) as f32) as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];
        let cell_color = to_terminal_color(color);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py)) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                    self.color_buffer[idx] = cell_color;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderBackend for AsciiRenderer {
    /// Pixel-equivalent viewport: rows count double so the projection aspect
    /// matches what the terminal shows.
    fn viewport(&self) -> Viewport {
        Viewport::new(self.width as u32, self.height as u32 * CELL_ASPECT)
    }

    fn submit(&mut self, uniforms: &UniformBlock, mesh: &Mesh) -> Result<(), Error> {
        self.clear();
        self.render_mesh(mesh, uniforms)
    }
}

/// Project a triangle's vertices to screen space, `None` if any is clipped.
fn project(mvp: &Mat4, viewport: Viewport, triangle: [&Vertex; 3]) -> Option<[(f32, f32, f32); 3]> {
    let mut out = [(0.0, 0.0, 0.0); 3];
    for (slot, vertex) in out.iter_mut().zip(triangle) {
        let (x, y, z) = viewport.clip_to_screen(mvp.transform_point(vertex.position))?;
        *slot = (x, y / CELL_ASPECT as f32, z);
    }
    Some(out)
}

fn to_terminal_color(color: Vector3<f32>) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.x),
        g: channel(color.y),
        b: channel(color.z),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(v0: (f32, f32), v1: (f32, f32), v2: (f32, f32), p: (f32, f32)) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
