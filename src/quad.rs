use anyhow::{Context, Result};
use cgmath::prelude::*;
use cgmath::{Deg, Matrix4, Point3, Vector3};
use glium::backend::Facade;
use glium::texture::Texture2d;
use glium::uniforms::Sampler;
use glium::{implement_vertex, uniform, DrawError, DrawParameters, IndexBuffer, Program, Surface, VertexBuffer};

use crate::float::*;

/// Vertex of the screen quad
#[derive(Copy, Clone, Debug)]
pub struct QuadVertex {
    pub pos: [f32; 3],
    pub tex_coords: [f32; 2],
}

implement_vertex!(QuadVertex, pos, tex_coords);

/// Quad in the x = 0 plane facing +x
pub const VERTICES: [QuadVertex; 4] = [
    QuadVertex {
        pos: [0.0, -1.0, -1.0],
        tex_coords: [0.0, 0.0],
    },
    QuadVertex {
        pos: [0.0, 1.0, -1.0],
        tex_coords: [1.0, 0.0],
    },
    QuadVertex {
        pos: [0.0, 1.0, 1.0],
        tex_coords: [1.0, 1.0],
    },
    QuadVertex {
        pos: [0.0, -1.0, 1.0],
        tex_coords: [0.0, 1.0],
    },
];

pub const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Combined transform used to draw the quad into a viewport with the given aspect ratio
pub fn mvp(aspect: Float) -> Matrix4<Float> {
    let model = Matrix4::identity();
    let view = Matrix4::look_at_rh(
        Point3::new(1.0, 0.0, 0.0),
        Point3::origin(),
        Vector3::unit_z(),
    );
    let proj = cgmath::perspective(Deg(45.0), aspect, 0.1, 100.0);
    proj * view * model
}

/// Draws the trace image on a quad
pub struct QuadRenderer {
    vertex_buffer: VertexBuffer<QuadVertex>,
    index_buffer: IndexBuffer<u32>,
}

impl QuadRenderer {
    pub fn new<F: Facade>(facade: &F) -> Result<QuadRenderer> {
        let vertex_buffer =
            VertexBuffer::new(facade, &VERTICES[..]).context("Failed to create vertex buffer")?;
        let index_buffer =
            IndexBuffer::new(facade, glium::index::PrimitiveType::TrianglesList, &INDICES[..])
                .context("Failed to create index buffer")?;
        Ok(QuadRenderer {
            vertex_buffer,
            index_buffer,
        })
    }

    pub fn render<S: Surface>(
        &self,
        target: &mut S,
        program: &Program,
        image: Sampler<'_, Texture2d>,
    ) -> Result<(), DrawError> {
        let (width, height) = target.get_dimensions();
        // Minimized window
        if width == 0 || height == 0 {
            return Ok(());
        }
        let aspect = width.to_float() / height.to_float();
        let uniforms = uniform! {
            mvp: mvp(aspect).into_array(),
            tex: image,
        };
        target.draw(
            &self.vertex_buffer,
            &self.index_buffer,
            program,
            &uniforms,
            &DrawParameters::default(),
        )
    }
}
