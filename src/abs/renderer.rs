//! Per-frame drawing.
//!
//! The [`Renderer`] clears the screen once per frame and then draws any number
//! of [`RawModel`]s on top of each other.

use std::sync::Arc;

use glam::Vec4;

use super::gl::GraphicsApi;
use super::mesh::{POSITION_ATTRIBUTE, RawModel};

/// Draws [`RawModel`]s with indexed draw calls.
pub struct Renderer<G: GraphicsApi> {
    gl: Arc<G>,
    clear_color: Vec4,
}

impl<G: GraphicsApi> Renderer<G> {
    /// Creates a renderer that clears every frame to `clear_color`.
    pub fn new(gl: &Arc<G>, clear_color: Vec4) -> Self {
        Self {
            gl: Arc::clone(gl),
            clear_color,
        }
    }

    /// Clears the color buffer. Called once at the start of every frame.
    pub fn prepare(&self) {
        self.gl.clear_color(self.clear_color);
        self.gl.clear(glow::COLOR_BUFFER_BIT);
    }

    /// Draws the model's triangles.
    pub fn render(&self, model: &RawModel<G::VertexArray>) {
        self.gl.bind_vertex_array(Some(model.vao()));
        self.gl.enable_vertex_attrib_array(POSITION_ATTRIBUTE);
        self.gl.draw_elements(
            glow::TRIANGLES,
            model.index_count() as i32,
            glow::UNSIGNED_INT,
            0,
        );
        self.gl.disable_vertex_attrib_array(POSITION_ATTRIBUTE);
        self.gl.bind_vertex_array(None);
    }
}
