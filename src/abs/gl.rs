//! The graphics calls this program makes.
//!
//! [`GraphicsApi`] is the narrow slice of OpenGL used for uploading and drawing
//! indexed geometry. It is implemented for [`glow::Context`] and, in tests, for
//! a recording double that keeps track of every call.

use glam::Vec4;
use glow::HasContext;

/// The OpenGL operations needed to upload and draw indexed geometry.
///
/// Methods take `&self` like [`glow::HasContext`] does, the underlying context
/// is a single-threaded state machine.
pub trait GraphicsApi {
    /// Handle to a vertex array object.
    type VertexArray: Copy + Eq + std::fmt::Debug;
    /// Handle to a buffer object.
    type Buffer: Copy + Eq + std::fmt::Debug;

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    fn delete_buffer(&self, buffer: Self::Buffer);

    /// Fills the buffer bound to `target` with data that will not change again.
    fn buffer_data_static(&self, target: u32, data: &[u8]);

    /// Declares the bound array buffer as the source of float attribute `index`.
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn enable_vertex_attrib_array(&self, index: u32);
    fn disable_vertex_attrib_array(&self, index: u32);

    fn clear_color(&self, color: Vec4);
    fn clear(&self, mask: u32);
    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32);
}

impl GraphicsApi for glow::Context {
    type VertexArray = glow::VertexArray;
    type Buffer = glow::Buffer;

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vertex_array) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vertex_array) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        unsafe { HasContext::bind_buffer(self, target, buffer) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn buffer_data_static(&self, target: u32, data: &[u8]) {
        unsafe { HasContext::buffer_data_u8_slice(self, target, data, glow::STATIC_DRAW) }
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(
                self,
                index,
                size,
                glow::FLOAT,
                normalized,
                stride,
                offset,
            )
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) }
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::disable_vertex_attrib_array(self, index) }
    }

    fn clear_color(&self, color: Vec4) {
        unsafe { HasContext::clear_color(self, color.x, color.y, color.z, color.w) }
    }

    fn clear(&self, mask: u32) {
        unsafe { HasContext::clear(self, mask) }
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        unsafe { HasContext::draw_elements(self, mode, count, element_type, offset) }
    }
}
