//! A [`GraphicsApi`] that records calls instead of talking to a GPU.
//!
//! It tracks just enough GL state (the bound vertex array, the bound array
//! buffer, element buffer bindings per vertex array and buffer contents) for
//! tests to read uploaded geometry back.

use std::cell::RefCell;
use std::collections::HashMap;

use glam::Vec4;

use super::gl::GraphicsApi;

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindBuffer(u32, Option<u32>),
    DeleteBuffer(u32),
    BufferData {
        target: u32,
        len: usize,
    },
    VertexAttribPointer {
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray(u32),
    DisableVertexAttribArray(u32),
    ClearColor(Vec4),
    Clear(u32),
    DrawElements {
        mode: u32,
        count: i32,
        element_type: u32,
        offset: i32,
    },
    /// Pushed by a scripted display when a frame is presented.
    Present,
    /// Pushed by a scripted display when it is closed.
    CloseDisplay,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttribPointer {
    pub buffer: u32,
    pub size: i32,
    pub normalized: bool,
    pub stride: i32,
    pub offset: i32,
}

#[derive(Debug, Default, Clone)]
pub struct VaoState {
    pub element_buffer: Option<u32>,
    pub attribs: HashMap<u32, AttribPointer>,
}

#[derive(Default)]
struct State {
    next_handle: u32,
    calls: Vec<GlCall>,
    bound_vao: Option<u32>,
    bound_array_buffer: Option<u32>,
    vaos: HashMap<u32, VaoState>,
    buffers: HashMap<u32, Vec<u8>>,
    deleted_vaos: Vec<u32>,
    deleted_buffers: Vec<u32>,
}

impl State {
    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    fn target_buffer(&self, target: u32) -> Option<u32> {
        match target {
            glow::ARRAY_BUFFER => self.bound_array_buffer,
            glow::ELEMENT_ARRAY_BUFFER => self
                .bound_vao
                .and_then(|vao| self.vaos.get(&vao))
                .and_then(|vao| vao.element_buffer),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct RecordingGl {
    state: RefCell<State>,
    fail_allocations: bool,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context on which every handle allocation fails.
    pub fn failing() -> Self {
        Self {
            fail_allocations: true,
            ..Self::default()
        }
    }

    pub fn push(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn vertex_array(&self, vao: u32) -> Option<VaoState> {
        self.state.borrow().vaos.get(&vao).cloned()
    }

    pub fn bound_vertex_array(&self) -> Option<u32> {
        self.state.borrow().bound_vao
    }

    pub fn bound_array_buffer(&self) -> Option<u32> {
        self.state.borrow().bound_array_buffer
    }

    /// Reads back the indices stored in the element buffer of `vao`.
    pub fn element_data(&self, vao: u32) -> Vec<u32> {
        let state = self.state.borrow();
        let buffer = state.vaos[&vao].element_buffer.expect("no element buffer");
        state.buffers[&buffer]
            .chunks_exact(4)
            .map(|b| u32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    }

    /// Reads back the floats feeding attribute `index` of `vao`.
    pub fn attribute_data(&self, vao: u32, index: u32) -> Vec<f32> {
        let state = self.state.borrow();
        let buffer = state.vaos[&vao].attribs[&index].buffer;
        state.buffers[&buffer]
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    }

    pub fn deleted_vertex_arrays(&self) -> Vec<u32> {
        self.state.borrow().deleted_vaos.clone()
    }

    pub fn deleted_buffers(&self) -> Vec<u32> {
        self.state.borrow().deleted_buffers.clone()
    }

    /// Number of vertex arrays and buffers created and not yet deleted.
    pub fn live_handles(&self) -> usize {
        let state = self.state.borrow();
        state.vaos.len() + state.buffers.len()
    }
}

impl GraphicsApi for RecordingGl {
    type VertexArray = u32;
    type Buffer = u32;

    fn create_vertex_array(&self) -> Result<u32, String> {
        if self.fail_allocations {
            return Err("out of vertex arrays".to_string());
        }
        let mut state = self.state.borrow_mut();
        let vao = state.handle();
        state.vaos.insert(vao, VaoState::default());
        state.calls.push(GlCall::CreateVertexArray(vao));
        Ok(vao)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        let mut state = self.state.borrow_mut();
        state.bound_vao = vertex_array;
        state.calls.push(GlCall::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        let mut state = self.state.borrow_mut();
        state.vaos.remove(&vertex_array);
        state.deleted_vaos.push(vertex_array);
        state.calls.push(GlCall::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        if self.fail_allocations {
            return Err("out of buffers".to_string());
        }
        let mut state = self.state.borrow_mut();
        let buffer = state.handle();
        state.buffers.insert(buffer, Vec::new());
        state.calls.push(GlCall::CreateBuffer(buffer));
        Ok(buffer)
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        let mut state = self.state.borrow_mut();
        match target {
            glow::ARRAY_BUFFER => state.bound_array_buffer = buffer,
            glow::ELEMENT_ARRAY_BUFFER => {
                if let Some(vao) = state.bound_vao {
                    state.vaos.entry(vao).or_default().element_buffer = buffer;
                }
            }
            _ => {}
        }
        state.calls.push(GlCall::BindBuffer(target, buffer));
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        state.deleted_buffers.push(buffer);
        state.calls.push(GlCall::DeleteBuffer(buffer));
    }

    fn buffer_data_static(&self, target: u32, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let bound = state.target_buffer(target);
        if let Some(buffer) = bound {
            state.buffers.insert(buffer, data.to_vec());
        }
        state.calls.push(GlCall::BufferData {
            target,
            len: data.len(),
        });
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        let mut state = self.state.borrow_mut();
        if let (Some(vao), Some(buffer)) = (state.bound_vao, state.bound_array_buffer) {
            state.vaos.entry(vao).or_default().attribs.insert(
                index,
                AttribPointer {
                    buffer,
                    size,
                    normalized,
                    stride,
                    offset,
                },
            );
        }
        state.calls.push(GlCall::VertexAttribPointer {
            index,
            size,
            normalized,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.push(GlCall::EnableVertexAttribArray(index));
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.push(GlCall::DisableVertexAttribArray(index));
    }

    fn clear_color(&self, color: Vec4) {
        self.push(GlCall::ClearColor(color));
    }

    fn clear(&self, mask: u32) {
        self.push(GlCall::Clear(mask));
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        self.push(GlCall::DrawElements {
            mode,
            count,
            element_type,
            offset,
        });
    }
}
