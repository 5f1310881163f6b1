//! Geometry upload.
//!
//! This module defines [`RawModel`], the handle to geometry stored on the GPU,
//! the [`Loader`] that puts it there and the [`ResourceRegistry`] that keeps
//! track of every GPU object so they can all be deleted when the program exits.

use std::sync::Arc;

use log::debug;

use super::gl::GraphicsApi;
use crate::error::{Error, Result};

/// Attribute slot vertex positions are bound to.
pub const POSITION_ATTRIBUTE: u32 = 0;

/// Floats per vertex position.
const POSITION_COMPONENTS: i32 = 3;

/// Geometry stored in a vertex array on the GPU side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawModel<V> {
    vao: V,
    index_count: usize,
}

impl<V: Copy> RawModel<V> {
    pub fn vao(&self) -> V {
        self.vao
    }

    /// Returns the amount of indices drawn for this model.
    pub fn index_count(&self) -> usize {
        self.index_count
    }
}

/// Every vertex array and buffer allocated by a [`Loader`].
///
/// Handles are appended as they are created and deleted together by
/// [`ResourceRegistry::release_all`].
pub struct ResourceRegistry<G: GraphicsApi> {
    vaos: Vec<G::VertexArray>,
    vbos: Vec<G::Buffer>,
}

impl<G: GraphicsApi> Default for ResourceRegistry<G> {
    fn default() -> Self {
        Self {
            vaos: Vec::new(),
            vbos: Vec::new(),
        }
    }
}

impl<G: GraphicsApi> ResourceRegistry<G> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_vertex_array(&mut self, vao: G::VertexArray) {
        self.vaos.push(vao);
    }

    pub fn register_buffer(&mut self, vbo: G::Buffer) {
        self.vbos.push(vbo);
    }

    pub fn vertex_arrays(&self) -> &[G::VertexArray] {
        &self.vaos
    }

    pub fn buffers(&self) -> &[G::Buffer] {
        &self.vbos
    }

    /// Total number of handles currently held.
    pub fn len(&self) -> usize {
        self.vaos.len() + self.vbos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vaos.is_empty() && self.vbos.is_empty()
    }

    /// Deletes every registered vertex array, then every registered buffer, and
    /// empties the registry. Returns how many handles were deleted.
    pub fn release_all(&mut self, gl: &G) -> usize {
        let released = self.len();
        for vao in self.vaos.drain(..) {
            gl.delete_vertex_array(vao);
        }
        for vbo in self.vbos.drain(..) {
            gl.delete_buffer(vbo);
        }
        released
    }
}

/// Loads geometry into vertex arrays.
pub struct Loader<G: GraphicsApi> {
    gl: Arc<G>,
}

impl<G: GraphicsApi> Loader<G> {
    pub fn new(gl: &Arc<G>) -> Self {
        Self { gl: Arc::clone(gl) }
    }

    /// Creates a vertex array holding `positions` in attribute 0 and `indices`
    /// in its element buffer.
    ///
    /// `positions` is a flat list of xyz triples. Indices are not checked
    /// against the vertex count; see [`crate::asset::SceneDef::validate`].
    pub fn load_to_vao(
        &self,
        registry: &mut ResourceRegistry<G>,
        positions: &[f32],
        indices: &[u32],
    ) -> Result<RawModel<G::VertexArray>> {
        let vao = self.create_vao(registry)?;
        self.bind_indices_buffer(registry, indices)?;
        self.store_data_in_attribute_list(registry, POSITION_ATTRIBUTE, positions)?;
        self.gl.bind_vertex_array(None);

        debug!(
            "Loaded {:?} with {} vertices and {} indices",
            vao,
            positions.len() / POSITION_COMPONENTS as usize,
            indices.len()
        );

        Ok(RawModel {
            vao,
            index_count: indices.len(),
        })
    }

    fn create_vao(&self, registry: &mut ResourceRegistry<G>) -> Result<G::VertexArray> {
        let vao = self.gl.create_vertex_array().map_err(Error::Allocation)?;
        registry.register_vertex_array(vao);
        self.gl.bind_vertex_array(Some(vao));
        Ok(vao)
    }

    // The element buffer binding is part of the vertex array state, so it stays
    // bound until the vertex array itself is unbound.
    fn bind_indices_buffer(&self, registry: &mut ResourceRegistry<G>, indices: &[u32]) -> Result<()> {
        let ebo = self.gl.create_buffer().map_err(Error::Allocation)?;
        registry.register_buffer(ebo);
        self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
        self.gl
            .buffer_data_static(glow::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(indices));
        Ok(())
    }

    fn store_data_in_attribute_list(
        &self,
        registry: &mut ResourceRegistry<G>,
        attribute: u32,
        data: &[f32],
    ) -> Result<()> {
        let vbo = self.gl.create_buffer().map_err(Error::Allocation)?;
        registry.register_buffer(vbo);
        self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        self.gl
            .buffer_data_static(glow::ARRAY_BUFFER, bytemuck::cast_slice(data));
        self.gl
            .vertex_attrib_pointer_f32(attribute, POSITION_COMPONENTS, false, 0, 0);
        self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        Ok(())
    }
}
