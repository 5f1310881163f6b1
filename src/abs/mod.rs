//! This module contains the thin layer over SDL2 and OpenGL: window management,
//! the graphics calls the program makes, geometry upload and drawing.

pub mod app;
pub mod gl;
pub mod mesh;
pub mod renderer;

#[cfg(test)]
pub mod recording;

pub use app::*;
pub use gl::*;
pub use mesh::*;
pub use renderer::*;
