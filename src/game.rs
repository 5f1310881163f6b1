//! The main loop.
//!
//! [`run`] uploads the scene, draws it every frame until the display asks to
//! close, and then deletes every GPU resource it created.

use std::sync::Arc;

use log::{debug, info};

use crate::abs::{Display, GraphicsApi, Loader, RawModel, Renderer, ResourceRegistry};
use crate::asset::SceneDef;
use crate::error::Result;

/// Lifecycle of [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
    ShuttingDown,
    Terminated,
}

impl LoopState {
    fn advance(&mut self, next: LoopState) {
        debug!("{:?} -> {:?}", self, next);
        *self = next;
    }
}

/// Uploads every model of `scene`, in draw order.
fn load_scene<G: GraphicsApi>(
    loader: &Loader<G>,
    registry: &mut ResourceRegistry<G>,
    scene: &SceneDef,
) -> Result<Vec<RawModel<G::VertexArray>>> {
    scene
        .models
        .iter()
        .map(|(name, def)| {
            debug!("Uploading model '{name}'");
            loader.load_to_vao(registry, &def.flat_positions(), &def.indices)
        })
        .collect()
}

/// Renders `scene` into `display` until a close is requested.
///
/// Returns the number of frames presented. The display is closed before this
/// returns, also when uploading the scene fails.
pub fn run<D: Display>(mut display: D, scene: &SceneDef) -> Result<u64> {
    let mut state = LoopState::Initializing;

    let gl = Arc::clone(display.gl());
    let mut registry = ResourceRegistry::new();
    let loader = Loader::new(&gl);
    let renderer = Renderer::new(&gl, scene.clear_color);

    let models = match load_scene(&loader, &mut registry, scene) {
        Ok(models) => models,
        Err(e) => {
            registry.release_all(&gl);
            display.close();
            return Err(e);
        }
    };
    info!("Loaded {} model(s) into {} GPU handles", models.len(), registry.len());

    state.advance(LoopState::Running);
    let mut frames = 0u64;
    while !display.is_close_requested() {
        renderer.prepare();
        for model in &models {
            renderer.render(model);
        }
        display.update();
        frames += 1;
    }

    state.advance(LoopState::ShuttingDown);
    let released = registry.release_all(&gl);
    display.close();
    info!("Released {released} GPU handles after {frames} frames");

    state.advance(LoopState::Terminated);
    Ok(frames)
}
