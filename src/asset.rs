//! Embedded assets.
//!
//! Window settings and the scene to draw are JSON files compiled into the
//! binary. This module parses them into [`DisplaySettings`] and [`SceneDef`].

use glam::{Vec3, Vec4};
use indexmap::IndexMap;

use crate::error::{Result, ValidationError};

/// How the window and its OpenGL context are created.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Upper bound on frames per second, `0` disables the cap.
    pub fps_cap: u32,
    pub vsync: bool,
    pub gl_version: (u8, u8),
    pub core_profile: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            title: "Our First Display".to_string(),
            width: 1280,
            height: 720,
            fps_cap: 120,
            vsync: true,
            gl_version: (3, 3),
            core_profile: true,
        }
    }
}

impl DisplaySettings {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[derive(Debug, serde::Deserialize)]
struct RawModelDef {
    positions: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

#[derive(Debug, serde::Deserialize)]
struct RawSceneDef {
    #[serde(default = "default_clear_color")]
    clear_color: [f32; 4],
    models: IndexMap<String, RawModelDef>,
}

fn default_clear_color() -> [f32; 4] {
    [1.0, 0.0, 0.0, 1.0]
}

/// Geometry of one model: vertex positions and the triangles connecting them.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDef {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl ModelDef {
    /// Positions as a flat list of xyz floats, ready for upload.
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }
}

/// Everything drawn each frame, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDef {
    pub clear_color: Vec4,
    pub models: IndexMap<String, ModelDef>,
}

impl SceneDef {
    pub fn from_json(s: &str) -> Result<Self> {
        let raw: RawSceneDef = serde_json::from_str(s)?;
        let models = raw
            .models
            .into_iter()
            .map(|(name, def)| {
                let model = ModelDef {
                    positions: def.positions.into_iter().map(Vec3::from).collect(),
                    indices: def.indices,
                };
                (name, model)
            })
            .collect();
        Ok(Self {
            clear_color: Vec4::from(raw.clear_color),
            models,
        })
    }

    /// Checks that every model's indices form whole triangles and only refer to
    /// vertices that exist.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (name, model) in &self.models {
            if !model.indices.len().is_multiple_of(3) {
                return Err(ValidationError::IncompleteTriangle {
                    model: name.clone(),
                    index_count: model.indices.len(),
                });
            }
            let vertex_count = model.positions.len();
            if let Some((position, &index)) = model
                .indices
                .iter()
                .enumerate()
                .find(|&(_, &index)| index as usize >= vertex_count)
            {
                return Err(ValidationError::IndexOutOfRange {
                    model: name.clone(),
                    position,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}
