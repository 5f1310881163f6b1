use log::{error, info};

use crate::abs::App;
use crate::asset::{DisplaySettings, SceneDef};
use crate::error::Result;

mod abs;
mod asset;
mod error;
mod game;
mod logging;

const DISPLAY_JSON: &str = include_str!("assets/display.json");
const SCENE_JSON: &str = include_str!("assets/scene.json");

fn start() -> Result<u64> {
    let settings = DisplaySettings::from_json(DISPLAY_JSON)?;
    let scene = SceneDef::from_json(SCENE_JSON)?;
    scene.validate()?;

    let app = App::new(&settings)?;
    game::run(app, &scene)
}

fn main() {
    if let Err(e) = logging::init(logging::default_level()) {
        eprintln!("{e}");
    }

    match start() {
        Ok(frames) => info!("Exited cleanly after {frames} frames"),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}
