/// polyview terminal viewer
///
/// Usage: polyview-terminal <model.obj> [material.mtl]
/// Controls:
///   - Arrow Keys: Rotate the model
///   - W/S: Zoom in/out
///   - E: Toggle wireframe edges
///   - A: Toggle auto-rotation
///   - M: Switch between half-block and ASCII output
///   - Q/ESC: Quit

use log::error;
use polyview_core::Mesh;
use polyview_terminal::{Hud, TerminalApp};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status for usage and load errors
const EXIT_LOAD_FAILURE: u8 = 84;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("polyview-terminal");
    let Some(obj_path) = args.get(1).map(PathBuf::from) else {
        eprintln!("Usage: {program} <model.obj> [material.mtl]");
        return ExitCode::from(EXIT_LOAD_FAILURE);
    };
    let mtl_path = args.get(2).map(PathBuf::from);

    let mesh = match Mesh::load(&obj_path, mtl_path.as_deref()) {
        Ok(mesh) => mesh,
        Err(e) => {
            error!("Failed to load model: {e}");
            return ExitCode::from(EXIT_LOAD_FAILURE);
        }
    };

    let material = mtl_path
        .filter(|_| mesh.has_material())
        .map(|path| path.display().to_string());
    let hud = Hud::new(obj_path.display().to_string(), material);

    let mut app = TerminalApp::new(mesh, hud);
    if let Err(e) = app.run() {
        error!("Terminal error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
