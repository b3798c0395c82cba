/// Example: spin the built-in cube without any model files
///
/// Usage: cargo run --example cube

use polyview_core::Mesh;
use polyview_terminal::{Hud, TerminalApp};
use std::io;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut app = TerminalApp::new(Mesh::cube(2.0), Hud::new("cube (built-in)", None));
    app.run()
}
