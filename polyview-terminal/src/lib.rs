/// Terminal host for the polyview software renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self},
};
use log::info;
use polyview_core::{CameraState, Mesh, Renderer, Rgb};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::{BlitMode, TerminalRenderer};

/// Radians per arrow key press
const ROTATE_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 0.1;

/// Wireframe color drawn over the shaded model
const EDGE_COLOR: Rgb = Rgb::WHITE;

/// File names shown in the status line
#[derive(Debug, Clone)]
pub struct Hud {
    pub model: String,
    pub material: String,
}

impl Hud {
    pub fn new(model: impl Into<String>, material: Option<String>) -> Self {
        Self {
            model: model.into(),
            material: material.unwrap_or_else(|| "none".to_string()),
        }
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: Mesh,
    camera: CameraState,
    renderer: Renderer,
    output: TerminalRenderer,
    hud: Hud,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, hud: Hud) -> Self {
        Self {
            mesh,
            camera: CameraState::default(),
            renderer: Renderer::default(),
            output: TerminalRenderer::new(BlitMode::HalfBlock),
            hud,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 60);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            self.camera.tick();
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("Viewer closed");
        Ok(())
    }

    /// Translate a key press into camera or session changes
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Left => self.camera.rotate(-ROTATE_STEP, 0.0),
            KeyCode::Right => self.camera.rotate(ROTATE_STEP, 0.0),
            KeyCode::Up => self.camera.rotate(0.0, -ROTATE_STEP),
            KeyCode::Down => self.camera.rotate(0.0, ROTATE_STEP),
            KeyCode::Char('w') => self.camera.zoom_by(ZOOM_STEP),
            KeyCode::Char('s') => self.camera.zoom_by(-ZOOM_STEP),
            KeyCode::Char('e') => self.camera.toggle_edges(),
            KeyCode::Char('a') => self.camera.toggle_auto_rotate(),
            KeyCode::Char('m') => self.output.toggle_mode(),
            _ => {}
        }
    }

    fn status_line(&self) -> String {
        format!(
            "OBJ: {} | MTL: {} | FPS: {:.1} | Edges [e]: {} | Auto [a]: {} | Arrows rotate, W/S zoom, M mode, Q quit",
            self.hud.model,
            self.hud.material,
            self.fps,
            if self.camera.show_edges { "on" } else { "off" },
            if self.camera.auto_rotate { "on" } else { "off" },
        )
    }

    fn render(&mut self) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let viewport = self.output.mode().viewport(cols, rows);

        let mut stdout = stdout();
        if let Some(mut frame) = self.renderer.render(Some(&self.mesh), &self.camera, viewport) {
            if self.camera.show_edges {
                frame.overlay_edges(EDGE_COLOR);
            }
            self.output.draw(&frame.color, &mut stdout)?;
        }

        // Draw UI overlay
        let status: String = self.status_line().chars().take(cols as usize).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetBackgroundColor(Color::Black),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut TerminalApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> TerminalApp {
        TerminalApp::new(Mesh::cube(2.0), Hud::new("cube", None))
    }

    #[test]
    fn test_keys_drive_camera() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('e'));

        let camera = app.camera();
        assert!((camera.yaw - 0.6).abs() < 1e-6);
        assert!((camera.pitch - 0.4).abs() < 1e-6);
        assert!((camera.zoom - 1.3).abs() < 1e-6);
        assert!(camera.show_edges);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(app.is_running());
        press(&mut app, KeyCode::Esc);
        assert!(!app.is_running());
    }

    #[test]
    fn test_status_line_names_files() {
        let app = TerminalApp::new(Mesh::cube(2.0), Hud::new("tree.obj", Some("tree.mtl".into())));
        let status = app.status_line();
        assert!(status.starts_with("OBJ: tree.obj | MTL: tree.mtl"));
        assert!(self::app().status_line().contains("MTL: none"));
    }
}
