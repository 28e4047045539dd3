/// Terminal host for the softpipe pipeline
///
/// Turns crossterm mouse and keyboard events into camera input, runs one
/// pipeline frame per tick and paints the resulting draw list as ASCII.
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{info, warn};
use nalgebra::{Point3, Vector3, Vector4};
use softpipe_core::{
    CameraState, Context, FrameStats, InputSnapshot, Mesh, Pipeline, RenderConfig, Rgba,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::{AsciiRenderer, CheckerTexture};

/// Width over height of a terminal character cell
pub const CELL_ASPECT: f32 = 0.5;

/// Config that frames `mesh` from in front (-z side), sized for a terminal
pub fn framing_config(mesh: &Mesh) -> RenderConfig {
    let (center, radius) = match mesh.bounds() {
        Some((lo, hi)) => (nalgebra::center(&lo, &hi), ((hi - lo).norm() * 0.5).max(0.5)),
        None => (Point3::origin(), 1.0),
    };

    let mut config = RenderConfig::default().looking_from(
        center - Vector3::new(0.0, 0.0, radius * 4.0),
        center,
    );
    config.projection.pixel_aspect = CELL_ASPECT;
    config.projection.far = (radius * 16.0).max(config.projection.far);
    config.camera.move_step = radius * 0.1;
    // Cells are much coarser than pixels
    config.camera.drag_sensitivity = 0.05;
    config
}

/// Give every triangle of an untextured mesh a gray level from its normal, lit
/// from the camera side. Textured meshes are returned unchanged.
pub fn shade_by_normal(mesh: Mesh) -> Mesh {
    if mesh.is_textured() {
        return mesh;
    }

    let light_dir = Vector3::new(0.3, 0.5, -1.0).normalize();
    let shades: Vec<Rgba> = (0..mesh.triangles().len())
        .map(|t| {
            // Front faces wind clockwise, so their right-hand normal points inward
            let brightness = mesh
                .face_normal(t)
                .map_or(0.0, |normal| (-normal).dot(&light_dir).max(0.0));
            let level = 0.25 + 0.75 * brightness;
            Vector4::new(level, level, level, 1.0)
        })
        .collect();
    mesh.with_flat_colors(|t| shades[t])
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    mesh: Mesh,
    config: RenderConfig,
    camera: CameraState,
    input: InputSnapshot,
    pipeline: Pipeline,
    renderer: AsciiRenderer,
    texture: CheckerTexture,
    stats: FrameStats,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: RenderConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            camera: CameraState::new(&config.camera),
            mesh,
            config,
            input: InputSnapshot::default(),
            pipeline: Pipeline::new(),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            texture: CheckerTexture::default(),
            stats: FrameStats::default(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        if let Err(e) = &result {
            warn!("terminal loop stopped: {}", e);
        }
        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Drain everything queued since the last tick
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("quit after {} triangles in the last frame", self.stats.drawn);
        Ok(())
    }

    /// Fold one terminal event into the pending input snapshot
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                let keys = &mut self.input.keys;
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                    KeyCode::Char('w') | KeyCode::Up => keys.forward = true,
                    KeyCode::Char('s') | KeyCode::Down => keys.back = true,
                    KeyCode::Char('a') | KeyCode::Left => keys.left = true,
                    KeyCode::Char('d') | KeyCode::Right => keys.right = true,
                    _ => {}
                }
            }
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                self.input.pointer_x = column as f32;
                self.input.pointer_y = row as f32;
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => self.input.button_down = true,
                    MouseEventKind::Up(MouseButton::Left) => self.input.button_down = false,
                    _ => {}
                }
            }
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    /// Advance the camera by one tick
    pub fn update(&mut self) {
        self.camera = self.camera.update(&self.input, &self.config.camera);
        // Terminals report presses but not releases, so keys last one tick
        self.input.keys = Default::default();
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn render(&mut self) -> io::Result<()> {
        let ctx = Context::for_frame(
            &self.config.projection,
            &self.camera,
            self.renderer.width() as u32,
            self.renderer.height() as u32,
        );

        self.renderer.clear();
        let renderer = &mut self.renderer;
        let texture = &self.texture;
        self.stats = self
            .pipeline
            .render_frame(&self.mesh, &ctx, texture.size, |list| {
                renderer.fill(list, texture)
            });

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "softpipe | FPS: {:.1} | tris: {}/{} | Drag=Look +WASD=Move Q=Quit",
                self.fps, self.stats.drawn, self.stats.mesh_triangles
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEventKind};

    fn app() -> TerminalApp {
        let mesh = Mesh::cube(2.0);
        let config = framing_config(&mesh);
        TerminalApp {
            camera: CameraState::new(&config.camera),
            mesh,
            config,
            input: InputSnapshot::default(),
            pipeline: Pipeline::new(),
            renderer: AsciiRenderer::new(80, 24),
            texture: CheckerTexture::default(),
            stats: FrameStats::default(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_framing_config_looks_at_center() {
        let config = framing_config(&Mesh::cube(2.0));
        assert_eq!(config.projection.default_target, Point3::origin());
        assert!(config.projection.default_eye.z < -1.0);
        assert_eq!(config.projection.pixel_aspect, CELL_ASPECT);
    }

    #[test]
    fn test_shade_by_normal_lights_faces_toward_camera() {
        let shaded = shade_by_normal(Mesh::cube(2.0));
        let level = |t: usize| match shaded.triangles()[t].surface {
            softpipe_core::Surface::Flat(color) => color.x,
            softpipe_core::Surface::Textured(_) => panic!("cube is untextured"),
        };
        // Triangles 2 and 3 are the -z face, which faces the light
        assert!(level(2) > level(0));
        assert!((level(2) - level(3)).abs() < 1e-6);
        assert!((0.25..=1.0).contains(&level(0)));
    }

    #[test]
    fn test_mouse_drag_turns_camera() {
        let mut app = app();
        let start_yaw = app.camera().yaw;

        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        app.update();
        assert!(app.camera().is_dragging());

        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 10));
        app.update();
        assert!((app.camera().yaw - start_yaw - 0.5).abs() < 1e-5);

        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 20, 10));
        app.update();
        assert!(!app.camera().is_dragging());
    }

    #[test]
    fn test_keys_last_one_tick() {
        let mut app = app();
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE)));
        assert!(app.input.keys.forward);
        app.update();
        assert!(!app.input.keys.forward);
    }

    #[test]
    fn test_quit_key_stops_loop() {
        let mut app = app();
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(!app.is_running());
    }

    #[test]
    fn test_resize_tracks_terminal() {
        let mut app = app();
        app.handle_event(Event::Resize(100, 40));
        assert_eq!((app.renderer.width(), app.renderer.height()), (100, 40));
    }
}
