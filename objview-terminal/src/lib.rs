/// Terminal front end: crossterm input and an ASCII render backend
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use objview_core::{FrameLoop, FrameOutcome, Mesh, OrbitController, TransformState, ViewerConfig};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Radians per arrow keypress
const KEY_ROTATE_STEP: f32 = 0.1;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    frames: FrameLoop,
    state: TransformState,
    input: OrbitController,
    renderer: AsciiRenderer,
    spin: bool,
    running: bool,
    last_error: Option<String>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: &ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let bounds = mesh.bounds();

        Ok(Self {
            state: TransformState::framing(config, &bounds),
            input: OrbitController::new(config.input.clone(), bounds.radius),
            frames: FrameLoop::new(mesh, config.camera.projection()),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            spin: false,
            running: true,
            last_error: None,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Slowly turn the mesh when idle.
    pub fn with_spin(mut self, spin: bool) -> Self {
        self.spin = spin;
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        tracing::info!(
            frames = self.frames.frame_count(),
            failed = self.frames.failed_frames(),
            "viewer closed"
        );
        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            if self.spin && !self.input.is_dragging() {
                self.state.rotate(0.0, 0.015);
            }

            // Render
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

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.renderer.resize(width as usize, height as usize),
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }

        let state = &mut self.state;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') => self.input.zoom_in(state),
            KeyCode::Char('s') => self.input.zoom_out(state),
            KeyCode::Up => state.rotate(-KEY_ROTATE_STEP, 0.0),
            KeyCode::Down => state.rotate(KEY_ROTATE_STEP, 0.0),
            KeyCode::Left => state.rotate(0.0, -KEY_ROTATE_STEP),
            KeyCode::Right => state.rotate(0.0, KEY_ROTATE_STEP),
            KeyCode::Char('j') => self.input.orbit_light(state, -1.0),
            KeyCode::Char('l') => self.input.orbit_light(state, 1.0),
            KeyCode::Char('i') => self.input.raise_light(state, 1.0),
            KeyCode::Char('k') => self.input.raise_light(state, -1.0),
            KeyCode::Char(' ') => self.spin = !self.spin,
            _ => {}
        }
    }

    fn handle_mouse(&mut self, MouseEvent { kind, column, row, .. }: MouseEvent) {
        // Rows are twice as tall as columns are wide
        let (x, y) = (column as f32, row as f32 * 2.0);
        match kind {
            MouseEventKind::Down(MouseButton::Left) => self.input.press(x, y),
            MouseEventKind::Drag(MouseButton::Left) => self.input.drag_to(&mut self.state, x, y),
            MouseEventKind::Up(MouseButton::Left) => self.input.release(),
            MouseEventKind::ScrollUp => self.input.zoom_in(&mut self.state),
            MouseEventKind::ScrollDown => self.input.zoom_out(&mut self.state),
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        match self.frames.tick(&self.state, &mut self.renderer) {
            FrameOutcome::Rendered => self.last_error = None,
            FrameOutcome::Failed(e) => self.last_error = Some(e.to_string()),
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let light = self.state.light;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "objview | FPS: {:.1} | light {:.0}°/{:.0}° | drag/arrows=rotate w/s=zoom j/l/i/k=light space=spin q=quit",
                self.fps, light.azimuth, light.elevation
            )),
            ResetColor
        )?;

        if let Some(message) = &self.last_error {
            queue!(
                stdout,
                cursor::MoveTo(0, 1),
                SetForegroundColor(Color::Red),
                Print(message),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}
