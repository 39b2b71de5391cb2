/// Terminal front end for the dice scene
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use dice_core::{Camera, ConfigUpdate, Scene};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod input;
pub mod renderer;

pub use config::{AppConfig, ConfigError};
pub use input::{map_key, Command};
pub use renderer::AsciiRenderer;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    cell_aspect: f32,
    target_frame_time: Duration,
    key_release_events: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &AppConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, width as usize, height as usize))
    }

    pub fn with_size(config: &AppConfig, width: usize, height: usize) -> Self {
        let mut scene = Scene::new(dice_core::CubeEntity::default_dice(), config.light_config());
        scene.animation.select_channel(config.animation.channel);

        Self {
            scene,
            renderer: AsciiRenderer::new(width, height),
            cell_aspect: config.render.cell_aspect,
            target_frame_time: Duration::from_secs_f32(1.0 / config.render.target_fps.max(1) as f32),
            key_release_events: false,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        // Key release events are needed to stop rotating when an arrow key is let go
        self.key_release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.key_release_events {
            let pushed = execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            );
            if let Err(err) = pushed {
                tracing::warn!(%err, "key release events unavailable");
                self.key_release_events = false;
            }
        }
        tracing::info!(key_release_events = self.key_release_events, "terminal renderer started");

        let result = self.main_loop();

        // Cleanup
        let pop_flags = if self.key_release_events {
            execute!(stdout(), PopKeyboardEnhancementFlags)
        } else {
            Ok(())
        };
        let cleanup = first_error([
            pop_flags,
            terminal::disable_raw_mode(),
            execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show),
        ]);

        if let Err(err) = &result {
            tracing::error!(%err, "terminal renderer stopped");
        }
        result.and(cleanup)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
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
            Event::Key(key) => {
                if let Some(command) = map_key(&key) {
                    self.apply(command);
                }
            }
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    pub fn apply(&mut self, command: Command) {
        let light = &mut self.scene.light;
        match command {
            Command::Quit => self.running = false,
            Command::Rotate { direction, pressed } => {
                self.scene.animation.direction_key(direction, pressed)
            }
            Command::SelectChannel(channel) => self.scene.animation.select_channel(channel),
            Command::Stop => self.scene.animation.stop(),
            Command::CycleLightModel => light.apply(ConfigUpdate::Model(light.model.next())),
            Command::CycleDamping => light.apply(ConfigUpdate::Damping(light.damping.next())),
            Command::ToggleShading => light.apply(ConfigUpdate::Shading(light.shading.toggle())),
            Command::AdjustPower(step) => {
                light.apply(ConfigUpdate::Power((light.power + step).max(0.0)))
            }
        }
    }

    /// Draw one frame and advance the animation
    pub fn render_frame(&mut self) {
        // A collapsed terminal still needs a non-zero aspect ratio
        let width = self.renderer.width().max(1) as f32;
        let aspect = width * self.cell_aspect / self.renderer.height().max(1) as f32;
        let projection = Camera::with_aspect(aspect).projection_matrix();
        match self.scene.render_frame(&mut self.renderer, &projection) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.render_frame();

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let light = &self.scene.light;
        let animation = &self.scene.animation;
        let stop_hint = if self.key_release_events { "" } else { " Space=Stop" };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Dice | FPS: {:.1} | {:?} {:?} damping={:?} power={:.1} | channel={:?} speed={:+.3}",
                self.fps,
                light.model,
                light.shading,
                light.damping,
                light.power,
                animation.active_channel(),
                animation.speed(),
            )),
            cursor::MoveTo(0, 1),
            Print(format!(
                "←/→=Rotate 1/2/3=Spin/Pedestal/World M=Model V=Shading D=Damping +/-=Power{stop_hint} Q=Quit"
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Every step has already run; report the first that failed
fn first_error(steps: impl IntoIterator<Item = io::Result<()>>) -> io::Result<()> {
    steps.into_iter().collect()
}
