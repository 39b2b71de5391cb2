/// Dice Web - WebGL2 renderer for the dice scene, driven from the page
///
/// The page creates a [`WebRenderer`] for its canvas, calls
/// [`WebRenderer::start`] once, and forwards its radio buttons and selects
/// through [`WebRenderer::select_mode`] and [`WebRenderer::update_config`].
use std::cell::RefCell;
use std::rc::Rc;

use dice_core::{Camera, RotationChannel, Scene};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, KeyboardEvent, WebGl2RenderingContext, Window};

pub mod controls;
pub mod error;
pub mod gl;

pub use error::WebError;
pub use gl::WebGlBackend;

/// Who advances the scene: the page through `render`, or the
/// animation-frame loop once `start` has run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FrameDriver {
    #[default]
    Manual,
    AnimationLoop,
}

impl FrameDriver {
    /// Hand frames to the loop; false if it already owns them
    fn start_loop(&mut self) -> bool {
        let started = *self == FrameDriver::Manual;
        *self = FrameDriver::AnimationLoop;
        started
    }

    fn allows_manual_frame(self) -> bool {
        self == FrameDriver::Manual
    }
}

struct App {
    canvas: HtmlCanvasElement,
    scene: Scene,
    backend: WebGlBackend,
    driver: FrameDriver,
}

impl App {
    fn frame(&mut self) -> Result<(), WebError> {
        let width = self.canvas.client_width().max(1);
        let height = self.canvas.client_height().max(1);
        self.backend.set_viewport(self.canvas.width() as i32, self.canvas.height() as i32);

        let projection = Camera::with_aspect(width as f32 / height as f32).projection_matrix();
        self.scene.render_frame(&mut self.backend, &projection)
    }
}

fn window() -> Result<Window, WebError> {
    web_sys::window().ok_or_else(|| WebError::Dom("no global window".into()))
}

fn request_animation_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window()?.request_animation_frame(callback.as_ref().unchecked_ref())
}

#[wasm_bindgen]
pub struct WebRenderer {
    app: Rc<RefCell<App>>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Compile the lighting program and upload the dice for `canvas_id`
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        let document = window()?
            .document()
            .ok_or_else(|| WebError::Dom("no document".into()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| WebError::Dom(format!("no element with id '{canvas_id}'")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| WebError::Dom(format!("'{canvas_id}' is not a canvas")))?;
        let gl = canvas
            .get_context("webgl2")?
            .ok_or_else(|| WebError::Dom("WebGL2 is not available".into()))?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| WebError::Dom("unexpected context type".into()))?;

        let scene = Scene::default();
        let backend = WebGlBackend::new(gl, &scene.cubes).inspect_err(|err| {
            tracing::error!(%err, "unable to initialize the shader program");
        })?;

        Ok(WebRenderer {
            app: Rc::new(RefCell::new(App {
                canvas,
                scene,
                backend,
                driver: FrameDriver::Manual,
            })),
        })
    }

    /// Draw one frame and advance the animation
    ///
    /// Ignored once the animation-frame loop is running, so each displayed
    /// frame advances the animation once.
    pub fn render(&self) -> Result<(), JsValue> {
        let mut app = self.app.borrow_mut();
        if !app.driver.allows_manual_frame() {
            tracing::warn!("render() ignored while the animation loop is running");
            return Ok(());
        }
        app.frame()?;
        Ok(())
    }

    /// Install the arrow-key listeners and start the animation-frame loop
    ///
    /// Only the first call has an effect.
    pub fn start(&self) -> Result<(), JsValue> {
        if !self.app.borrow_mut().driver.start_loop() {
            tracing::warn!("render loop already started");
            return Ok(());
        }
        let window = window()?;
        for (kind, pressed) in [("keydown", true), ("keyup", false)] {
            let app = Rc::clone(&self.app);
            let listener = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                if let Some(direction) = controls::direction_for(&event.key()) {
                    app.borrow_mut().scene.animation.direction_key(direction, pressed);
                }
            });
            window.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())?;
            listener.forget();
        }

        let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let next = Rc::clone(&callback);
        let app = Rc::clone(&self.app);
        *callback.borrow_mut() = Some(Closure::new(move || {
            if let Err(err) = app.borrow_mut().frame() {
                tracing::error!(%err, "frame failed, stopping");
                return;
            }
            if let Some(callback) = next.borrow().as_ref() {
                if let Err(err) = request_animation_frame(callback) {
                    tracing::error!(?err, "requestAnimationFrame failed");
                }
            }
        }));

        if let Some(callback) = callback.borrow().as_ref() {
            request_animation_frame(callback)?;
        }
        tracing::info!("render loop started");
        Ok(())
    }

    /// Select the rotation channel: 0 self spin, 1 pedestal, 2 world
    pub fn select_mode(&self, channel: usize) -> Result<(), JsValue> {
        let channel = RotationChannel::try_from(channel).map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.app.borrow_mut().scene.animation.select_channel(channel);
        Ok(())
    }

    /// Arrow key state for callers that handle keyboard events themselves
    pub fn direction_key(&self, key: &str, pressed: bool) {
        if let Some(direction) = controls::direction_for(key) {
            self.app.borrow_mut().scene.animation.direction_key(direction, pressed);
        }
    }

    /// Refresh the light from the page controls
    pub fn update_config(&self, power: f32, damping: i32, shading: i32, model: i32) {
        let mut app = self.app.borrow_mut();
        controls::apply_controls(&mut app.scene.light, power, damping, shading, model);
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_starts_once() {
        let mut driver = FrameDriver::default();
        assert!(driver.allows_manual_frame());
        assert!(driver.start_loop());
        assert!(!driver.start_loop());
        assert!(!driver.allows_manual_frame());
    }
}
