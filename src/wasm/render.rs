use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    window, Document, HtmlCanvasElement, HtmlImageElement, MouseEvent, TouchEvent, VisibilityState,
    WebGlProgram, Window,
};

use super::context::GlContext;
use super::framebuffers::FramebufferSet;
use super::layer::Layer;
use super::program::build_program;
use crate::config::ParallaxConfig;
use crate::driver::RendererState;
use crate::error::{RenderError, RenderResult};
use crate::geometry::Size;
use crate::input::{normalize, ContactFilter, Phase, PointerEvent};
use crate::shader;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// GL objects that need no images: the context, the offscreen pair and one
/// linked program per configured layer. Built before any image is requested
/// so shader and allocation failures surface from the entry point.
pub struct Pipeline {
    gl: GlContext,
    framebuffers: FramebufferSet,
    programs: Vec<WebGlProgram>,
}

impl Pipeline {
    pub fn new(canvas: &HtmlCanvasElement, config: &ParallaxConfig) -> RenderResult<Self> {
        let gl = GlContext::negotiate(canvas)?;
        gl.clear_color(config.clear_color);
        gl.configure_blending();

        let framebuffers = FramebufferSet::new(&gl)?;
        let programs = config
            .layers
            .iter()
            .map(|_| build_program(&gl, shader::LAYER_VERTEX, shader::LAYER_FRAGMENT))
            .collect::<RenderResult<Vec<_>>>()?;
        tracing::debug!(version = gl.version(), programs = programs.len(), "pipeline ready");
        Ok(Self {
            gl,
            framebuffers,
            programs,
        })
    }
}

/// Owns the GL objects and the frame-loop state.
pub struct Renderer {
    gl: GlContext,
    canvas: HtmlCanvasElement,
    framebuffers: FramebufferSet,
    layers: Vec<Layer>,
    state: RendererState,
    contacts: ContactFilter,
    viewport: Size,
    pending_frame: Option<i32>,
}

impl Renderer {
    /// Builds layers for the images that loaded; `images` pairs each with its
    /// index into `config.layers`.
    pub fn new(
        canvas: HtmlCanvasElement,
        pipeline: Pipeline,
        config: &ParallaxConfig,
        images: &[(usize, HtmlImageElement)],
        now: f64,
    ) -> RenderResult<Self> {
        let Pipeline {
            gl,
            framebuffers,
            programs,
        } = pipeline;
        let mut layers = Vec::with_capacity(images.len());
        for (index, image) in images {
            let (Some(layer), Some(program)) = (config.layers.get(*index), programs.get(*index)) else {
                tracing::warn!(index, "image has no configured layer");
                continue;
            };
            layers.push(Layer::new(&gl, program.clone(), image, layer, *index, &framebuffers)?);
        }
        if layers.is_empty() {
            tracing::warn!("no layer images available; showing the clear colour");
        }

        let mut renderer = Self {
            gl,
            canvas,
            framebuffers,
            layers,
            state: RendererState::new(now, f64::from(config.max_frame_delta_ms)),
            contacts: ContactFilter::new(),
            viewport: Size::new(0.0, 0.0),
            pending_frame: None,
        };
        renderer.resize()?;
        Ok(renderer)
    }

    /// Matches the backing store to the layout size, then refits everything to it.
    pub fn resize(&mut self) -> RenderResult<()> {
        let width = self.canvas.client_width().max(1);
        let height = self.canvas.client_height().max(1);
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        self.viewport = Size::new(width as f32, height as f32);

        self.gl.bind_framebuffer(None);
        self.gl.viewport(width, height);
        self.gl.clear();
        self.framebuffers.resize(&self.gl, width, height)?;
        for layer in &mut self.layers {
            layer.scale(self.viewport);
        }
        tracing::debug!(width, height, "resized viewport");
        Ok(())
    }

    /// One tick: clear, then update and draw every layer back to front.
    /// Returns `false` while suspended.
    pub fn draw_frame(&mut self, now: f64) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.framebuffers.clear_all(&self.gl);
        if self.state.frame(now, &mut self.layers).is_none() {
            return false;
        }
        for layer in &self.layers {
            layer.render(&self.framebuffers);
        }
        true
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        if self.contacts.accept(&event) && event.is_positional() {
            let position = normalize(event.client_x, event.client_y, self.viewport);
            self.state.pointer_mut().record(position);
        }
    }

    /// Stops the loop and rewinds every layer. Returns the frame to cancel, if any.
    pub fn suspend(&mut self) -> Option<i32> {
        if self.state.suspend(&mut self.layers) {
            self.contacts.clear();
            tracing::debug!("animation suspended");
        }
        self.pending_frame.take()
    }

    /// Returns `true` when the loop needs to be rescheduled.
    pub fn resume(&mut self, now: f64) -> bool {
        let resumed = self.state.resume(now);
        if resumed {
            tracing::debug!("animation resumed");
        }
        resumed && self.pending_frame.is_none()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

/// Builds the renderer, wires up window events and starts the frame loop.
pub fn start(
    canvas: HtmlCanvasElement,
    pipeline: Pipeline,
    config: &ParallaxConfig,
    images: Vec<(usize, HtmlImageElement)>,
) -> RenderResult<()> {
    let window = window().ok_or_else(|| RenderError::Js("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| RenderError::Js("no document".into()))?;
    let now = performance_now(&window);

    let renderer = Rc::new(RefCell::new(Renderer::new(canvas, pipeline, config, &images, now)?));

    // Animation loop
    // `callback` holds the animation-frame closure so it can keep calling
    // `request_animation_frame` on itself; the `Option` lets the closure be
    // created before it can refer to itself.
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    {
        let renderer = renderer.clone();
        let next = callback.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            let running = {
                let mut renderer = renderer.borrow_mut();
                renderer.pending_frame = None;
                renderer.draw_frame(now)
            };
            if running {
                schedule(&renderer, &next);
            }
        }) as Box<dyn FnMut(f64)>));
    }

    install_listeners(&window, &document, &renderer, &callback)?;
    schedule(&renderer, &callback);
    tracing::info!(layers = renderer.borrow().layers().len(), "renderer started");
    Ok(())
}

fn schedule(renderer: &Rc<RefCell<Renderer>>, callback: &FrameCallback) {
    let Some(window) = window() else { return };
    let callback = callback.borrow();
    let Some(closure) = callback.as_ref() else { return };
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => renderer.borrow_mut().pending_frame = Some(id),
        Err(err) => tracing::error!(err = %RenderError::from(err), "failed to schedule frame"),
    }
}

fn performance_now(window: &Window) -> f64 {
    window.performance().map_or(0.0, |p| p.now())
}

fn install_listeners(
    window: &Window,
    document: &Document,
    renderer: &Rc<RefCell<Renderer>>,
    callback: &FrameCallback,
) -> RenderResult<()> {
    // Resize resizes the canvas and GL buffers before the next tick runs.
    {
        let renderer = renderer.clone();
        listen(window, "resize", move |_: web_sys::Event| {
            if let Err(err) = renderer.borrow_mut().resize() {
                tracing::error!(%err, "resize failed");
            }
        })?;
    }

    for name in ["pagehide", "beforeunload"] {
        let renderer = renderer.clone();
        listen(window, name, move |_: web_sys::Event| suspend(&renderer))?;
    }

    {
        let renderer = renderer.clone();
        let callback = callback.clone();
        let target = document.clone();
        listen(document, "visibilitychange", move |_: web_sys::Event| {
            if target.visibility_state() == VisibilityState::Hidden {
                suspend(&renderer);
            } else {
                let now = web_sys::window().map_or(0.0, |w| performance_now(&w));
                let reschedule = renderer.borrow_mut().resume(now);
                if reschedule {
                    schedule(&renderer, &callback);
                }
            }
        })?;
    }

    {
        let renderer = renderer.clone();
        listen(window, "mousemove", move |event: MouseEvent| {
            renderer.borrow_mut().pointer(PointerEvent::mouse(
                Phase::Move,
                event.client_x() as f32,
                event.client_y() as f32,
            ));
        })?;
    }

    for (name, phase) in [
        ("touchstart", Phase::Start),
        ("touchmove", Phase::Move),
        ("touchend", Phase::End),
        ("touchcancel", Phase::Cancel),
    ] {
        let renderer = renderer.clone();
        listen(window, name, move |event: TouchEvent| {
            let Some(touch) = event.changed_touches().get(0) else {
                return;
            };
            renderer.borrow_mut().pointer(PointerEvent::touch(
                touch.identifier(),
                phase,
                touch.client_x() as f32,
                touch.client_y() as f32,
            ));
        })?;
    }
    Ok(())
}

fn suspend(renderer: &Rc<RefCell<Renderer>>) {
    let pending = renderer.borrow_mut().suspend();
    if let (Some(id), Some(window)) = (pending, window()) {
        if let Err(err) = window.cancel_animation_frame(id) {
            tracing::warn!(err = %RenderError::from(err), "failed to cancel frame");
        }
    }
}

/// Registers a listener for the lifetime of the page.
fn listen<E, F>(target: &web_sys::EventTarget, name: &str, handler: F) -> RenderResult<()>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
