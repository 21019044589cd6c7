//! Browser host for the dotted globe: canvas 2D surface, animation frames and
//! pointer/touch/resize listeners around a [`runtime::RenderLoop`].
//!
//! The crate only has content when built for `wasm32`.
#![cfg(target_arch = "wasm32")]

mod events;
mod surface;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use foundation::Millis;
use runtime::{ConfigError, GlobeConfig, LoopPhase, PointerKind, RenderLoop, fit_surface};
use streaming::{GlooFetcher, WorldLoader};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, MouseEvent, TouchEvent, Window,
};

use crate::events::{AnimationLoop, Listener};
use crate::surface::CanvasSurface;

#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing canvas element #{0}")]
    CanvasNotFound(String),
    #[error("element #{0} is not a canvas")]
    NotACanvas(String),
    #[error("2d context unavailable")]
    ContextUnavailable,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Js(String),
}

impl From<JsValue> for MountError {
    fn from(value: JsValue) -> Self {
        MountError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn now_ms(window: &Window) -> Millis {
    Millis(
        window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now),
    )
}

struct WidgetState {
    window: Window,
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    render_loop: RenderLoop,
    requested: (f64, f64),
    /// Document listeners that live only while a drag is in progress.
    drag_listeners: Vec<Listener>,
    /// Detached listeners whose closures may still be on the stack.
    retired_listeners: Vec<Listener>,
}

impl WidgetState {
    fn apply_size(&mut self) -> Result<(), JsValue> {
        let container = self
            .canvas
            .parent_element()
            .map(|el| {
                let rect = el.get_bounding_client_rect();
                (rect.width(), rect.height())
            })
            .unwrap_or((0.0, 0.0));
        let size = fit_surface(container, self.requested);
        let dpr = self.window.device_pixel_ratio();

        self.render_loop.resize(size, dpr);
        let backing = self.render_loop.view().backing_px();
        self.canvas.set_width(backing);
        self.canvas.set_height(backing);
        let style = self.canvas.style();
        style.set_property("width", &format!("{size}px"))?;
        style.set_property("height", &format!("{size}px"))?;
        self.surface
            .set_device_pixel_ratio(self.render_loop.view().device_pixel_ratio())
    }

    fn end_drag(&mut self, now: Millis) {
        self.render_loop.pointer_up(now);
        for listener in &self.drag_listeners {
            listener.detach();
        }
        self.retired_listeners.append(&mut self.drag_listeners);
    }
}

/// A mounted globe. Dropping it or calling `unmount` stops every callback.
#[wasm_bindgen]
pub struct GlobeWidget {
    state: Rc<RefCell<WidgetState>>,
    animation: Option<AnimationLoop>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl GlobeWidget {
    /// Attach to `<canvas id=canvas_id>`, size it to its container and start
    /// loading world data. `config_json` optionally overrides defaults.
    pub fn mount(
        canvas_id: &str,
        width: f64,
        height: f64,
        class_name: Option<String>,
        config_json: Option<String>,
    ) -> Result<GlobeWidget, JsValue> {
        Ok(Self::mount_inner(canvas_id, width, height, class_name, config_json)?)
    }

    /// `"loading"`, `"ready"` or `"error"`.
    pub fn status(&self) -> String {
        let s = self.state.borrow();
        let lp = &s.render_loop;
        if lp.error().is_some() {
            "error".to_string()
        } else if lp.is_ready() {
            "ready".to_string()
        } else {
            "loading".to_string()
        }
    }

    pub fn error_message(&self) -> Option<String> {
        let s = self.state.borrow();
        s.render_loop
            .error()
            .map(|err| format!("Failed to load geographic data: {err}"))
    }

    pub fn dot_count(&self) -> usize {
        self.state.borrow().render_loop.dots().len()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().render_loop.phase() == LoopPhase::Dragging
    }

    pub fn unmount(&mut self) {
        if let Some(animation) = self.animation.take() {
            animation.cancel();
        }
        self.listeners.clear();
        if let Ok(mut s) = self.state.try_borrow_mut() {
            s.drag_listeners.clear();
            s.retired_listeners.clear();
            s.render_loop.cancel_interaction();
        }
    }
}

impl Drop for GlobeWidget {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl GlobeWidget {
    fn mount_inner(
        canvas_id: &str,
        width: f64,
        height: f64,
        class_name: Option<String>,
        config_json: Option<String>,
    ) -> Result<GlobeWidget, MountError> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => GlobeConfig::from_json_str(json)?,
            _ => GlobeConfig::default(),
        };

        let window = web_sys::window().ok_or(MountError::NoWindow)?;
        let document = window.document().ok_or(MountError::NoDocument)?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| MountError::CanvasNotFound(canvas_id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| MountError::NotACanvas(canvas_id.to_string()))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or(MountError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| MountError::ContextUnavailable)?;

        if let Some(class) = class_name.as_deref().filter(|c| !c.trim().is_empty()) {
            canvas.set_class_name(class);
        }
        let style = canvas.style();
        style.set_property("background", "transparent")?;
        style.set_property("border-radius", "50%")?;

        let sources = config.world_sources();
        let mut render_loop =
            RenderLoop::new(config, width.min(height), window.device_pixel_ratio());
        render_loop.begin_loading();

        let state = Rc::new(RefCell::new(WidgetState {
            window: window.clone(),
            canvas: canvas.clone(),
            surface: CanvasSurface::new(ctx),
            render_loop,
            requested: (width, height),
            drag_listeners: Vec::new(),
            retired_listeners: Vec::new(),
        }));
        state.borrow_mut().apply_size()?;

        let listeners = vec![
            mouse_down_listener(&canvas, &document, &state)?,
            touch_start_listener(&canvas, &document, &state)?,
            resize_listener(&window, &state)?,
        ];

        let weak = Rc::downgrade(&state);
        let animation = AnimationLoop::start(&window, move |timestamp| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let Ok(mut s) = state.try_borrow_mut() else {
                return;
            };
            s.retired_listeners.clear();
            let WidgetState {
                surface,
                render_loop,
                ..
            } = &mut *s;
            render_loop.frame(Millis(timestamp), surface);
        })?;

        let weak = Rc::downgrade(&state);
        spawn_local(async move {
            let loader = WorldLoader::new(GlooFetcher, sources);
            let result = loader.load().await;
            if let Err(err) = &result {
                console_error(&format!("Error loading world data: {err}"));
            }
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().render_loop.on_load_result(result);
            }
        });

        Ok(GlobeWidget {
            state,
            animation: Some(animation),
            listeners,
        })
    }
}

fn mouse_down_listener(
    canvas: &HtmlCanvasElement,
    document: &Document,
    state: &Rc<RefCell<WidgetState>>,
) -> Result<Listener, JsValue> {
    let weak = Rc::downgrade(state);
    let document = document.clone();
    Listener::new(canvas, "mousedown", move |event: Event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let x = f64::from(event.client_x());
        if let Err(err) = begin_drag(&weak, &document, PointerKind::Mouse, x) {
            console_error(&format!("drag start failed: {err:?}"));
        }
    })
}

fn touch_start_listener(
    canvas: &HtmlCanvasElement,
    document: &Document,
    state: &Rc<RefCell<WidgetState>>,
) -> Result<Listener, JsValue> {
    let weak = Rc::downgrade(state);
    let document = document.clone();
    Listener::active(canvas, "touchstart", move |event: Event| {
        event.prevent_default();
        let Some(x) = event.dyn_ref::<TouchEvent>().and_then(first_touch_x) else {
            return;
        };
        if let Err(err) = begin_drag(&weak, &document, PointerKind::Touch, x) {
            console_error(&format!("drag start failed: {err:?}"));
        }
    })
}

fn resize_listener(window: &Window, state: &Rc<RefCell<WidgetState>>) -> Result<Listener, JsValue> {
    let weak = Rc::downgrade(state);
    Listener::new(window, "resize", move |_event: Event| {
        let Some(state) = weak.upgrade() else {
            return;
        };
        if let Err(err) = state.borrow_mut().apply_size() {
            console_error(&format!("resize failed: {err:?}"));
        }
    })
}

fn first_touch_x(event: &TouchEvent) -> Option<f64> {
    event.touches().get(0).map(|t| f64::from(t.client_x()))
}

/// Start a drag and hang move/end listeners on the document until it ends.
fn begin_drag(
    weak: &Weak<RefCell<WidgetState>>,
    document: &Document,
    kind: PointerKind,
    x: f64,
) -> Result<(), JsValue> {
    let Some(state) = weak.upgrade() else {
        return Ok(());
    };
    let mut s = state.borrow_mut();
    if !s.render_loop.pointer_down(kind, x) {
        return Ok(());
    }

    let (move_event, end_event) = match kind {
        PointerKind::Mouse => ("mousemove", "mouseup"),
        PointerKind::Touch => ("touchmove", "touchend"),
    };

    let on_move = {
        let weak = weak.clone();
        move |event: Event| {
            let x = match kind {
                PointerKind::Mouse => event
                    .dyn_ref::<MouseEvent>()
                    .map(|e| f64::from(e.client_x())),
                PointerKind::Touch => {
                    event.prevent_default();
                    event.dyn_ref::<TouchEvent>().and_then(first_touch_x)
                }
            };
            let (Some(x), Some(state)) = (x, weak.upgrade()) else {
                return;
            };
            if let Ok(mut s) = state.try_borrow_mut() {
                s.render_loop.pointer_move(x);
            }
        }
    };
    let on_end = {
        let weak = weak.clone();
        move |_event: Event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            if let Ok(mut s) = state.try_borrow_mut() {
                let now = now_ms(&s.window);
                s.end_drag(now);
            }
        }
    };

    let move_listener = match kind {
        PointerKind::Mouse => Listener::new(document, move_event, on_move)?,
        PointerKind::Touch => Listener::active(document, move_event, on_move)?,
    };
    let end_listener = Listener::new(document, end_event, on_end)?;
    s.drag_listeners = vec![move_listener, end_listener];
    Ok(())
}
