//! DOM listener and animation-frame handles that unregister themselves.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget, Window};

/// An event listener attached to `target` for as long as the handle lives.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    /// Like [`Listener::new`] but allowed to call `preventDefault` (touch scrolling).
    pub fn active<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    /// Unregister without dropping the closure, so a handler may detach itself.
    pub fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(
                self.event,
                self.callback.as_ref().unchecked_ref(),
            );
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.detach();
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Self-rescheduling `requestAnimationFrame` loop, stopped by [`AnimationLoop::cancel`].
pub struct AnimationLoop {
    window: Window,
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl AnimationLoop {
    /// Call `tick` with the frame timestamp (ms) on every animation frame.
    pub fn start<F>(window: &Window, mut tick: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) + 'static,
    {
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        let reschedule = Rc::clone(&callback);
        let pending_id = Rc::clone(&pending);
        let win = window.clone();
        *callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            pending_id.set(None);
            tick(timestamp);
            if let Some(cb) = reschedule.borrow().as_ref() {
                pending_id.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
            }
        }));

        let first = match callback.borrow().as_ref() {
            Some(cb) => window.request_animation_frame(cb.as_ref().unchecked_ref())?,
            None => return Err(JsValue::from_str("animation callback missing")),
        };
        pending.set(Some(first));

        Ok(Self {
            window: window.clone(),
            pending,
            callback,
        })
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Dropping the closure breaks its reference cycle with `callback`.
        self.callback.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
