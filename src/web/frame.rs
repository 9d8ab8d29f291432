// frame.rs - requestAnimationFrame loop with a cancel handle
//
// The closure reschedules itself through a shared slot. Cancelling
// clears the pending request and drops the closure, which breaks the
// self-reference so everything it captured is freed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::{GalleryError, GalleryResult};

type Tick = Closure<dyn FnMut(f64)>;

pub struct FrameLoop {
    window: Window,
    slot: Rc<RefCell<Option<Tick>>>,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    /// Call `tick(now_ms)` every animation frame until cancelled.
    pub fn start(window: Window, mut tick: impl FnMut(f64) + 'static) -> GalleryResult<Self> {
        let slot: Rc<RefCell<Option<Tick>>> = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let next = {
            let window = window.clone();
            let slot = slot.clone();
            let pending = pending.clone();
            Closure::wrap(Box::new(move |now: f64| {
                pending.set(None);
                tick(now);
                // tick may have cancelled us
                if let Some(f) = slot.borrow().as_ref() {
                    match window.request_animation_frame(f.as_ref().unchecked_ref()) {
                        Ok(id) => pending.set(Some(id)),
                        Err(e) => log::error!("frame loop: could not reschedule: {e:?}"),
                    }
                }
            }) as Box<dyn FnMut(f64)>)
        };

        let id = window
            .request_animation_frame(next.as_ref().unchecked_ref())
            .map_err(|e| GalleryError::dom(format!("requestAnimationFrame: {e:?}")))?;
        pending.set(Some(id));
        *slot.borrow_mut() = Some(next);

        Ok(Self { window, slot, pending })
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // dropping the closure from inside its own call is deferred by
        // wasm-bindgen until the call returns
        self.slot.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
