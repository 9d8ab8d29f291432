// host.rs - The JS-facing gallery handle
//
// Mounts a canvas in the container, wires window input into the scene and
// drives it from a `FrameLoop`. Everything is torn down by `destroy()` or
// when the handle is dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Object, Reflect, JSON};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Event, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent, WebGl2RenderingContext, WheelEvent, Window,
};

use super::events::ListenerSet;
use super::frame::FrameLoop;
use super::gl::GlRenderer;
use super::media::WebMedia;
use crate::config::GalleryConfig;
use crate::error::{GalleryError, GalleryResult};
use crate::playback::PlaybackBudget;
use crate::scene::{GalleryScene, Screen};

/// Page-wide cap on decoding videos, shared by galleries built with it.
#[wasm_bindgen]
pub struct DecodeBudget {
    inner: PlaybackBudget,
}

#[wasm_bindgen]
impl DecodeBudget {
    #[wasm_bindgen(constructor)]
    pub fn new(page_cap: Option<u32>) -> Self {
        let inner = match page_cap {
            Some(cap) => PlaybackBudget::with_page_cap(cap as usize),
            None => PlaybackBudget::unbounded(),
        };
        Self { inner }
    }

    #[wasm_bindgen(getter, js_name = inUse)]
    pub fn in_use(&self) -> u32 {
        self.inner.in_use() as u32
    }
}

struct Inner {
    window: Window,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    scene: GalleryScene<WebMedia>,
    renderer: GlRenderer,
    dpr: f64,
}

impl Inner {
    fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn tick(&mut self, now: f64) {
        for event in self.scene.backend().drain() {
            self.scene.apply_media_event(event, now);
        }
        self.scene.frame(now);
        self.renderer.draw(&mut self.scene);
    }

    fn resize(&mut self) {
        let screen = screen_of(&self.window, &self.container);
        let (w, h) = (screen.size.width as f64, screen.size.height as f64);
        let (px_w, px_h) = ((w * self.dpr).round() as u32, (h * self.dpr).round() as u32);
        self.canvas.set_width(px_w);
        self.canvas.set_height(px_h);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{w}px"));
        let _ = style.set_property("height", &format!("{h}px"));
        self.renderer.set_viewport(px_w as i32, px_h as i32);
        self.scene.resize(screen);
    }
}

fn screen_of(window: &Window, container: &HtmlElement) -> Screen {
    let window_width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Screen::new(container.client_width() as f32, container.client_height() as f32).with_window_width(window_width)
}

fn mouse_x(event: &Event) -> Option<f32> {
    event.dyn_ref::<MouseEvent>().map(|e| e.client_x() as f32)
}

fn touch_x(event: &Event) -> Option<f32> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some(touch.client_x() as f32)
}

/// Route an event to the gallery unless it is mid-frame.
fn route(inner: &Rc<RefCell<Inner>>, f: fn(&mut Inner, &Event)) -> impl FnMut(Event) + 'static {
    let inner = inner.clone();
    move |event: Event| {
        if let Ok(mut inner) = inner.try_borrow_mut() {
            f(&mut inner, &event);
        }
    }
}

fn webgl2(canvas: &HtmlCanvasElement) -> GalleryResult<WebGl2RenderingContext> {
    let options = Object::new();
    for (key, value) in [("alpha", true), ("antialias", true), ("premultipliedAlpha", false)] {
        let _ = Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_bool(value));
    }
    canvas
        .get_context_with_context_options("webgl2", &options)
        .map_err(|e| GalleryError::gl(format!("getContext: {e:?}")))?
        .ok_or_else(|| GalleryError::gl("webgl2 unavailable"))?
        .dyn_into::<WebGl2RenderingContext>()
        .map_err(|_| GalleryError::gl("context is not webgl2"))
}

fn parse_config(config: &JsValue) -> GalleryResult<GalleryConfig> {
    if config.is_undefined() || config.is_null() {
        return Ok(GalleryConfig::default());
    }
    let json = JSON::stringify(config)
        .map_err(|e| GalleryError::config(format!("config is not serialisable: {e:?}")))?
        .as_string()
        .unwrap_or_else(|| "null".to_string());
    GalleryConfig::from_json(&json)
}

#[wasm_bindgen]
pub struct CircularGallery {
    inner: Option<Rc<RefCell<Inner>>>,
    frame: Option<FrameLoop>,
    listeners: ListenerSet,
    gesture: Rc<RefCell<ListenerSet>>,
}

#[wasm_bindgen]
impl CircularGallery {
    /// Mount a gallery in `container`. `config` is a plain object; every
    /// field is optional.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, config: JsValue) -> Result<CircularGallery, JsValue> {
        Ok(Self::mount(container, &config, &PlaybackBudget::unbounded())?)
    }

    /// Mount a gallery that shares `budget` with the other galleries on the page.
    #[wasm_bindgen(js_name = withBudget)]
    pub fn with_budget(
        container: HtmlElement,
        config: JsValue,
        budget: &DecodeBudget,
    ) -> Result<CircularGallery, JsValue> {
        Ok(Self::mount(container, &config, &budget.inner)?)
    }

    #[wasm_bindgen(js_name = focusedIndex)]
    pub fn focused_index(&self) -> Option<u32> {
        let inner = self.inner.as_ref()?.borrow();
        inner.scene.focused_index().map(|i| i as u32)
    }

    #[wasm_bindgen(js_name = focusedLabel)]
    pub fn focused_label(&self) -> Option<String> {
        let inner = self.inner.as_ref()?.borrow();
        inner.scene.focused_label().map(str::to_string)
    }

    #[wasm_bindgen(getter, js_name = planeCount)]
    pub fn plane_count(&self) -> u32 {
        self.inner.as_ref().map(|i| i.borrow().scene.items().len() as u32).unwrap_or(0)
    }

    /// Retry playback, e.g. from the host page's own gesture handler.
    pub fn resume(&self) {
        if let Some(inner) = &self.inner {
            inner.borrow().scene.resume_playback();
        }
    }

    /// Stop the loop, detach listeners, release media and remove the canvas.
    /// Calling it again does nothing.
    pub fn destroy(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.cancel();
        }
        self.listeners.clear();
        self.gesture.borrow_mut().clear();

        let Some(inner) = self.inner.take() else { return };
        let mut inner = inner.borrow_mut();
        inner.scene.destroy();
        inner.scene.backend_mut().shutdown();
        inner.renderer.teardown();
        inner.canvas.remove();
        log::info!("gallery unmounted");
    }
}

impl CircularGallery {
    fn mount(container: HtmlElement, config: &JsValue, budget: &PlaybackBudget) -> GalleryResult<Self> {
        let config = parse_config(config)?;
        let window = web_sys::window().ok_or_else(|| GalleryError::dom("no window"))?;
        let document = window.document().ok_or_else(|| GalleryError::dom("no document"))?;

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| GalleryError::dom(format!("create canvas: {e:?}")))?
            .dyn_into()
            .map_err(|_| GalleryError::dom("created element is not a canvas"))?;
        let _ = canvas.style().set_property("display", "block");
        container
            .append_child(&canvas)
            .map_err(|e| GalleryError::dom(format!("append canvas: {e:?}")))?;

        let screen = screen_of(&window, &container);
        let dpr = if screen.is_mobile() { 1.0 } else { window.device_pixel_ratio().min(2.0) };

        let built = webgl2(&canvas).and_then(|gl| {
            let scene = GalleryScene::new(WebMedia::new(document), &config, screen, budget);
            let renderer = GlRenderer::new(gl, screen.is_mobile(), scene.items().len())?;
            Ok((scene, renderer))
        });
        let (scene, renderer) = match built {
            Ok(parts) => parts,
            Err(e) => {
                canvas.remove();
                return Err(e);
            }
        };

        let mut inner = Inner { window: window.clone(), container, canvas, scene, renderer, dpr };
        inner.resize();
        let inner = Rc::new(RefCell::new(inner));

        let mut gallery =
            Self { inner: Some(inner.clone()), frame: None, listeners: ListenerSet::new(), gesture: Rc::default() };
        gallery.listen(&window, &inner)?;

        let gesture_done = Rc::new(Cell::new(false));
        for kind in ["click", "touchend"] {
            let inner = inner.clone();
            let done = gesture_done.clone();
            gallery.gesture.borrow_mut().add(&window, kind, true, move |_| {
                if done.replace(true) {
                    return;
                }
                if let Ok(inner) = inner.try_borrow() {
                    inner.scene.resume_playback();
                }
            })?;
        }

        let tick_inner = inner.clone();
        let gesture = gallery.gesture.clone();
        gallery.frame = Some(FrameLoop::start(window, move |now| {
            // one-shot listeners are removed here, outside their own call
            if gesture_done.get() && !gesture.borrow().is_empty() {
                gesture.borrow_mut().clear();
            }
            if let Ok(mut inner) = tick_inner.try_borrow_mut() {
                inner.tick(now);
            }
        })?);

        log::info!("gallery mounted ({} planes, dpr {dpr})", inner.borrow().scene.items().len());
        Ok(gallery)
    }

    fn listen(&mut self, window: &Window, inner: &Rc<RefCell<Inner>>) -> GalleryResult<()> {
        self.listeners.add(window, "resize", true, route(inner, |i, _| i.resize()))?;
        self.listeners.add(
            window,
            "wheel",
            true,
            route(inner, |i, e| {
                if let Some(wheel) = e.dyn_ref::<WheelEvent>() {
                    let now = i.now();
                    i.scene.wheel(wheel.delta_y() as f32, now);
                }
            }),
        )?;

        self.listeners.add(
            window,
            "mousedown",
            true,
            route(inner, |i, e| {
                if let Some(x) = mouse_x(e) {
                    i.scene.pointer_down(x);
                }
            }),
        )?;
        self.listeners.add(
            window,
            "mousemove",
            true,
            route(inner, |i, e| {
                if let Some(x) = mouse_x(e) {
                    i.scene.pointer_move(x);
                }
            }),
        )?;
        self.listeners.add(window, "mouseup", true, route(inner, |i, _| i.scene.pointer_up()))?;

        self.listeners.add(
            window,
            "touchstart",
            true,
            route(inner, |i, e| {
                if let Some(x) = touch_x(e) {
                    i.scene.pointer_down(x);
                }
            }),
        )?;
        self.listeners.add(
            window,
            "touchmove",
            true,
            route(inner, |i, e| {
                if let Some(x) = touch_x(e) {
                    i.scene.pointer_move(x);
                }
            }),
        )?;
        self.listeners.add(window, "touchend", true, route(inner, |i, _| i.scene.pointer_up()))?;
        Ok(())
    }
}

impl Drop for CircularGallery {
    fn drop(&mut self) {
        self.destroy();
    }
}
