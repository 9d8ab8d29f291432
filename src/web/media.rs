// media.rs - DOM-backed media loading
//
// Elements are created detached from the document. Load and readiness
// callbacks only push `MediaEvent`s into a shared inbox; the frame loop
// drains it into the scene, so no callback ever touches scene state.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlImageElement, HtmlVideoElement};

use super::events::ListenerSet;
use crate::error::{GalleryError, GalleryResult};
use crate::media::{MediaBackend, MediaEvent, MediaEventKind, VideoHandle};

pub type Inbox = Rc<RefCell<Vec<MediaEvent>>>;

type FrameCallback = Closure<dyn FnMut(JsValue, JsValue)>;

fn push(inbox: &Inbox, item: usize, kind: MediaEventKind) {
    inbox.borrow_mut().push(MediaEvent::new(item, kind));
}

pub struct WebVideo {
    element: HtmlVideoElement,
    inbox: Inbox,
    item: usize,
    listeners: ListenerSet,
    swallow: Closure<dyn FnMut(JsValue)>,
    frames: Rc<RefCell<Option<FrameCallback>>>,
    released: Rc<Cell<bool>>,
}

impl WebVideo {
    fn open(document: &Document, inbox: &Inbox, item: usize, url: &str) -> GalleryResult<Self> {
        let element: HtmlVideoElement = document
            .create_element("video")
            .map_err(|e| GalleryError::dom(format!("create video: {e:?}")))?
            .dyn_into()
            .map_err(|_| GalleryError::dom("created element is not a video"))?;

        element.set_cross_origin(Some("anonymous"));
        element.set_muted(true);
        element.set_default_muted(true);
        element.set_loop(true);
        element.set_preload("auto");
        for attr in ["muted", "playsinline", "webkit-playsinline"] {
            let _ = element.set_attribute(attr, "");
        }
        element.set_src(url);

        let mut listeners = ListenerSet::new();
        {
            let inbox = inbox.clone();
            let video = element.clone();
            listeners.add(&element, "loadedmetadata", true, move |_| {
                let kind = MediaEventKind::VideoMetadata { width: video.video_width(), height: video.video_height() };
                push(&inbox, item, kind);
            })?;
        }
        {
            let inbox = inbox.clone();
            listeners.add(&element, "canplay", true, move |_| push(&inbox, item, MediaEventKind::VideoCanPlay))?;
        }
        {
            let inbox = inbox.clone();
            let src = url.to_string();
            listeners.add(&element, "error", true, move |_| {
                log::debug!("video {item}: failed to load {src}");
                push(&inbox, item, MediaEventKind::Failed);
            })?;
        }

        element.load();

        Ok(Self {
            element,
            inbox: inbox.clone(),
            item,
            listeners,
            swallow: Closure::wrap(Box::new(|_| {}) as Box<dyn FnMut(JsValue)>),
            frames: Rc::new(RefCell::new(None)),
            released: Rc::new(Cell::new(false)),
        })
    }

    pub fn element(&self) -> &HtmlVideoElement {
        &self.element
    }

    fn request_frame(element: &HtmlVideoElement, frames: &Rc<RefCell<Option<FrameCallback>>>) -> bool {
        let Ok(rvfc) = Reflect::get(element, &JsValue::from_str("requestVideoFrameCallback")) else {
            return false;
        };
        let Some(rvfc) = rvfc.dyn_ref::<Function>() else { return false };
        let slot = frames.borrow();
        let Some(cb) = slot.as_ref() else { return false };
        rvfc.call1(element, cb.as_ref()).is_ok()
    }
}

impl VideoHandle for WebVideo {
    fn play(&self) {
        match self.element.play() {
            // autoplay may be refused until a gesture; resume_playback retries
            Ok(promise) => {
                let _ = promise.catch(&self.swallow);
            }
            Err(e) => log::debug!("video {}: play threw {e:?}", self.item),
        }
    }

    fn pause(&self) {
        let _ = self.element.pause();
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn has_current_data(&self) -> bool {
        self.element.ready_state() >= 2
    }

    fn prime(&self) {
        if self.element.current_time() < 0.1 {
            self.element.set_current_time(0.1);
        }
    }

    fn prewarm(&self) {
        self.element.set_preload("auto");
        self.element.load();
    }

    fn watch_frames(&mut self) -> bool {
        let has_api = Reflect::get(&self.element, &JsValue::from_str("requestVideoFrameCallback"))
            .map(|f| f.is_function())
            .unwrap_or(false);
        if !has_api {
            return false;
        }

        let inbox = self.inbox.clone();
        let item = self.item;
        let element = self.element.clone();
        let frames = self.frames.clone();
        let released = self.released.clone();
        let callback = Closure::wrap(Box::new(move |_now: JsValue, _meta: JsValue| {
            if released.get() {
                return;
            }
            push(&inbox, item, MediaEventKind::VideoFrame);
            WebVideo::request_frame(&element, &frames);
        }) as Box<dyn FnMut(JsValue, JsValue)>);

        *self.frames.borrow_mut() = Some(callback);
        Self::request_frame(&self.element, &self.frames)
    }

    fn release(&mut self) {
        self.released.set(true);
        self.listeners.clear();
        let _ = self.element.pause();
        let _ = self.element.remove_attribute("src");
        self.element.set_src("");
        self.element.load();
        self.frames.borrow_mut().take();
    }
}

/// Media backend over `document`, reporting into one inbox.
pub struct WebMedia {
    document: Document,
    inbox: Inbox,
    images: HashMap<usize, HtmlImageElement>,
    posters: HashMap<usize, HtmlImageElement>,
    listeners: ListenerSet,
}

impl WebMedia {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            inbox: Rc::new(RefCell::new(Vec::new())),
            images: HashMap::new(),
            posters: HashMap::new(),
            listeners: ListenerSet::new(),
        }
    }

    pub fn drain(&self) -> Vec<MediaEvent> {
        std::mem::take(&mut *self.inbox.borrow_mut())
    }

    pub fn image(&self, item: usize) -> Option<&HtmlImageElement> {
        self.images.get(&item)
    }

    pub fn poster(&self, item: usize) -> Option<&HtmlImageElement> {
        self.posters.get(&item)
    }

    /// Drop pending loads and their callbacks.
    pub fn shutdown(&mut self) {
        self.listeners.clear();
        for img in self.images.values().chain(self.posters.values()) {
            img.set_src("");
        }
        self.images.clear();
        self.posters.clear();
        self.inbox.borrow_mut().clear();
    }

    fn load_image(
        &mut self,
        item: usize,
        url: &str,
        loaded: fn(&HtmlImageElement) -> MediaEventKind,
    ) -> GalleryResult<HtmlImageElement> {
        let img = HtmlImageElement::new().map_err(|e| GalleryError::dom(format!("create img: {e:?}")))?;
        img.set_cross_origin(Some("anonymous"));
        img.set_decoding("async");

        {
            let inbox = self.inbox.clone();
            let el = img.clone();
            self.listeners.add(&img, "load", true, move |_| push(&inbox, item, loaded(&el)))?;
        }
        {
            let inbox = self.inbox.clone();
            let src = url.to_string();
            self.listeners.add(&img, "error", true, move |_| {
                log::debug!("image {item}: failed to load {src}");
                push(&inbox, item, MediaEventKind::Failed);
            })?;
        }

        img.set_src(url);
        Ok(img)
    }
}

impl MediaBackend for WebMedia {
    type Video = WebVideo;

    fn open_video(&mut self, item: usize, url: &str) -> GalleryResult<WebVideo> {
        WebVideo::open(&self.document, &self.inbox, item, url)
    }

    fn open_image(&mut self, item: usize, url: &str) -> GalleryResult<()> {
        let img = self.load_image(item, url, |el| MediaEventKind::ImageLoaded {
            width: el.natural_width(),
            height: el.natural_height(),
        })?;
        self.images.insert(item, img);
        Ok(())
    }

    fn open_poster(&mut self, item: usize, url: &str) -> GalleryResult<()> {
        let img = self.load_image(item, url, |_| MediaEventKind::PosterLoaded)?;
        self.posters.insert(item, img);
        Ok(())
    }
}
