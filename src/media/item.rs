// item.rs - One plane on the track and the media behind it
//
// An item owns its placement (track slot, wraparound offset, arc pose),
// two texture slots (primary media and poster) and, for videos, the
// element handle plus its play gate.

use super::fade::{Crossfade, UploadThrottle};
use super::source::{derive_poster_url, optimized_video_url, MediaKind};
use super::{MediaBackend, MediaEventKind, VideoHandle};
use crate::config::GalleryItem;
use crate::scroll::{Direction, ScrollState};
use crate::track::{effective_bend, is_compact, place_on_arc, plane_layout, PlaneLayout, Size};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureSource {
    Placeholder,
    Image,
    Video,
}

/// What a texture currently shows and whether the GPU copy is stale
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureSlot {
    source: TextureSource,
    size: (u32, u32),
    dirty: bool,
}

impl TextureSlot {
    fn placeholder() -> Self {
        Self { source: TextureSource::Placeholder, size: (0, 0), dirty: false }
    }

    fn point_at(&mut self, source: TextureSource) {
        self.source = source;
        self.dirty = true;
    }

    pub fn source(&self) -> TextureSource {
        self.source
    }

    /// Natural pixel size, (0, 0) until known
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear and return the upload request.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Per-frame pose of the plane, world units
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaneState {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub is_before: bool,
    pub is_after: bool,
}

enum Media<V> {
    Image,
    Video(Option<V>),
}

pub struct MediaItem<V> {
    index: usize,
    length: usize,
    label: String,
    media: Media<V>,

    primary: TextureSlot,
    poster: TextureSlot,
    fade: Crossfade,
    throttle: UploadThrottle,
    frame_callbacks: bool,
    should_play: bool,

    plane: PlaneState,
    layout: PlaneLayout,
    viewport: Size,
    configured_bend: f32,
    bend: f32,
    x: f32,
    extra: f32,
    track_width: f32,
}

impl<V: VideoHandle> MediaItem<V> {
    /// Build item `index` of `length` and start its loads. Load failures are
    /// logged and leave the placeholder in place.
    pub fn new<B>(
        backend: &mut B,
        index: usize,
        length: usize,
        item: &GalleryItem,
        bend: f32,
        crossfade_ms: f64,
    ) -> Self
    where
        B: MediaBackend<Video = V>,
    {
        let url = item.media_url.as_str();
        let media = match MediaKind::detect(url) {
            MediaKind::Video => match backend.open_video(index, &optimized_video_url(url)) {
                Ok(video) => Media::Video(Some(video)),
                Err(e) => {
                    log::debug!("item {index}: video {url} unavailable: {e}");
                    Media::Video(None)
                }
            },
            MediaKind::Image => {
                if let Err(e) = backend.open_image(index, url) {
                    log::debug!("item {index}: image {url} unavailable: {e}");
                }
                Media::Image
            }
        };

        if let Some(poster) = derive_poster_url(url) {
            if let Err(e) = backend.open_poster(index, &poster) {
                log::debug!("item {index}: poster {poster} unavailable: {e}");
            }
        }

        Self {
            index,
            length,
            label: item.label.clone(),
            media,
            primary: TextureSlot::placeholder(),
            poster: TextureSlot::placeholder(),
            fade: Crossfade::new(crossfade_ms),
            throttle: UploadThrottle::default(),
            frame_callbacks: false,
            should_play: false,
            plane: PlaneState::default(),
            layout: PlaneLayout::default(),
            viewport: Size::default(),
            configured_bend: bend,
            bend,
            x: 0.0,
            extra: 0.0,
            track_width: 0.0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> MediaKind {
        match self.media {
            Media::Image => MediaKind::Image,
            Media::Video(_) => MediaKind::Video,
        }
    }

    pub fn video(&self) -> Option<&V> {
        match &self.media {
            Media::Video(v) => v.as_ref(),
            Media::Image => None,
        }
    }

    pub fn plane(&self) -> &PlaneState {
        &self.plane
    }

    pub fn layout(&self) -> &PlaneLayout {
        &self.layout
    }

    pub fn extra(&self) -> f32 {
        self.extra
    }

    pub fn track_width(&self) -> f32 {
        self.track_width
    }

    pub fn bend(&self) -> f32 {
        self.bend
    }

    pub fn mix(&self) -> f32 {
        self.fade.mix()
    }

    pub fn primary(&self) -> &TextureSlot {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut TextureSlot {
        &mut self.primary
    }

    pub fn poster(&self) -> &TextureSlot {
        &self.poster
    }

    pub fn poster_mut(&mut self) -> &mut TextureSlot {
        &mut self.poster
    }

    /// Size used for cover-fitting; falls back to the plane's own aspect
    /// while the media size is unknown.
    pub fn image_size(&self) -> [f32; 2] {
        match self.primary.size {
            (w, h) if w > 0 && h > 0 => [w as f32, h as f32],
            _ => [self.layout.width.max(1e-3), self.layout.height.max(1e-3)],
        }
    }

    pub fn should_play(&self) -> bool {
        self.should_play
    }

    pub fn set_should_play(&mut self, allowed: bool) {
        self.should_play = allowed;
    }

    pub fn is_visible(&self) -> bool {
        !(self.plane.is_before || self.plane.is_after)
    }

    /// Distance of the plane centre from the screen centre
    pub fn distance_from_centre(&self) -> f32 {
        self.plane.x.abs()
    }

    /// Recompute size, slot and bend for a new screen/viewport.
    pub fn on_resize(&mut self, screen: Size, viewport: Size, size_multiplier: f32) {
        self.viewport = viewport;
        self.layout = plane_layout(screen, viewport, size_multiplier);
        self.plane.scale_x = self.layout.width;
        self.plane.scale_y = self.layout.height;

        let slot = self.layout.slot();
        self.track_width = slot * self.length as f32;
        self.x = slot * self.index as f32;
        self.bend = effective_bend(self.configured_bend, is_compact(screen.width));
    }

    /// Position along the track and on the arc for a scroll offset.
    pub fn place(&mut self, scroll_current: f32) {
        self.plane.x = self.x - scroll_current - self.extra;
        let pose = place_on_arc(self.plane.x, self.viewport.width / 2.0, self.bend);
        self.plane.y = pose.y;
        self.plane.rotation = pose.rotation;
    }

    pub fn update(&mut self, scroll: &ScrollState, direction: Direction, now: f64) {
        self.place(scroll.current);
        self.gate_playback(now);
        self.fade.advance(now);

        let plane_half = self.plane.scale_x / 2.0;
        let viewport_half = self.viewport.width / 2.0;
        self.plane.is_before = self.plane.x + plane_half < -viewport_half;
        self.plane.is_after = self.plane.x - plane_half > viewport_half;

        match direction {
            Direction::Right if self.plane.is_before => self.wrap(-self.track_width),
            Direction::Left if self.plane.is_after => self.wrap(self.track_width),
            _ => {}
        }
    }

    fn wrap(&mut self, by: f32) {
        self.extra += by;
        self.plane.is_before = false;
        self.plane.is_after = false;
    }

    /// Play only when selected and on screen; keep the texture fed while playing.
    fn gate_playback(&mut self, now: f64) {
        let Media::Video(Some(video)) = &self.media else { return };
        let visible = !(self.plane.is_before || self.plane.is_after);

        if visible && self.should_play {
            if video.is_paused() {
                video.play();
            }
            if video.has_current_data() && !self.frame_callbacks && self.throttle.ready(now) {
                self.primary.dirty = true;
            }
        } else if !video.is_paused() {
            video.pause();
        }
    }

    /// Retry playback after a user gesture unlocked autoplay.
    pub fn resume(&self) {
        if let Media::Video(Some(video)) = &self.media {
            if self.should_play && video.is_paused() {
                video.play();
            }
        }
    }

    pub fn prewarm(&self) {
        if let Media::Video(Some(video)) = &self.media {
            video.prewarm();
        }
    }

    pub fn apply(&mut self, kind: MediaEventKind, now: f64) {
        match (kind, &mut self.media) {
            (MediaEventKind::ImageLoaded { width, height }, Media::Image) => {
                self.primary.size = (width, height);
                self.primary.point_at(TextureSource::Image);
                self.fade.begin(now);
            }
            (MediaEventKind::PosterLoaded, _) => {
                self.poster.point_at(TextureSource::Image);
            }
            (MediaEventKind::VideoMetadata { width, height }, Media::Video(Some(video))) => {
                video.prime();
                self.primary.size = (width.max(1), height.max(1));
                self.primary.point_at(TextureSource::Video);
            }
            (MediaEventKind::VideoCanPlay, Media::Video(Some(video))) => {
                self.primary.point_at(TextureSource::Video);
                let visible = !(self.plane.is_before || self.plane.is_after);
                if self.should_play && visible && video.is_paused() {
                    video.play();
                }
                if !self.frame_callbacks {
                    self.frame_callbacks = video.watch_frames();
                }
                self.fade.begin(now);
            }
            (MediaEventKind::VideoFrame, Media::Video(Some(_))) => {
                self.primary.dirty = true;
            }
            (MediaEventKind::Failed, _) => {
                log::debug!("item {}: media failed, keeping placeholder", self.index);
            }
            (kind, _) => {
                log::debug!("item {}: ignoring {kind:?}", self.index);
            }
        }
    }

    /// Pause, detach and drop the video source. Safe to call twice.
    pub fn destroy(&mut self) {
        if let Media::Video(slot) = &mut self.media {
            if let Some(mut video) = slot.take() {
                video.pause();
                video.release();
            }
        }
    }
}
