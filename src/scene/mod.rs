// scene/ - The gallery scene
//
// Owns the camera, the duplicated item list, scroll input and this
// gallery's share of the decode budget, and advances all of it once per
// frame. Drawing is left to whoever holds the scene.

mod camera;
mod data;

pub use camera::{Camera, Screen};
pub use data::DEFAULT_ITEMS;

use crate::config::{GalleryConfig, GalleryItem};
use crate::media::{MediaBackend, MediaEvent, MediaItem};
use crate::playback::{select_nearest, BudgetLease, PlaybackBudget, PlaybackPolicy};
use crate::scroll::{Direction, ScrollController, ScrollState, MOBILE_EASE};
use crate::track::{device_size_multiplier, is_mobile, Size};

/// Re-run video selection every this many frames even without input
const ACTIVE_REFRESH_FRAMES: u64 = 12;

pub struct GalleryScene<B: MediaBackend> {
    backend: B,
    camera: Camera,
    screen: Screen,
    viewport: Size,
    items: Vec<MediaItem<B::Video>>,
    scroll: ScrollController,
    policy: PlaybackPolicy,
    lease: BudgetLease,
    border_radius: f32,
    size_multiplier: f32,
    scroll_ease: f32,
    frame: u64,
    destroyed: bool,
}

impl<B: MediaBackend> GalleryScene<B> {
    pub fn new(mut backend: B, config: &GalleryConfig, screen: Screen, budget: &PlaybackBudget) -> Self {
        let mut camera = Camera::default();
        camera.set_screen(screen.size);
        let viewport = camera.viewport();

        // the list twice over, so one copy is always entering as the other leaves
        let source = config.items_or_default();
        let doubled: Vec<&GalleryItem> = source.iter().chain(source.iter()).collect();
        let length = doubled.len();
        let multiplier = device_size_multiplier(screen.size.width, config.size_multiplier);

        let items = doubled
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let mut it = MediaItem::new(&mut backend, index, length, item, config.bend, config.crossfade_ms);
                it.on_resize(screen.size, viewport, multiplier);
                it.place(0.0);
                it
            })
            .collect();

        let mut scene = Self {
            backend,
            camera,
            screen,
            viewport,
            items,
            scroll: ScrollController::new(config.scroll_speed, ease_for(screen.size.width, config.scroll_ease)),
            policy: PlaybackPolicy { mobile_cap: config.mobile_play_cap, desktop_cap: config.desktop_play_cap },
            lease: budget.register(),
            border_radius: config.border_radius,
            size_multiplier: config.size_multiplier,
            scroll_ease: config.scroll_ease,
            frame: 0,
            destroyed: false,
        };

        scene.update_active_videos();
        if screen.is_mobile() {
            scene.items.iter().for_each(MediaItem::prewarm);
        }

        log::info!(
            "gallery: {} planes, viewport {:.2}x{:.2}, screen {}x{}",
            scene.items.len(),
            viewport.width,
            viewport.height,
            screen.size.width,
            screen.size.height
        );
        scene
    }

    pub fn items(&self) -> &[MediaItem<B::Video>] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [MediaItem<B::Video>] {
        &mut self.items
    }

    pub fn scroll(&self) -> &ScrollState {
        self.scroll.state()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Corner radius in plane UV units
    pub fn border_radius(&self) -> f32 {
        self.border_radius
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Width of one item slot, the unit scroll snaps to
    pub fn item_width(&self) -> f32 {
        self.items.first().map(|it| it.layout().slot()).unwrap_or(0.0)
    }

    /// Advance one frame at wall-clock time `now` (ms).
    pub fn frame(&mut self, now: f64) -> Direction {
        let width = self.item_width();
        self.scroll.poll_idle(now, width);

        let direction = self.scroll.advance();
        let state = *self.scroll.state();
        for item in &mut self.items {
            item.update(&state, direction, now);
        }
        self.scroll.commit();

        self.frame += 1;
        if self.frame % ACTIVE_REFRESH_FRAMES == 0 {
            self.update_active_videos();
        }
        direction
    }

    pub fn resize(&mut self, screen: Screen) {
        self.screen = screen;
        self.camera.set_screen(screen.size);
        self.viewport = self.camera.viewport();

        let multiplier = device_size_multiplier(screen.size.width, self.size_multiplier);
        for item in &mut self.items {
            item.on_resize(screen.size, self.viewport, multiplier);
        }
        self.scroll.set_ease(ease_for(screen.size.width, self.scroll_ease));
        log::debug!("gallery: resized to {}x{}", screen.size.width, screen.size.height);
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.scroll.pointer_down(x);
    }

    pub fn pointer_move(&mut self, x: f32) {
        if self.scroll.pointer_move(x) {
            self.update_active_videos();
        }
    }

    pub fn pointer_up(&mut self) {
        let width = self.item_width();
        self.scroll.pointer_up(width);
        self.update_active_videos();
    }

    pub fn wheel(&mut self, delta: f32, now: f64) {
        if self.scroll.wheel(delta, now) {
            self.update_active_videos();
        }
    }

    pub fn apply_media_event(&mut self, event: MediaEvent, now: f64) {
        match self.items.get_mut(event.item) {
            Some(item) => item.apply(event.kind, now),
            None => log::debug!("gallery: media event for unknown item {}", event.item),
        }
    }

    /// A user gesture may have unlocked autoplay; retry selected videos.
    pub fn resume_playback(&self) {
        self.items.iter().for_each(MediaItem::resume);
    }

    /// Flag the planes nearest the centre as allowed to play. Images hold
    /// a slot too, so a mixed gallery decodes fewer videos.
    pub fn update_active_videos(&mut self) {
        if self.destroyed {
            return;
        }
        let wanted = self.policy.cap_for(self.screen.window_width);
        let cap = self.lease.grant(wanted.min(self.items.len()));

        let distances: Vec<f32> = self.items.iter().map(MediaItem::distance_from_centre).collect();
        for (item, play) in self.items.iter_mut().zip(select_nearest(&distances, cap)) {
            item.set_should_play(play);
        }
    }

    /// Index of the plane nearest the screen centre
    pub fn focused_index(&self) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.distance_from_centre().total_cmp(&b.distance_from_centre()))
            .map(|(i, _)| i)
    }

    pub fn focused_label(&self) -> Option<&str> {
        self.focused_index().map(|i| self.items[i].label())
    }

    /// Release every video and this gallery's decode share.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for item in &mut self.items {
            item.set_should_play(false);
            item.destroy();
        }
        self.lease.release();
        log::info!("gallery: destroyed {} planes", self.items.len());
    }
}

fn ease_for(container_width: f32, configured: f32) -> f32 {
    if is_mobile(container_width) { MOBILE_EASE } else { configured }
}
