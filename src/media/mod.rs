// media/ - Gallery items and the media behind them
//
// The core never touches a DOM element. A `MediaBackend` starts loads and
// hands back `VideoHandle`s; completions come back later as `MediaEvent`s
// that the scene routes to the owning item.

mod fade;
mod item;
mod source;

pub use fade::{Crossfade, UploadThrottle, UPLOAD_INTERVAL_MS};
pub use item::{MediaItem, PlaneState, TextureSlot, TextureSource};
pub use source::{derive_poster_url, optimized_video_url, MediaKind};

use crate::error::GalleryResult;

/// Control surface of one video element
pub trait VideoHandle {
    /// Start playback. Autoplay rejections are the implementation's to swallow.
    fn play(&self);
    fn pause(&self);
    fn is_paused(&self) -> bool;
    /// At least the current frame is decoded and can be uploaded.
    fn has_current_data(&self) -> bool;
    /// Move the playhead off the (often black) very first frame.
    fn prime(&self) {}
    /// Start fetching now rather than waiting to be played.
    fn prewarm(&self) {}
    /// Ask for a callback per decoded frame. Returns false when the
    /// platform has no such API and uploads must be throttled instead.
    fn watch_frames(&mut self) -> bool {
        false
    }
    /// Stop decoding and drop the source. The handle is dead afterwards.
    fn release(&mut self);
}

/// Starts media loads for items. Completion is reported asynchronously
/// through `MediaEvent`s carrying the same item index.
pub trait MediaBackend {
    type Video: VideoHandle;

    fn open_video(&mut self, item: usize, url: &str) -> GalleryResult<Self::Video>;
    fn open_image(&mut self, item: usize, url: &str) -> GalleryResult<()>;
    fn open_poster(&mut self, item: usize, url: &str) -> GalleryResult<()>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MediaEventKind {
    ImageLoaded { width: u32, height: u32 },
    PosterLoaded,
    VideoMetadata { width: u32, height: u32 },
    VideoCanPlay,
    VideoFrame,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MediaEvent {
    pub item: usize,
    pub kind: MediaEventKind,
}

impl MediaEvent {
    pub fn new(item: usize, kind: MediaEventKind) -> Self {
        Self { item, kind }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::error::GalleryError;

    #[derive(Debug, Default)]
    pub struct MockLog {
        pub videos: Vec<(usize, String)>,
        pub images: Vec<(usize, String)>,
        pub posters: Vec<(usize, String)>,
        pub released: Vec<usize>,
        pub prewarmed: Vec<usize>,
    }

    #[derive(Debug)]
    pub struct MockVideo {
        pub item: usize,
        pub paused: Cell<bool>,
        pub plays: Cell<u32>,
        pub pauses: Cell<u32>,
        pub primed: Cell<bool>,
        pub current_data: bool,
        pub frame_api: bool,
        log: Rc<RefCell<MockLog>>,
    }

    impl VideoHandle for MockVideo {
        fn play(&self) {
            self.plays.set(self.plays.get() + 1);
            self.paused.set(false);
        }

        fn pause(&self) {
            self.pauses.set(self.pauses.get() + 1);
            self.paused.set(true);
        }

        fn is_paused(&self) -> bool {
            self.paused.get()
        }

        fn has_current_data(&self) -> bool {
            self.current_data
        }

        fn prime(&self) {
            self.primed.set(true);
        }

        fn prewarm(&self) {
            self.log.borrow_mut().prewarmed.push(self.item);
        }

        fn watch_frames(&mut self) -> bool {
            self.frame_api
        }

        fn release(&mut self) {
            self.paused.set(true);
            self.log.borrow_mut().released.push(self.item);
        }
    }

    #[derive(Default)]
    pub struct MockBackend {
        pub log: Rc<RefCell<MockLog>>,
        pub current_data: bool,
        pub frame_api: bool,
        pub fail_videos: bool,
    }

    impl MediaBackend for MockBackend {
        type Video = MockVideo;

        fn open_video(&mut self, item: usize, url: &str) -> GalleryResult<MockVideo> {
            if self.fail_videos {
                return Err(GalleryError::media("no decoder"));
            }
            self.log.borrow_mut().videos.push((item, url.to_string()));
            Ok(MockVideo {
                item,
                paused: Cell::new(true),
                plays: Cell::new(0),
                pauses: Cell::new(0),
                primed: Cell::new(false),
                current_data: self.current_data,
                frame_api: self.frame_api,
                log: self.log.clone(),
            })
        }

        fn open_image(&mut self, item: usize, url: &str) -> GalleryResult<()> {
            self.log.borrow_mut().images.push((item, url.to_string()));
            Ok(())
        }

        fn open_poster(&mut self, item: usize, url: &str) -> GalleryResult<()> {
            self.log.borrow_mut().posters.push((item, url.to_string()));
            Ok(())
        }
    }
}
