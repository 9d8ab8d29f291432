// ============================================================================
// CIRCULAR GALLERY - Media planes bent along an arc, scrolled with inertia
// ============================================================================
//
// The core (scene, scroll, track, media, playback) is platform-free and
// tested natively. The `web` module binds it to the DOM and WebGL2 and is
// only built for wasm32.

pub mod config;
pub mod error;
pub mod media;
pub mod playback;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod track;

#[cfg(target_arch = "wasm32")]
mod web;

pub use config::{GalleryConfig, GalleryItem};
pub use error::{GalleryError, GalleryResult};
pub use playback::{PlaybackBudget, PlaybackPolicy};
pub use scene::{GalleryScene, Screen};

#[cfg(target_arch = "wasm32")]
pub use web::{CircularGallery, DecodeBudget};

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
