// web/ - Browser host for the gallery
//
// DOM, WebGL2 and media elements. Only built for wasm32; everything it
// drives lives in the platform-free core.

mod events;
mod frame;
mod gl;
mod host;
mod media;

pub use host::{CircularGallery, DecodeBudget};

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // a second init (several wasm instances on one page) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}
