// web.rs - Mount and teardown in a real browser
//
// Run with `wasm-pack test --headless --chrome`. Without WebGL2 the
// mount fails and only the cleanup of the half-built canvas is checked.

#![cfg(target_arch = "wasm32")]

use circular_gallery::CircularGallery;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Event, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> HtmlElement {
    let document = web_sys::window().and_then(|w| w.document()).unwrap();
    let div: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    div.style().set_property("width", "800px").unwrap();
    div.style().set_property("height", "600px").unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

fn has_canvas(div: &HtmlElement) -> bool {
    div.query_selector("canvas").unwrap().is_some()
}

#[wasm_bindgen_test]
fn destroy_removes_canvas_and_planes() {
    let div = container();
    let mut gallery = match CircularGallery::new(div.clone(), JsValue::NULL) {
        Ok(g) => g,
        Err(_) => {
            assert!(!has_canvas(&div), "failed mount left a canvas behind");
            return;
        }
    };
    assert!(has_canvas(&div));
    assert_eq!(gallery.plane_count(), 24);

    gallery.destroy();
    assert!(!has_canvas(&div));
    assert_eq!(gallery.plane_count(), 0);
    assert_eq!(gallery.focused_index(), None);

    // window input after teardown reaches nothing
    let window = web_sys::window().unwrap();
    for kind in ["wheel", "mousedown", "mousemove", "mouseup", "resize", "click"] {
        window.dispatch_event(&Event::new(kind).unwrap()).unwrap();
    }

    gallery.destroy();
    assert!(!has_canvas(&div));
    assert_eq!(gallery.plane_count(), 0);
}

#[wasm_bindgen_test]
fn bad_config_leaves_no_canvas() {
    let div = container();
    let config = js_sys::JSON::parse(r#"{"scrollEase": 5}"#).unwrap();
    assert!(CircularGallery::new(div.clone(), config).is_err());
    assert!(!has_canvas(&div));
}
