#![deny(unsafe_code)]
//! Browser host for backdrop.
//!
//! On load the module mounts the animation named by the root element's
//! `data-backdrop` attribute (default `geometry`): it appends a fixed,
//! full-viewport canvas behind the page and drives the animation from
//! `requestAnimationFrame`, following resizes, `data-theme` changes, page
//! visibility and the cursor.
//!
//! Pages that want control can skip the attribute and call [`mount`].

pub mod canvas;
pub mod host;

use wasm_bindgen::prelude::*;

/// Root attribute selecting the animation mounted on load.
const ANIMATION_ATTRIBUTE: &str = "data-backdrop";
const DEFAULT_ANIMATION: &str = "geometry";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let name = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .and_then(|root| root.get_attribute(ANIMATION_ATTRIBUTE))
        .unwrap_or_else(|| DEFAULT_ANIMATION.to_string());
    host::mount(&name)
}

/// Mounts the background animation `name` ("geometry" or "flow").
#[wasm_bindgen]
pub fn mount(name: &str) -> Result<(), JsValue> {
    host::mount(name)
}

/// Names accepted by [`mount`].
#[wasm_bindgen]
pub fn animations() -> Vec<JsValue> {
    backdrop_engines::AnimationKind::list_animations()
        .iter()
        .map(|&name| JsValue::from_str(name))
        .collect()
}
