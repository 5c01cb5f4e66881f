//! Page wiring: canvas creation, event listeners and the frame loop.
//!
//! Everything the page can change between frames (viewport size, theme,
//! visibility, cursor) is funneled through [`HostState`], which the event
//! closures and the `requestAnimationFrame` callback share behind an
//! `Rc<RefCell<_>>`.

use crate::canvas::Canvas2dSurface;
use backdrop_core::{
    Animation, FrameLoop, HostStyle, PointerSampler, SamplePolicy, Theme, Viewport,
};
use backdrop_engines::AnimationKind;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, MouseEvent, MutationObserver,
    MutationObserverInit, Window,
};

/// Root attribute carrying the page theme.
const THEME_ATTRIBUTE: &str = "data-theme";
/// Pointer throttle window for the flow field.
const FLOW_POINTER_THROTTLE_MS: f64 = 50.0;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Mutable state shared by the frame callback and the event listeners.
pub struct HostState {
    animation: AnimationKind,
    surface: Canvas2dSurface,
    canvas: HtmlCanvasElement,
    frame_loop: FrameLoop,
    sampler: PointerSampler,
    /// Handle of the pending animation frame, if one is scheduled.
    frame_request: Option<i32>,
}

/// How pointer events are sampled for an animation.
pub fn sample_policy(animation: &AnimationKind) -> SamplePolicy {
    match animation {
        AnimationKind::Flow(_) => SamplePolicy::Throttle {
            interval_ms: FLOW_POINTER_THROTTLE_MS,
        },
        AnimationKind::Geometry(_) => SamplePolicy::NextFrame,
    }
}

/// Inline CSS that pins the canvas behind the page content.
pub fn canvas_style(style: HostStyle) -> Vec<(&'static str, String)> {
    vec![
        ("position", "fixed".to_string()),
        ("top", "0".to_string()),
        ("left", "0".to_string()),
        ("width", "100%".to_string()),
        ("height", "100%".to_string()),
        ("z-index", "-1".to_string()),
        ("opacity", style.opacity.to_string()),
    ]
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn document(window: &Window) -> Result<Document, JsValue> {
    window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))
}

fn root(document: &Document) -> Result<Element, JsValue> {
    document
        .document_element()
        .ok_or_else(|| JsValue::from_str("document has no root element"))
}

fn viewport(window: &Window) -> Result<Viewport, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok(Viewport::new(width, height))
}

fn page_theme(root: &Element) -> Theme {
    Theme::from_attribute(root.get_attribute(THEME_ATTRIBUTE).as_deref())
}

fn now_ms(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

fn context_2d(canvas: &HtmlCanvasElement, transparent: bool) -> Result<CanvasRenderingContext2d, JsValue> {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &JsValue::from_str("alpha"), &JsValue::from_bool(transparent))?;
    canvas
        .get_context_with_context_options("2d", &options)?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("context is not a CanvasRenderingContext2d"))
}

fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
    canvas.set_width(viewport.width.max(0.0) as u32);
    canvas.set_height(viewport.height.max(0.0) as u32);
}

fn request_frame(window: &Window, callback: &FrameCallback) -> Result<i32, JsValue> {
    let callback = callback.borrow();
    let closure = callback
        .as_ref()
        .ok_or_else(|| JsValue::from_str("frame callback not installed"))?;
    window.request_animation_frame(closure.as_ref().unchecked_ref())
}

/// Creates the canvas for animation `name`, wires every listener and starts
/// the frame loop.
pub fn mount(name: &str) -> Result<(), JsValue> {
    let window = window()?;
    let document = document(&window)?;
    let root = root(&document)?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let viewport = viewport(&window)?;
    let seed = js_sys::Date::now() as u64;
    let animation = AnimationKind::from_name(
        name,
        viewport,
        page_theme(&root),
        seed,
        &serde_json::json!({}),
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let style = animation.host_style();
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("created element is not a canvas"))?;
    let css = canvas.style();
    for (property, value) in canvas_style(style) {
        css.set_property(property, &value)?;
    }
    size_canvas(&canvas, viewport);
    let ctx = context_2d(&canvas, style.transparent)?;
    body.append_child(&canvas)?;

    let sampler = PointerSampler::new(sample_policy(&animation));
    let state = Rc::new(RefCell::new(HostState {
        animation,
        surface: Canvas2dSurface::new(ctx, viewport.width, viewport.height),
        canvas,
        frame_loop: FrameLoop::new(),
        sampler,
        frame_request: None,
    }));

    let frame: FrameCallback = Rc::new(RefCell::new(None));
    install_frame_callback(&window, &state, &frame);
    listen_resize(&window, &state)?;
    listen_pointer(&window, &state)?;
    observe_theme(&root, &state)?;
    listen_visibility(&window, &document, &state, &frame)?;

    let id = request_frame(&window, &frame)?;
    state.borrow_mut().frame_request = Some(id);
    log::info!("backdrop: mounted {name} ({}x{})", viewport.width, viewport.height);
    Ok(())
}

/// One frame: apply the sampled cursor, tick, and re-arm while running.
fn install_frame_callback(window: &Window, state: &Rc<RefCell<HostState>>, frame: &FrameCallback) {
    let window = window.clone();
    let state = state.clone();
    let next = frame.clone();
    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let mut guard = state.borrow_mut();
        let host = &mut *guard;
        host.frame_request = None;
        if !host.frame_loop.is_running() {
            return;
        }
        if let Some(cursor) = host.sampler.poll(now_ms(&window)) {
            host.animation.set_pointer(cursor.x, cursor.y);
        }
        host.frame_loop.tick(&mut host.animation, &mut host.surface);
        match request_frame(&window, &next) {
            Ok(id) => host.frame_request = Some(id),
            Err(e) => log::error!("backdrop: cannot schedule frame: {e:?}"),
        }
    }) as Box<dyn FnMut()>));
}

fn listen_resize(window: &Window, state: &Rc<RefCell<HostState>>) -> Result<(), JsValue> {
    let handler_window = window.clone();
    let state = state.clone();
    let on_resize = Closure::wrap(Box::new(move || {
        let viewport = match viewport(&handler_window) {
            Ok(v) => v,
            Err(e) => {
                log::error!("backdrop: cannot read viewport: {e:?}");
                return;
            }
        };
        let mut host = state.borrow_mut();
        size_canvas(&host.canvas, viewport);
        host.surface.resize(viewport.width, viewport.height);
        host.animation.resize(viewport);
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

fn listen_pointer(window: &Window, state: &Rc<RefCell<HostState>>) -> Result<(), JsValue> {
    let handler_window = window.clone();
    let state = state.clone();
    let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
        let now = now_ms(&handler_window);
        state
            .borrow_mut()
            .sampler
            .offer(now, event.client_x() as f64, event.client_y() as f64);
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();
    Ok(())
}

fn observe_theme(root: &Element, state: &Rc<RefCell<HostState>>) -> Result<(), JsValue> {
    let observed = root.clone();
    let state = state.clone();
    let on_mutation = Closure::wrap(Box::new(move |_records: js_sys::Array, _observer: MutationObserver| {
        let theme = page_theme(&observed);
        state.borrow_mut().animation.set_theme(theme);
    }) as Box<dyn FnMut(_, _)>);
    let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_attributes(true);
    let filter = js_sys::Array::of1(&JsValue::from_str(THEME_ATTRIBUTE));
    options.set_attribute_filter(&filter);
    observer.observe_with_options(root, &options)?;
    on_mutation.forget();
    Ok(())
}

/// Stops the loop while the page is hidden and re-arms it when visible.
fn listen_visibility(
    window: &Window,
    document: &Document,
    state: &Rc<RefCell<HostState>>,
    frame: &FrameCallback,
) -> Result<(), JsValue> {
    let handler_window = window.clone();
    let handler_document = document.clone();
    let state = state.clone();
    let frame = frame.clone();
    let on_visibility = Closure::wrap(Box::new(move || {
        let mut host = state.borrow_mut();
        if handler_document.hidden() {
            host.frame_loop.pause();
            if let Some(id) = host.frame_request.take() {
                if let Err(e) = handler_window.cancel_animation_frame(id) {
                    log::warn!("backdrop: cancel frame failed: {e:?}");
                }
            }
            log::debug!("backdrop: paused while hidden");
        } else if host.frame_loop.resume() && host.frame_request.is_none() {
            match request_frame(&handler_window, &frame) {
                Ok(id) => host.frame_request = Some(id),
                Err(e) => log::error!("backdrop: cannot resume: {e:?}"),
            }
            log::debug!("backdrop: resumed");
        }
    }) as Box<dyn FnMut()>);
    document.add_event_listener_with_callback("visibilitychange", on_visibility.as_ref().unchecked_ref())?;
    on_visibility.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kind(name: &str) -> AnimationKind {
        AnimationKind::from_name(name, Viewport::new(100.0, 100.0), Theme::Dark, 1, &json!({}))
            .unwrap()
    }

    #[test]
    fn flow_throttles_pointer_and_geometry_samples_per_frame() {
        assert_eq!(
            sample_policy(&kind("flow")),
            SamplePolicy::Throttle { interval_ms: 50.0 }
        );
        assert_eq!(sample_policy(&kind("geometry")), SamplePolicy::NextFrame);
    }

    #[test]
    fn canvas_sits_fixed_behind_content() {
        let css = canvas_style(kind("geometry").host_style());
        assert!(css.contains(&("position", "fixed".to_string())));
        assert!(css.contains(&("z-index", "-1".to_string())));
        assert!(css.contains(&("opacity", "0.7".to_string())));
        let css = canvas_style(kind("flow").host_style());
        assert!(css.contains(&("opacity", "0.8".to_string())));
    }
}
