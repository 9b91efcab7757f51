//! Broken-window ghosts spawned in the page on `windowDrag`.

use std::cell::RefCell;
use std::rc::Rc;

use glasspane_core::{
    DragElement, GhostLayer, GhostOptions, GhostWindow, WINDOW_DRAG_EVENT, format_px,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, Element, Window};

use crate::bindings::options_from_js;
use crate::dom::DomElement;

const GHOST_CLASS: &str = "broken-window";
const FRAME_STYLE: &str = "border: var(--border-width, 2px) solid var(--color-gray-400, #9ca3af); \
                           box-shadow: 2px 2px var(--color-black, #000); \
                           background-color: var(--color-gray-500, #6b7280);";

type DragClosure = Closure<dyn FnMut(CustomEvent)>;

/// An installed ghost layer. Dropping it removes the listener, not the
/// ghosts already in the page.
#[wasm_bindgen]
pub struct GhostLayerHandle {
    window: Window,
    layer: Rc<RefCell<GhostLayer<Element>>>,
    listener: Option<DragClosure>,
}

/// Spawn a ghost before the drag container on every `windowDrag` event
/// that reaches `window`.
#[wasm_bindgen(js_name = installGhostLayer)]
pub fn install_ghost_layer(options: JsValue) -> Result<GhostLayerHandle, JsValue> {
    let options: GhostOptions = options_from_js(options)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
    let layer = Rc::new(RefCell::new(GhostLayer::new(options)));

    let layer_in_listener = layer.clone();
    let listener = Closure::wrap(Box::new(move |event: CustomEvent| {
        if let Err(err) = spawn_ghost(&layer_in_listener, &event) {
            log::warn!("Failed to spawn ghost: {:?}", err);
        }
    }) as Box<dyn FnMut(CustomEvent)>);
    window.add_event_listener_with_callback(WINDOW_DRAG_EVENT, listener.as_ref().unchecked_ref())?;

    log::debug!("Ghost layer installed");
    Ok(GhostLayerHandle {
        window,
        layer,
        listener: Some(listener),
    })
}

#[wasm_bindgen]
impl GhostLayerHandle {
    /// Number of ghosts in the page.
    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.layer.borrow().len()
    }

    /// Remove every ghost from the page.
    pub fn clear(&self) {
        for ghost in self.layer.borrow_mut().drain() {
            ghost.remove();
        }
    }

    /// Stop spawning ghosts.
    pub fn uninstall(&mut self) {
        if let Some(listener) = self.listener.take() {
            let removed = self.window.remove_event_listener_with_callback(
                WINDOW_DRAG_EVENT,
                listener.as_ref().unchecked_ref(),
            );
            if let Err(err) = removed {
                log::warn!("Failed to remove ghost listener: {:?}", err);
            }
        }
    }
}

impl Drop for GhostLayerHandle {
    fn drop(&mut self) {
        self.uninstall();
    }
}

fn spawn_ghost(layer: &RefCell<GhostLayer<Element>>, event: &CustomEvent) -> Result<(), JsValue> {
    if !layer.borrow().is_enabled() {
        return Ok(());
    }
    let container = js_sys::Reflect::get(&event.detail(), &JsValue::from_str("containerEl"))?;
    let Ok(container) = container.dyn_into::<Element>() else {
        return Ok(());
    };
    let Some(rect) = DomElement(container.clone()).bounding_rect() else {
        return Ok(());
    };

    let ghost = create_ghost_element(&container, &GhostWindow::from_rect(&rect))?;
    container.insert_adjacent_element("beforebegin", &ghost)?;

    if let Some(evicted) = layer.borrow_mut().push(ghost) {
        evicted.remove();
    }
    Ok(())
}

fn create_ghost_element(container: &Element, ghost: &GhostWindow) -> Result<Element, JsValue> {
    let document = container
        .owner_document()
        .ok_or_else(|| JsValue::from_str("Container has no document"))?;

    let outer = document.create_element("div")?;
    outer.set_class_name(GHOST_CLASS);
    for (name, value) in ghost.attributes() {
        outer.set_attribute(name, &value)?;
    }
    outer.set_attribute(
        "style",
        &format!(
            "position: absolute; display: flex; top: {}; left: {};",
            format_px(ghost.top),
            format_px(ghost.left)
        ),
    )?;

    let frame = document.create_element("div")?;
    frame.set_attribute("style", FRAME_STYLE)?;

    let body = document.create_element("div")?;
    body.set_attribute(
        "style",
        &format!(
            "width: {}; height: {};",
            format_px(ghost.width),
            format_px(ghost.height)
        ),
    )?;

    frame.append_child(&body)?;
    outer.append_child(&frame)?;
    Ok(outer)
}
