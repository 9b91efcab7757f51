//! DOM implementations of the host capabilities.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glasspane_core::{
    Bounds, BoundsProvider, DATA_DRAGGING_ATTRIBUTE, DragController, DragElement, DragError,
    DragHost, DragResult, DragStyles, ElementRect, InteractionState, Pointer, PointerInput,
    PointerSource, WINDOW_DRAG_EVENT, WindowDragEvent,
};
use kurbo::{Point, Size};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Element, HtmlElement, PointerEvent};

/// Drag controller wired to the DOM.
pub type DomController = DragController<DomHost, ScreenBounds>;

/// Native events a [`DomPointerSource`] listens to.
const POINTER_EVENTS: [&str; 4] = ["pointerdown", "pointermove", "pointerup", "pointercancel"];

/// A DOM element handle.
#[derive(Debug, Clone, PartialEq)]
pub struct DomElement(pub Element);

impl DragElement for DomElement {
    fn bounding_rect(&self) -> Option<ElementRect> {
        // Detached elements report an all-zero rectangle.
        if !self.0.is_connected() {
            return None;
        }
        let rect = self.0.get_bounding_client_rect();
        Some(ElementRect {
            top: rect.top(),
            left: rect.left(),
            right: rect.right(),
            bottom: rect.bottom(),
            width: rect.width(),
            height: rect.height(),
        })
    }

    fn set_interaction_state(&self, state: InteractionState) {
        if let Err(err) = self.0.set_attribute(DATA_DRAGGING_ATTRIBUTE, state.as_str()) {
            log::warn!("Failed to set {}: {:?}", DATA_DRAGGING_ATTRIBUTE, err);
        }
    }
}

/// Viewport bounds from `window.screen`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenBounds;

impl BoundsProvider for ScreenBounds {
    fn bounds(&self) -> Option<Bounds> {
        let screen = web_sys::window()?.screen().ok()?;
        let size = Size::new(
            f64::from(screen.avail_width().ok()?),
            f64::from(screen.avail_height().ok()?),
        );
        Some(Bounds::from(size)).filter(|bounds| !bounds.is_empty())
    }
}

/// The custom element a [`DomController`] is attached to.
///
/// Drag events are queued while the controller handles a pointer event and
/// dispatched once it is released, so listeners can call back into it.
pub struct DomHost {
    element: HtmlElement,
    controller: Weak<RefCell<DomController>>,
    render_pending: Rc<Cell<bool>>,
    on_update: Option<js_sys::Function>,
    pending_events: Vec<CustomEvent>,
}

impl DomHost {
    pub(crate) fn new(
        element: HtmlElement,
        controller: Weak<RefCell<DomController>>,
        on_update: Option<js_sys::Function>,
    ) -> Self {
        Self {
            element,
            controller,
            render_pending: Rc::new(Cell::new(false)),
            on_update,
            pending_events: Vec::new(),
        }
    }

    /// The host element.
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl std::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomHost")
            .field("element", &self.element)
            .field("render_pending", &self.render_pending.get())
            .field("pending_events", &self.pending_events.len())
            .finish_non_exhaustive()
    }
}

impl DragHost for DomHost {
    type Element = DomElement;
    type Source = DomPointerSource;

    fn query_container(&self, selector: &str) -> Option<DomElement> {
        if selector.is_empty() {
            return None;
        }
        let found = match self.element.shadow_root() {
            Some(root) => root.query_selector(selector),
            None => self.element.query_selector(selector),
        };
        match found {
            Ok(element) => element.map(DomElement),
            Err(err) => {
                log::debug!("Container selector {:?} rejected: {:?}", selector, err);
                None
            }
        }
    }

    fn pointer_source(&self, element: &DomElement) -> DomPointerSource {
        DomPointerSource {
            element: element.0.clone(),
            controller: self.controller.clone(),
            listeners: Vec::new(),
        }
    }

    fn request_update(&mut self) {
        self.render_pending.set(true);
    }

    fn notify(&mut self, event: &WindowDragEvent<DomElement>) {
        let result = drag_detail(event).and_then(|detail| {
            let init = CustomEventInit::new();
            init.set_bubbles(true);
            init.set_composed(true);
            init.set_detail(&detail);
            CustomEvent::new_with_event_init_dict(WINDOW_DRAG_EVENT, &init)
        });
        match result {
            Ok(custom) => self.pending_events.push(custom),
            Err(err) => log::warn!("Failed to create {}: {:?}", WINDOW_DRAG_EVENT, err),
        }
    }
}

/// `{ pointer: {x, y}, containerEl, draggableEl }`
fn drag_detail(event: &WindowDragEvent<DomElement>) -> Result<JsValue, JsValue> {
    let detail = js_sys::Object::new();
    let pointer = serde_wasm_bindgen::to_value(&event.pointer)?;
    js_sys::Reflect::set(&detail, &JsValue::from_str("pointer"), &pointer)?;
    js_sys::Reflect::set(&detail, &JsValue::from_str("containerEl"), &event.container_el.0)?;
    js_sys::Reflect::set(&detail, &JsValue::from_str("draggableEl"), &event.draggable_el.0)?;
    Ok(detail.into())
}

type PointerClosure = Closure<dyn FnMut(PointerEvent)>;

/// Pointer listeners on the draggable element.
///
/// Listener closures hold a weak reference to the controller, so dropping
/// the controller drops the source and removes the listeners.
pub struct DomPointerSource {
    element: Element,
    controller: Weak<RefCell<DomController>>,
    listeners: Vec<(&'static str, PointerClosure)>,
}

impl std::fmt::Debug for DomPointerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomPointerSource")
            .field("element", &self.element)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl PointerSource for DomPointerSource {
    fn listen(&mut self) -> DragResult<()> {
        if !self.listeners.is_empty() {
            return Ok(());
        }

        for kind in POINTER_EVENTS {
            let controller = self.controller.clone();
            let element = self.element.clone();
            let closure = Closure::wrap(Box::new(move |event: PointerEvent| {
                let Some(input) = pointer_input(kind, &event) else {
                    return;
                };
                dispatch_pointer(&controller, &element, input);
            }) as Box<dyn FnMut(PointerEvent)>);

            let attached = self
                .element
                .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            if let Err(err) = attached {
                self.unlisten();
                return Err(DragError::ListenerAttach(format!("{kind}: {err:?}")));
            }
            self.listeners.push((kind, closure));
        }

        log::debug!("Pointer listeners attached");
        Ok(())
    }

    fn unlisten(&mut self) {
        for (kind, closure) in self.listeners.drain(..) {
            let removed = self
                .element
                .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            if let Err(err) = removed {
                log::warn!("Failed to remove {} listener: {:?}", kind, err);
            }
        }
    }
}

fn pointer_input(kind: &str, event: &PointerEvent) -> Option<PointerInput> {
    let pointer = Pointer::new(
        event.pointer_id(),
        Point::new(f64::from(event.page_x()), f64::from(event.page_y())),
    );
    match kind {
        // Secondary buttons never start a drag.
        "pointerdown" if event.button() != 0 => None,
        "pointerdown" => Some(PointerInput::Down { pointer }),
        "pointermove" => Some(PointerInput::Move { pointer }),
        "pointerup" => Some(PointerInput::Up { pointer }),
        "pointercancel" => Some(PointerInput::Cancel { pointer }),
        _ => None,
    }
}

fn dispatch_pointer(
    controller: &Weak<RefCell<DomController>>,
    element: &Element,
    input: PointerInput,
) {
    let Some(controller) = controller.upgrade() else {
        return;
    };
    let (target, events, capture) = {
        let Ok(mut guard) = controller.try_borrow_mut() else {
            log::warn!("Re-entrant pointer event dropped");
            return;
        };
        guard.handle_pointer(input);
        let capture = match input {
            PointerInput::Down { pointer } => guard.is_tracking(pointer.id),
            _ => false,
        };
        let host = guard.host_mut();
        (
            host.element.clone(),
            std::mem::take(&mut host.pending_events),
            capture,
        )
    };

    if capture {
        // Keep receiving moves when the pointer leaves the element.
        let pointer_id = input.pointer().id.0;
        if let Err(err) = element.set_pointer_capture(pointer_id) {
            log::warn!("Failed to capture pointer {}: {:?}", pointer_id, err);
        }
    }

    // The container has not re-rendered yet, so listeners see the pre-move
    // geometry.
    for event in events {
        if let Err(err) = target.dispatch_event(&event) {
            log::warn!("Failed to dispatch {}: {:?}", WINDOW_DRAG_EVENT, err);
        }
    }
    flush_render(&controller);
}

/// Apply the controller's styles to the container if the controller asked
/// for a render.
pub(crate) fn flush_render(controller: &Rc<RefCell<DomController>>) {
    let (container, styles, callback) = {
        let Ok(guard) = controller.try_borrow() else {
            return;
        };
        let host = guard.host();
        if !host.render_pending.replace(false) {
            return;
        }
        (
            guard.container().map(|container| container.0),
            guard.styles(),
            host.on_update.clone(),
        )
    };

    if let Some(container) = container {
        if let Err(err) = apply_styles(&container, &styles) {
            log::warn!("Failed to apply drag styles: {:?}", err);
        }
    }
    if let Some(callback) = callback {
        if let Err(err) = callback.call0(&JsValue::NULL) {
            log::warn!("Update callback failed: {:?}", err);
        }
    }
}

/// Request a render without a pointer event, e.g. right after binding.
pub(crate) fn schedule_render(controller: &Rc<RefCell<DomController>>) {
    if let Ok(guard) = controller.try_borrow() {
        guard.host().render_pending.set(true);
    }
    flush_render(controller);
}

fn apply_styles(element: &Element, styles: &DragStyles) -> Result<(), JsValue> {
    match element.dyn_ref::<HtmlElement>() {
        Some(html) => {
            let style = html.style();
            style.set_property("position", styles.position)?;
            style.set_property("top", &styles.top)?;
            style.set_property("left", &styles.left)?;
            Ok(())
        }
        None => element.set_attribute("style", &styles.css_text()),
    }
}
