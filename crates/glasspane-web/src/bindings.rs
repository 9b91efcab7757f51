//! `wasm_bindgen` exports and the WebAssembly entry point.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use glasspane_core::{DragController, DragError, DragOptions};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::dom::{DomController, DomElement, DomHost, ScreenBounds, schedule_render};

pub(crate) fn to_js(err: DragError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Decode options passed from JavaScript; `undefined` and `null` mean
/// defaults.
pub(crate) fn options_from_js<T>(value: JsValue) -> Result<T, JsValue>
where
    T: Default + serde::de::DeserializeOwned,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|err| to_js(DragError::Config(err.to_string())))
}

fn busy() -> JsValue {
    JsValue::from_str("WindowDrag is busy handling a pointer event")
}

/// A drag controller attached to a custom element.
///
/// The controller moves the element matched by `containerSelector`;
/// `applyDrag` binds the handle that starts a drag.
///
/// ```js
/// const drag = new WindowDrag(this, { containerSelector: "#window" }, () => this.requestUpdate());
/// drag.applyDrag(this.shadowRoot.querySelector("#draggable"));
/// ```
#[wasm_bindgen]
pub struct WindowDrag {
    controller: Rc<RefCell<DomController>>,
}

impl WindowDrag {
    fn controller(&self) -> Result<Ref<'_, DomController>, JsValue> {
        self.controller.try_borrow().map_err(|_| busy())
    }

    fn controller_mut(&self) -> Result<RefMut<'_, DomController>, JsValue> {
        self.controller.try_borrow_mut().map_err(|_| busy())
    }
}

#[wasm_bindgen]
impl WindowDrag {
    /// Attach a controller to `host`. `on_update` runs after every
    /// position change.
    #[wasm_bindgen(constructor)]
    pub fn new(
        host: HtmlElement,
        options: JsValue,
        on_update: Option<js_sys::Function>,
    ) -> Result<WindowDrag, JsValue> {
        let options: DragOptions = options_from_js(options)?;
        let controller = Rc::new_cyclic(|weak| {
            RefCell::new(DragController::attach_to(
                DomHost::new(host, weak.clone(), on_update),
                ScreenBounds,
                options,
            ))
        });
        Ok(Self { controller })
    }

    /// Bind the draggable element. Call on every render; only the first
    /// call has an effect.
    #[wasm_bindgen(js_name = applyDrag)]
    pub fn apply_drag(&self, element: HtmlElement) -> Result<(), JsValue> {
        let first_bind = {
            let mut controller = self.controller_mut()?;
            let was_bound = controller.is_bound();
            controller
                .apply_drag(&DomElement(element.into()))
                .map_err(to_js)?;
            !was_bound && controller.is_bound()
        };
        if first_bind {
            schedule_render(&self.controller);
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = hostConnected)]
    pub fn host_connected(&self) -> Result<(), JsValue> {
        self.controller_mut()?.host_connected().map_err(to_js)
    }

    #[wasm_bindgen(js_name = hostDisconnected)]
    pub fn host_disconnected(&self) -> Result<(), JsValue> {
        self.controller_mut()?.host_disconnected();
        Ok(())
    }

    /// Inline styles for the container.
    pub fn styles(&self) -> Result<String, JsValue> {
        Ok(self.controller()?.styles().css_text())
    }

    #[wasm_bindgen(getter)]
    pub fn top(&self) -> Result<i32, JsValue> {
        Ok(self.controller()?.position().top)
    }

    #[wasm_bindgen(getter)]
    pub fn left(&self) -> Result<i32, JsValue> {
        Ok(self.controller()?.position().left)
    }

    #[wasm_bindgen(getter)]
    pub fn dragging(&self) -> Result<bool, JsValue> {
        Ok(self.controller()?.interaction_state().is_dragging())
    }
}

/// Initialize logging and panic reporting.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();

    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Logger already set: {err}")));
    }

    log::info!("Starting Glasspane (WASM)");
}
