//! Glasspane for the browser
//!
//! DOM implementations of the Glasspane host capabilities and the
//! `wasm_bindgen` exports custom elements use:
//!
//! - `WindowDrag`: a drag controller attached to a host element
//! - `installGhostLayer`: spawns broken-window ghosts on `windowDrag`

#[cfg(target_arch = "wasm32")]
mod bindings;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod ghost;

#[cfg(target_arch = "wasm32")]
pub use bindings::{WindowDrag, run_wasm};
#[cfg(target_arch = "wasm32")]
pub use dom::{DomController, DomElement, DomHost, DomPointerSource, ScreenBounds};
#[cfg(target_arch = "wasm32")]
pub use ghost::{GhostLayerHandle, install_ghost_layer};
