//! Capabilities the controller borrows from its environment.
//!
//! A host is whatever renders the draggable element: a DOM custom element in
//! the browser, or [`MemoryHost`] in tests and headless use.

mod memory;

pub use memory::{MemoryElement, MemoryHost, MemoryPointerSource, POINTER_LISTENER_KINDS};

use crate::event::WindowDragEvent;
use crate::geometry::{Bounds, ElementRect, InteractionState};
use crate::pointer::PointerSource;

/// A handle to a rendered element.
///
/// Handles are cheap to clone and refer to the same live element.
pub trait DragElement: Clone {
    /// Current layout rectangle, or `None` if the element is not laid out.
    fn bounding_rect(&self) -> Option<ElementRect>;

    /// Expose the interaction state for styling.
    fn set_interaction_state(&self, state: InteractionState);
}

/// The component a [`DragController`](crate::DragController) is attached to.
pub trait DragHost {
    type Element: DragElement;
    type Source: PointerSource;

    /// Resolve `selector` inside the host's rendered subtree.
    fn query_container(&self, selector: &str) -> Option<Self::Element>;

    /// Create the pointer source that will listen on `element`.
    fn pointer_source(&self, element: &Self::Element) -> Self::Source;

    /// Ask the host to re-render the container with the controller's new
    /// styles.
    fn request_update(&mut self);

    /// Publish a drag event to whoever listens on the host.
    ///
    /// Delivery may be deferred until the controller call that published the
    /// event returns, as long as it happens before the host re-renders.
    fn notify(&mut self, event: &WindowDragEvent<Self::Element>);
}

/// Supplies the usable viewport extent.
pub trait BoundsProvider {
    /// Current extent, or `None` if it cannot be read right now.
    fn bounds(&self) -> Option<Bounds>;
}

/// A viewport that never changes size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedBounds(pub Bounds);

impl BoundsProvider for FixedBounds {
    fn bounds(&self) -> Option<Bounds> {
        Some(self.0)
    }
}

impl<F: Fn() -> Option<Bounds>> BoundsProvider for F {
    fn bounds(&self) -> Option<Bounds> {
        self()
    }
}
