//! The drag event published on every qualifying move sample.

use crate::geometry::CursorSample;

/// Name of the event a host publishes for [`WindowDragEvent`].
pub const WINDOW_DRAG_EVENT: &str = "windowDrag";

/// Published synchronously for each move sample, before the controller
/// applies its position update, so listeners observe the pre-move geometry.
///
/// Element handles are cheap clones of the host's element references.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDragEvent<E> {
    /// First tracked pointer, floored to whole pixels.
    pub pointer: CursorSample,
    /// The panel whose geometry bounds the drag.
    pub container_el: E,
    /// The element the pointer grabbed.
    pub draggable_el: E,
}
