//! Viewport clamping for dragged panels.
//!
//! The violation checks combine the delta with the rectangles measured
//! *before* the move, not with the hypothetical post-move rectangle. Only one
//! violation is corrected per call: top, then left, then bottom, then right.
//! A sample that crosses a corner therefore pins a single axis, and the next
//! sample corrects the other one.

use crate::geometry::{Bounds, CursorDelta, ElementRect, Position};

/// Boundary crossed by a proposed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    Top,
    Left,
    Bottom,
    Right,
}

/// First violated boundary in precedence order, if any.
pub fn detect_violation(
    prev: Position,
    delta: CursorDelta,
    element: &ElementRect,
    container: &ElementRect,
    bounds: Bounds,
) -> Option<Violation> {
    let dx = f64::from(delta.dx);
    let dy = f64::from(delta.dy);

    if prev.top + delta.dy < 0 {
        Some(Violation::Top)
    } else if prev.left + delta.dx < 0 {
        Some(Violation::Left)
    } else if element.bottom + dy > bounds.avail_height {
        Some(Violation::Bottom)
    } else if container.right + dx >= bounds.avail_width {
        Some(Violation::Right)
    } else {
        None
    }
}

/// Compute the next position of a dragged element.
///
/// `element` is the draggable element's rectangle and `container` the
/// rectangle of the panel it moves; the bottom edge is checked against the
/// former and the right edge against the latter.
pub fn clamp(
    prev: Position,
    delta: CursorDelta,
    element: &ElementRect,
    container: &ElementRect,
    bounds: Bounds,
) -> Position {
    let naive = prev.offset(delta);

    match detect_violation(prev, delta, element, container, bounds) {
        None => naive,
        Some(Violation::Top) => Position {
            top: 0,
            left: naive.left,
        },
        Some(Violation::Left) => Position {
            top: naive.top,
            left: 0,
        },
        Some(Violation::Bottom) => Position {
            top: (bounds.avail_height - element.height).floor() as i32,
            left: naive.left,
        },
        Some(Violation::Right) => Position {
            top: naive.top,
            left: (bounds.avail_width - container.width).floor() as i32,
        },
    }
}
