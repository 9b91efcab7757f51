//! Geometry primitives shared by the clamp engine and the controller.
//!
//! Positions and cursor samples are whole pixels. Element rectangles and
//! viewport bounds keep the fractional values reported by the host, since
//! layout engines routinely produce sub-pixel rectangles.

use std::fmt;

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Attribute that exposes the [`InteractionState`] of a draggable element.
pub const DATA_DRAGGING_ATTRIBUTE: &str = "data-dragging";

/// Position of the dragged container relative to its positioned ancestor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub top: i32,
    pub left: i32,
}

impl Position {
    /// Create a position from its top and left offsets.
    pub const fn new(top: i32, left: i32) -> Self {
        Self { top, left }
    }

    /// Apply a cursor delta without any clamping.
    pub fn offset(self, delta: CursorDelta) -> Self {
        Self {
            top: self.top + delta.dy,
            left: self.left + delta.dx,
        }
    }

    /// CSS value of the `top` offset.
    pub fn top_px(&self) -> String {
        format_px(self.top)
    }

    /// CSS value of the `left` offset.
    pub fn left_px(&self) -> String {
        format_px(self.left)
    }
}

/// A pointer location in page coordinates, floored to whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorSample {
    pub x: i32,
    pub y: i32,
}

impl CursorSample {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Floor a page-space point to a cursor sample.
    pub fn from_point(point: Point) -> Self {
        Self {
            x: point.x.floor() as i32,
            y: point.y.floor() as i32,
        }
    }

    /// Movement from `previous` to `self`.
    pub fn delta_from(self, previous: CursorSample) -> CursorDelta {
        CursorDelta {
            dx: self.x - previous.x,
            dy: self.y - previous.y,
        }
    }
}

/// Difference between two cursor samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorDelta {
    pub dx: i32,
    pub dy: i32,
}

impl CursorDelta {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Bounding rectangle of a live element, as reported by the host's layout.
///
/// Read on demand and used for a single clamp computation; never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementRect {
    /// Build a rectangle from its top-left corner and size.
    pub fn from_origin_size(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            right: left + width,
            bottom: top + height,
            width,
            height,
        }
    }

    /// Same size, moved so its top-left corner sits at `position`.
    pub fn moved_to(&self, position: Position) -> Self {
        Self::from_origin_size(
            f64::from(position.top),
            f64::from(position.left),
            self.width,
            self.height,
        )
    }
}

impl From<Rect> for ElementRect {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self {
            top: rect.y0,
            left: rect.x0,
            right: rect.x1,
            bottom: rect.y1,
            width: rect.width(),
            height: rect.height(),
        }
    }
}

impl From<ElementRect> for Rect {
    fn from(rect: ElementRect) -> Self {
        Rect::new(rect.left, rect.top, rect.right, rect.bottom)
    }
}

/// Usable viewport extent, read fresh for every move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub avail_width: f64,
    pub avail_height: f64,
}

impl Bounds {
    pub const fn new(avail_width: f64, avail_height: f64) -> Self {
        Self {
            avail_width,
            avail_height,
        }
    }

    /// Whether the extent has no usable area.
    pub fn is_empty(&self) -> bool {
        !(self.avail_width > 0.0 && self.avail_height > 0.0)
    }
}

impl From<Size> for Bounds {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Interaction state of a draggable element, exposed for styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionState {
    /// No pointer is dragging the element.
    #[default]
    Idle,
    /// A pointer went down on the element and has not been released.
    Dragging,
}

impl InteractionState {
    /// Attribute value for [`DATA_DRAGGING_ATTRIBUTE`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging)
    }
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a numeric value as a CSS pixel length (`"12px"`).
pub fn format_px(value: impl fmt::Display) -> String {
    format!("{value}px")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_sample_floors_page_coordinates() {
        let sample = CursorSample::from_point(Point::new(200.9, 199.1));
        assert_eq!(sample, CursorSample::new(200, 199));

        let negative = CursorSample::from_point(Point::new(-0.5, -10.2));
        assert_eq!(negative, CursorSample::new(-1, -11));
    }

    #[test]
    fn test_cursor_delta() {
        let delta = CursorSample::new(210, 205).delta_from(CursorSample::new(200, 200));
        assert_eq!(delta, CursorDelta::new(10, 5));
        assert!(!delta.is_zero());
        assert!(CursorSample::new(3, 3).delta_from(CursorSample::new(3, 3)).is_zero());
    }

    #[test]
    fn test_position_offset() {
        let moved = Position::new(100, 100).offset(CursorDelta::new(10, -5));
        assert_eq!(moved, Position::new(95, 110));
    }

    #[test]
    fn test_element_rect_from_kurbo() {
        let rect = ElementRect::from(Rect::new(10.0, 20.0, 60.0, 100.0));
        assert_eq!(rect, ElementRect::from_origin_size(20.0, 10.0, 50.0, 80.0));
        assert_eq!(Rect::from(rect), Rect::new(10.0, 20.0, 60.0, 100.0));
    }

    #[test]
    fn test_element_rect_moved_to_keeps_size() {
        let rect = ElementRect::from_origin_size(100.0, 100.0, 50.0, 40.0);
        let moved = rect.moved_to(Position::new(5, 7));
        assert_eq!(moved.top, 5.0);
        assert_eq!(moved.left, 7.0);
        assert_eq!(moved.right, 57.0);
        assert_eq!(moved.bottom, 45.0);
    }

    #[test]
    fn test_interaction_state_attribute_values() {
        assert_eq!(InteractionState::default(), InteractionState::Idle);
        assert_eq!(InteractionState::Idle.as_str(), "idle");
        assert_eq!(InteractionState::Dragging.to_string(), "dragging");
        let json = serde_json::to_string(&InteractionState::Dragging).unwrap();
        assert_eq!(json, "\"dragging\"");
    }

    #[test]
    fn test_format_px() {
        assert_eq!(format_px(12), "12px");
        assert_eq!(format_px(-3), "-3px");
        assert_eq!(format_px(12.5), "12.5px");
        assert_eq!(Position::new(105, 110).top_px(), "105px");
        assert_eq!(Position::new(105, 110).left_px(), "110px");
    }

    #[test]
    fn test_bounds_from_size() {
        let bounds = Bounds::from(Size::new(1280.0, 1040.0));
        assert_eq!(bounds, Bounds::new(1280.0, 1040.0));
        assert!(!bounds.is_empty());
        assert!(Bounds::default().is_empty());
        assert!(Bounds::new(800.0, f64::NAN).is_empty());
    }
}
