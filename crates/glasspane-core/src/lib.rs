//! Glasspane Core Library
//!
//! Platform-agnostic drag-and-clamp controller for floating window panels.
//!
//! The controller turns pointer samples into clamped panel positions and
//! publishes a [`WindowDragEvent`] for every qualifying sample. Everything the
//! controller needs from its environment (element geometry, container lookup,
//! viewport bounds, native pointer listeners) is injected through the traits
//! in [`host`].

pub mod clamp;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod geometry;
pub mod ghost;
pub mod hook;
pub mod host;
pub mod pointer;

pub use clamp::{Violation, clamp, detect_violation};
pub use config::{DragOptions, GhostOptions};
pub use controller::{DragController, DragStyles};
pub use error::{DragError, DragResult};
pub use event::{WINDOW_DRAG_EVENT, WindowDragEvent};
pub use geometry::{
    Bounds, CursorDelta, CursorSample, DATA_DRAGGING_ATTRIBUTE, ElementRect, InteractionState,
    Position, format_px,
};
pub use ghost::{GhostLayer, GhostWindow};
pub use hook::{AttachmentHook, HookState};
pub use host::{BoundsProvider, DragElement, DragHost, FixedBounds, MemoryElement, MemoryHost};
pub use pointer::{Pointer, PointerHandler, PointerId, PointerInput, PointerSource, PointerTracker};
