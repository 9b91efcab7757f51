//! Drag controller: owns the drag state of one floating panel.
//!
//! The controller is attached to a host once, binds its draggable element
//! (the panel's handle) through the [`AttachmentHook`], and from then on
//! receives pointer input through its [`PointerTracker`]. Every move of the
//! first tracked pointer publishes a [`WindowDragEvent`] and then moves the
//! container, clamped to the viewport.

use std::fmt;

use crate::clamp::{clamp, detect_violation};
use crate::config::DragOptions;
use crate::error::DragResult;
use crate::event::WindowDragEvent;
use crate::geometry::{CursorSample, InteractionState, Position};
use crate::hook::AttachmentHook;
use crate::host::{BoundsProvider, DragElement, DragHost};
use crate::pointer::{Pointer, PointerHandler, PointerId, PointerInput, PointerTracker};

/// Inline styles a host applies to the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragStyles {
    pub position: &'static str,
    pub top: String,
    pub left: String,
}

impl DragStyles {
    fn at(position: Position) -> Self {
        Self {
            position: "absolute",
            top: position.top_px(),
            left: position.left_px(),
        }
    }

    /// The styles as a CSS declaration block.
    pub fn css_text(&self) -> String {
        format!(
            "position: {}; top: {}; left: {};",
            self.position, self.top, self.left
        )
    }
}

/// Drag state and host capabilities; the tracker's handler.
struct DragCore<H: DragHost, B> {
    host: H,
    bounds: B,
    options: DragOptions,
    draggable: Option<H::Element>,
    position: Position,
    cursor: Option<CursorSample>,
    state: InteractionState,
}

impl<H: DragHost, B: BoundsProvider> DragCore<H, B> {
    fn set_state(&mut self, state: InteractionState) {
        self.state = state;
        if let Some(element) = &self.draggable {
            element.set_interaction_state(state);
        }
    }

    fn on_start(&mut self, pointer: &Pointer) {
        self.cursor = Some(CursorSample::from_point(pointer.page));
        self.set_state(InteractionState::Dragging);
    }

    fn on_move(&mut self, changed: &Pointer, all: &[Pointer]) {
        let pointer = all.first().unwrap_or(changed);
        let Some(draggable) = self.draggable.clone() else {
            return;
        };
        let Some(container) = self.host.query_container(&self.options.container_selector) else {
            log::trace!(
                "Container {:?} not found, skipping drag sample",
                self.options.container_selector
            );
            return;
        };

        let sample = CursorSample::from_point(pointer.page);

        // Published before the position changes so listeners see the
        // pre-move geometry.
        self.host.notify(&WindowDragEvent {
            pointer: sample,
            container_el: container.clone(),
            draggable_el: draggable.clone(),
        });

        self.apply_sample(sample, &draggable, &container);
    }

    fn apply_sample(
        &mut self,
        sample: CursorSample,
        draggable: &H::Element,
        container: &H::Element,
    ) {
        let Some(previous) = self.cursor else {
            self.cursor = Some(sample);
            return;
        };
        if previous == sample {
            return;
        }
        let (Some(element_rect), Some(container_rect)) =
            (draggable.bounding_rect(), container.bounding_rect())
        else {
            log::trace!("Element not laid out, skipping drag sample");
            return;
        };

        let Some(bounds) = self.bounds.bounds() else {
            log::trace!("Viewport bounds unavailable, skipping drag sample");
            return;
        };

        let delta = sample.delta_from(previous);
        if let Some(violation) =
            detect_violation(self.position, delta, &element_rect, &container_rect, bounds)
        {
            log::trace!("Drag clamped at {:?} edge", violation);
        }

        self.cursor = Some(sample);
        self.position = clamp(self.position, delta, &element_rect, &container_rect, bounds);
        self.host.request_update();
    }

    fn on_end(&mut self) {
        self.set_state(InteractionState::Idle);
    }
}

impl<H: DragHost, B: BoundsProvider> PointerHandler for DragCore<H, B> {
    fn start(&mut self, pointer: &Pointer) -> bool {
        // Only the first contact drags; later ones are not tracked.
        if self.state.is_dragging() {
            return false;
        }
        self.on_start(pointer);
        true
    }

    fn moved(&mut self, changed: &Pointer, all: &[Pointer]) {
        self.on_move(changed, all);
    }

    fn end(&mut self, _pointer: &Pointer, _cancelled: bool) {
        self.on_end();
    }
}

/// Drag controller for one draggable element.
pub struct DragController<H: DragHost, B: BoundsProvider> {
    core: DragCore<H, B>,
    tracker: Option<PointerTracker<H::Source>>,
    hook: AttachmentHook,
}

impl<H: DragHost, B: BoundsProvider> DragController<H, B> {
    /// Attach a new controller to `host`.
    pub fn attach_to(host: H, bounds: B, options: DragOptions) -> Self {
        log::debug!(
            "Drag controller attached (container {:?})",
            options.container_selector
        );
        Self {
            core: DragCore {
                host,
                bounds,
                position: options.initial_position,
                options,
                draggable: None,
                cursor: None,
                state: InteractionState::Idle,
            },
            tracker: None,
            hook: AttachmentHook::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.core.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.core.host
    }

    pub fn options(&self) -> &DragOptions {
        &self.core.options
    }

    /// Current position of the container.
    pub fn position(&self) -> Position {
        self.core.position
    }

    /// Last cursor sample the position was computed from.
    pub fn cursor(&self) -> Option<CursorSample> {
        self.core.cursor
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.core.state
    }

    pub fn is_bound(&self) -> bool {
        self.core.draggable.is_some()
    }

    /// Resolve the container the position applies to.
    pub fn container(&self) -> Option<H::Element> {
        self.core
            .host
            .query_container(&self.core.options.container_selector)
    }

    /// Whether `id` is the contact driving the drag.
    pub fn is_tracking(&self, id: PointerId) -> bool {
        self.tracker
            .as_ref()
            .is_some_and(|tracker| tracker.active_pointers().iter().any(|p| p.id == id))
    }

    /// Whether pointer listeners are currently attached.
    pub fn is_listening(&self) -> bool {
        self.tracker.as_ref().is_some_and(|tracker| tracker.is_listening())
    }

    pub fn styles(&self) -> DragStyles {
        DragStyles::at(self.core.position)
    }

    /// Hook entry point for the render layer, called on every reconcile.
    ///
    /// Binds `element` on the first successful call and does nothing after.
    pub fn apply_drag(&mut self, element: &H::Element) -> DragResult<()> {
        let Self { core, tracker, hook } = self;
        hook.run(|| Self::bind(core, tracker, element.clone()).map(|_| ()))?;
        Ok(())
    }

    /// Bind the draggable element and start tracking pointers on it.
    ///
    /// Returns `Ok(false)` without doing anything if an element is already
    /// bound.
    pub fn bind_element(&mut self, element: H::Element) -> DragResult<bool> {
        Self::bind(&mut self.core, &mut self.tracker, element)
    }

    fn bind(
        core: &mut DragCore<H, B>,
        tracker: &mut Option<PointerTracker<H::Source>>,
        element: H::Element,
    ) -> DragResult<bool> {
        if core.draggable.is_some() {
            log::trace!("Draggable element already bound");
            return Ok(false);
        }

        let source = core.host.pointer_source(&element);
        *tracker = Some(PointerTracker::new(source)?);
        core.draggable = Some(element);
        core.set_state(InteractionState::Idle);
        log::debug!("Draggable element bound");
        Ok(true)
    }

    /// Feed one raw pointer input through the tracker.
    pub fn handle_pointer(&mut self, input: PointerInput) {
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.process(input, &mut self.core);
        }
    }

    /// Record the baseline cursor sample for a new drag.
    pub fn on_pointer_start(&mut self, pointer: &Pointer) {
        self.core.on_start(pointer);
    }

    /// Publish the drag event and move the element for a pointer sample.
    pub fn on_pointer_move(&mut self, changed: &Pointer, all: &[Pointer]) {
        self.core.on_move(changed, all);
    }

    pub fn on_pointer_end(&mut self) {
        self.core.on_end();
    }

    /// Re-attach pointer listeners after the host was reconnected.
    pub fn host_connected(&mut self) -> DragResult<()> {
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.resume()?;
        }
        Ok(())
    }

    /// Detach every pointer listener. Safe to call repeatedly, and before
    /// any element was bound.
    pub fn host_disconnected(&mut self) {
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.stop();
        }
        if self.core.state.is_dragging() {
            self.core.set_state(InteractionState::Idle);
        }
        log::debug!("Drag controller detached");
    }
}

impl<H: DragHost, B: BoundsProvider> fmt::Debug for DragController<H, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragController")
            .field("options", &self.core.options)
            .field("position", &self.core.position)
            .field("cursor", &self.core.cursor)
            .field("state", &self.core.state)
            .field("bound", &self.is_bound())
            .field("listening", &self.is_listening())
            .field("hook", &self.hook.state())
            .finish_non_exhaustive()
    }
}
