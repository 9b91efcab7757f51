//! In-memory host for testing and headless use.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use super::{DragElement, DragHost};
use crate::error::DragResult;
use crate::event::WindowDragEvent;
use crate::geometry::{DATA_DRAGGING_ATTRIBUTE, ElementRect, InteractionState, Position};
use crate::pointer::PointerSource;

/// Number of native listeners a pointer source attaches
/// (down, move, up, cancel).
pub const POINTER_LISTENER_KINDS: usize = 4;

#[derive(Debug, Default)]
struct ElementState {
    rect: Option<ElementRect>,
    attributes: BTreeMap<String, String>,
}

/// An element whose layout rectangle is set by hand.
///
/// Clones share the same element; equality is identity.
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    inner: Rc<RefCell<ElementState>>,
}

impl MemoryElement {
    /// Create a laid-out element.
    pub fn new(rect: ElementRect) -> Self {
        let element = Self::default();
        element.set_rect(Some(rect));
        element
    }

    /// Create an element that has not been laid out yet.
    pub fn unlaid() -> Self {
        Self::default()
    }

    pub fn set_rect(&self, rect: Option<ElementRect>) {
        self.inner.borrow_mut().rect = rect;
    }

    /// Move the element's rectangle, as a re-render with new styles would.
    pub fn move_to(&self, position: Position) {
        let mut inner = self.inner.borrow_mut();
        if let Some(rect) = inner.rect {
            inner.rect = Some(rect.moved_to(position));
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.borrow().attributes.get(name).cloned()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.inner
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// State currently exposed through `data-dragging`.
    pub fn interaction_state(&self) -> Option<InteractionState> {
        match self.attribute(DATA_DRAGGING_ATTRIBUTE)?.as_str() {
            "idle" => Some(InteractionState::Idle),
            "dragging" => Some(InteractionState::Dragging),
            _ => None,
        }
    }
}

impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl DragElement for MemoryElement {
    fn bounding_rect(&self) -> Option<ElementRect> {
        self.inner.borrow().rect
    }

    fn set_interaction_state(&self, state: InteractionState) {
        self.set_attribute(DATA_DRAGGING_ATTRIBUTE, state.as_str());
    }
}

type DragListener = Box<dyn FnMut(&WindowDragEvent<MemoryElement>)>;

#[derive(Default)]
struct HostState {
    containers: HashMap<String, MemoryElement>,
    update_requests: usize,
    events: Vec<WindowDragEvent<MemoryElement>>,
    listeners: Vec<DragListener>,
    deferred: bool,
    pending: Vec<WindowDragEvent<MemoryElement>>,
    attached_listeners: usize,
    sources_created: usize,
}

/// A host that records everything the controller asks of it.
///
/// Clones share state, so a test can keep one clone while the controller
/// owns another.
#[derive(Clone, Default)]
pub struct MemoryHost {
    state: Rc<RefCell<HostState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that queues drag events until [`deliver_pending`] runs,
    /// the way a host that must not call out while the controller is
    /// borrowed does.
    ///
    /// [`deliver_pending`]: Self::deliver_pending
    pub fn deferred() -> Self {
        let host = Self::default();
        host.state.borrow_mut().deferred = true;
        host
    }

    /// Run listeners for every queued drag event. Returns how many were
    /// delivered.
    pub fn deliver_pending(&self) -> usize {
        let pending = std::mem::take(&mut self.state.borrow_mut().pending);
        for event in &pending {
            self.run_listeners(event);
        }
        pending.len()
    }

    fn run_listeners(&self, event: &WindowDragEvent<MemoryElement>) {
        let mut listeners = std::mem::take(&mut self.state.borrow_mut().listeners);

        for listener in listeners.iter_mut() {
            listener(event);
        }

        let mut state = self.state.borrow_mut();
        listeners.append(&mut state.listeners);
        state.listeners = listeners;
    }

    /// Make `element` resolvable through `selector`.
    pub fn insert_container(&self, selector: &str, element: MemoryElement) {
        self.state
            .borrow_mut()
            .containers
            .insert(selector.to_string(), element);
    }

    /// Simulate the container leaving the rendered subtree.
    pub fn remove_container(&self, selector: &str) -> Option<MemoryElement> {
        self.state.borrow_mut().containers.remove(selector)
    }

    /// Register a listener run for every published drag event, immediately
    /// or on [`deliver_pending`](Self::deliver_pending) for a deferred host.
    pub fn on_window_drag(&self, listener: impl FnMut(&WindowDragEvent<MemoryElement>) + 'static) {
        self.state.borrow_mut().listeners.push(Box::new(listener));
    }

    /// Number of re-render requests received.
    pub fn update_requests(&self) -> usize {
        self.state.borrow().update_requests
    }

    /// Every drag event published so far.
    pub fn dispatched_events(&self) -> Vec<WindowDragEvent<MemoryElement>> {
        self.state.borrow().events.clone()
    }

    pub fn event_count(&self) -> usize {
        self.state.borrow().events.len()
    }

    /// Native pointer listeners currently attached.
    pub fn attached_listeners(&self) -> usize {
        self.state.borrow().attached_listeners
    }

    /// Pointer sources handed out, one per pointer tracker.
    pub fn sources_created(&self) -> usize {
        self.state.borrow().sources_created
    }
}

impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MemoryHost")
            .field("containers", &state.containers.len())
            .field("update_requests", &state.update_requests)
            .field("events", &state.events.len())
            .field("listeners", &state.listeners.len())
            .field("pending", &state.pending.len())
            .field("attached_listeners", &state.attached_listeners)
            .field("sources_created", &state.sources_created)
            .finish()
    }
}

impl DragHost for MemoryHost {
    type Element = MemoryElement;
    type Source = MemoryPointerSource;

    fn query_container(&self, selector: &str) -> Option<MemoryElement> {
        if selector.is_empty() {
            return None;
        }
        self.state.borrow().containers.get(selector).cloned()
    }

    fn pointer_source(&self, _element: &MemoryElement) -> MemoryPointerSource {
        self.state.borrow_mut().sources_created += 1;
        MemoryPointerSource {
            host: self.clone(),
            listening: false,
        }
    }

    fn request_update(&mut self) {
        self.state.borrow_mut().update_requests += 1;
    }

    fn notify(&mut self, event: &WindowDragEvent<MemoryElement>) {
        let deferred = {
            let mut state = self.state.borrow_mut();
            state.events.push(event.clone());
            if state.deferred {
                state.pending.push(event.clone());
            }
            state.deferred
        };
        if !deferred {
            self.run_listeners(event);
        }
    }
}

/// Pointer source that only counts attached listeners on its host.
#[derive(Debug)]
pub struct MemoryPointerSource {
    host: MemoryHost,
    listening: bool,
}

impl PointerSource for MemoryPointerSource {
    fn listen(&mut self) -> DragResult<()> {
        if !self.listening {
            self.host.state.borrow_mut().attached_listeners += POINTER_LISTENER_KINDS;
            self.listening = true;
        }
        Ok(())
    }

    fn unlisten(&mut self) {
        if self.listening {
            self.host.state.borrow_mut().attached_listeners -= POINTER_LISTENER_KINDS;
            self.listening = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CursorSample;
    use std::cell::Cell;

    #[test]
    fn test_empty_selector_never_resolves() {
        let host = MemoryHost::new();
        host.insert_container("", MemoryElement::unlaid());
        assert!(host.query_container("").is_none());
    }

    #[test]
    fn test_query_and_remove_container() {
        let host = MemoryHost::new();
        let container = MemoryElement::unlaid();
        host.insert_container("#window", container.clone());

        assert_eq!(host.query_container("#window"), Some(container.clone()));
        assert_eq!(host.remove_container("#window"), Some(container));
        assert!(host.query_container("#window").is_none());
    }

    #[test]
    fn test_notify_records_and_runs_listeners() {
        let mut host = MemoryHost::new();
        let seen = Rc::new(Cell::new(0));
        let seen_in_listener = seen.clone();
        host.on_window_drag(move |_| seen_in_listener.set(seen_in_listener.get() + 1));

        let element = MemoryElement::unlaid();
        let event = WindowDragEvent {
            pointer: CursorSample::new(1, 2),
            container_el: element.clone(),
            draggable_el: element,
        };
        host.notify(&event);
        host.notify(&event);

        assert_eq!(seen.get(), 2);
        assert_eq!(host.event_count(), 2);
        assert_eq!(host.dispatched_events()[0].pointer, CursorSample::new(1, 2));
    }

    #[test]
    fn test_deferred_host_queues_until_delivered() {
        let mut host = MemoryHost::deferred();
        let seen = Rc::new(Cell::new(0));
        let seen_in_listener = seen.clone();
        host.on_window_drag(move |_| seen_in_listener.set(seen_in_listener.get() + 1));

        let element = MemoryElement::unlaid();
        let event = WindowDragEvent {
            pointer: CursorSample::new(1, 2),
            container_el: element.clone(),
            draggable_el: element,
        };
        host.notify(&event);
        host.notify(&event);

        assert_eq!(seen.get(), 0);
        assert_eq!(host.event_count(), 2);

        assert_eq!(host.deliver_pending(), 2);
        assert_eq!(seen.get(), 2);
        assert_eq!(host.deliver_pending(), 0);
    }

    #[test]
    fn test_pointer_source_counts_listeners() {
        let host = MemoryHost::new();
        let mut source = host.pointer_source(&MemoryElement::unlaid());

        source.listen().unwrap();
        source.listen().unwrap();
        assert_eq!(host.attached_listeners(), POINTER_LISTENER_KINDS);

        source.unlisten();
        source.unlisten();
        assert_eq!(host.attached_listeners(), 0);
        assert_eq!(host.sources_created(), 1);
    }

    #[test]
    fn test_element_attributes_and_identity() {
        let element = MemoryElement::new(ElementRect::from_origin_size(0.0, 0.0, 10.0, 10.0));
        assert_eq!(element.interaction_state(), None);

        element.set_interaction_state(InteractionState::Dragging);
        assert_eq!(element.attribute("data-dragging").as_deref(), Some("dragging"));
        assert_eq!(element.interaction_state(), Some(InteractionState::Dragging));

        assert_eq!(element, element.clone());
        assert_ne!(element, MemoryElement::unlaid());
    }

    #[test]
    fn test_move_to_requires_layout() {
        let unlaid = MemoryElement::unlaid();
        unlaid.move_to(Position::new(5, 5));
        assert!(unlaid.bounding_rect().is_none());

        let laid = MemoryElement::new(ElementRect::from_origin_size(0.0, 0.0, 10.0, 20.0));
        laid.move_to(Position::new(5, 6));
        assert_eq!(
            laid.bounding_rect(),
            Some(ElementRect::from_origin_size(5.0, 6.0, 10.0, 20.0))
        );
    }
}
