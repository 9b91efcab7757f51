//! Pointer tracking: turns raw pointer input into start/move/end callbacks.
//!
//! A [`PointerTracker`] owns a [`PointerSource`] (whatever holds the native
//! listeners) and keeps the set of contacts that are currently down. Each
//! contact is identified by its [`PointerId`] and reported to a
//! [`PointerHandler`]:
//!
//! - `start` once per new contact; returning `false` ignores that contact
//! - `moved` once per move of a tracked contact
//! - `end` exactly once when a tracked contact is released or cancelled

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::error::DragResult;

/// Stable identity of one pointer contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointerId(pub i32);

/// A pointer contact at a page-space location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub id: PointerId,
    /// Location in page coordinates.
    pub page: Point,
}

impl Pointer {
    pub fn new(id: i32, page: Point) -> Self {
        Self {
            id: PointerId(id),
            page,
        }
    }
}

/// Raw pointer input, as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerInput {
    Down { pointer: Pointer },
    Move { pointer: Pointer },
    Up { pointer: Pointer },
    Cancel { pointer: Pointer },
}

impl PointerInput {
    /// The pointer this input refers to.
    pub fn pointer(&self) -> &Pointer {
        match self {
            Self::Down { pointer }
            | Self::Move { pointer }
            | Self::Up { pointer }
            | Self::Cancel { pointer } => pointer,
        }
    }
}

/// Receiver of tracked pointer transitions.
pub trait PointerHandler {
    /// A new contact went down. Return `true` to track it.
    fn start(&mut self, pointer: &Pointer) -> bool;

    /// A tracked contact moved. `all` lists every tracked contact in the
    /// order they went down, with `changed` already updated in place.
    fn moved(&mut self, changed: &Pointer, all: &[Pointer]);

    /// A tracked contact was released (`cancelled == false`) or cancelled.
    fn end(&mut self, pointer: &Pointer, cancelled: bool);
}

/// Owner of the native listeners that feed a [`PointerTracker`].
pub trait PointerSource {
    /// Attach the native listeners.
    fn listen(&mut self) -> DragResult<()>;

    /// Detach every native listener attached by [`listen`](Self::listen).
    fn unlisten(&mut self);
}

/// Tracks pointer contacts and reports their transitions.
#[derive(Debug)]
pub struct PointerTracker<S: PointerSource> {
    source: S,
    listening: bool,
    /// Tracked contacts in the order they went down.
    active: Vec<Pointer>,
}

impl<S: PointerSource> PointerTracker<S> {
    /// Create a tracker and attach the source's listeners.
    pub fn new(mut source: S) -> DragResult<Self> {
        source.listen()?;
        Ok(Self {
            source,
            listening: true,
            active: Vec::new(),
        })
    }

    /// Whether the native listeners are attached.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Contacts currently tracked, first-down first.
    pub fn active_pointers(&self) -> &[Pointer] {
        &self.active
    }

    /// Feed one input through the tracker.
    ///
    /// Inputs are ignored once the tracker is stopped, and for contacts that
    /// are not tracked.
    pub fn process<H: PointerHandler + ?Sized>(&mut self, input: PointerInput, handler: &mut H) {
        if !self.listening {
            log::trace!("Pointer input after stop ignored: {:?}", input);
            return;
        }

        match input {
            PointerInput::Down { pointer } => {
                if self.index_of(&pointer).is_some() {
                    return;
                }
                if handler.start(&pointer) {
                    self.active.push(pointer);
                }
            }
            PointerInput::Move { pointer } => {
                let Some(index) = self.index_of(&pointer) else {
                    return;
                };
                self.active[index] = pointer;
                handler.moved(&pointer, &self.active);
            }
            PointerInput::Up { pointer } => self.finish(pointer, false, handler),
            PointerInput::Cancel { pointer } => self.finish(pointer, true, handler),
        }
    }

    /// Detach listeners and forget every tracked contact.
    ///
    /// Safe to call repeatedly, and before any contact started.
    pub fn stop(&mut self) {
        self.active.clear();
        if self.listening {
            self.source.unlisten();
            self.listening = false;
            log::debug!("Pointer tracker stopped");
        }
    }

    /// Re-attach listeners after [`stop`](Self::stop). No-op while listening.
    pub fn resume(&mut self) -> DragResult<()> {
        if !self.listening {
            self.source.listen()?;
            self.listening = true;
            log::debug!("Pointer tracker resumed");
        }
        Ok(())
    }

    fn index_of(&self, pointer: &Pointer) -> Option<usize> {
        self.active.iter().position(|p| p.id == pointer.id)
    }

    fn finish<H: PointerHandler + ?Sized>(
        &mut self,
        pointer: Pointer,
        cancelled: bool,
        handler: &mut H,
    ) {
        let Some(index) = self.index_of(&pointer) else {
            return;
        };
        self.active.remove(index);
        handler.end(&pointer, cancelled);
    }
}

impl<S: PointerSource> Drop for PointerTracker<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
