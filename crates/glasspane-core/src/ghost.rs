//! Broken-window ghosts left behind by a dragged panel.
//!
//! A ghost records the container's rectangle as it was when a drag sample
//! was published. The geometry is passed through untouched: no rounding and
//! no validation.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::GhostOptions;
use crate::event::WindowDragEvent;
use crate::geometry::{ElementRect, format_px};
use crate::host::DragElement;

/// Geometry of one broken-window ghost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GhostWindow {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl GhostWindow {
    pub fn from_rect(rect: &ElementRect) -> Self {
        Self {
            top: rect.top,
            left: rect.left,
            width: rect.width,
            height: rect.height,
        }
    }

    /// Attributes of the ghost element, in pixel units.
    pub fn attributes(&self) -> [(&'static str, String); 4] {
        [
            ("width", format_px(self.width)),
            ("height", format_px(self.height)),
            ("top", format_px(self.top)),
            ("left", format_px(self.left)),
        ]
    }
}

/// Spawned ghosts, oldest first.
///
/// `T` is whatever represents a ghost on the platform: [`GhostWindow`]
/// geometry in the core, a DOM element in the browser.
#[derive(Debug, Clone)]
pub struct GhostLayer<T = GhostWindow> {
    options: GhostOptions,
    ghosts: VecDeque<T>,
}

impl<T> GhostLayer<T> {
    pub fn new(options: GhostOptions) -> Self {
        Self {
            options,
            ghosts: VecDeque::new(),
        }
    }

    pub fn options(&self) -> &GhostOptions {
        &self.options
    }

    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    /// Add a ghost. Returns the oldest ghost when the cap pushed it out.
    pub fn push(&mut self, ghost: T) -> Option<T> {
        self.ghosts.push_back(ghost);
        match self.options.max_ghosts {
            Some(max) if self.ghosts.len() > max => self.ghosts.pop_front(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.ghosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ghosts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.ghosts.iter()
    }

    /// Remove every ghost, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.ghosts.drain(..)
    }
}

impl<T> Default for GhostLayer<T> {
    fn default() -> Self {
        Self::new(GhostOptions::default())
    }
}

impl GhostLayer<GhostWindow> {
    /// Spawn a ghost at the container's current rectangle.
    ///
    /// Returns `None` when ghosts are disabled or the container is not laid
    /// out.
    pub fn on_window_drag<E: DragElement>(
        &mut self,
        event: &WindowDragEvent<E>,
    ) -> Option<GhostWindow> {
        if !self.options.enabled {
            return None;
        }
        let rect = event.container_el.bounding_rect()?;
        let ghost = GhostWindow::from_rect(&rect);
        if self.push(ghost).is_some() {
            log::trace!("Ghost limit reached, oldest ghost removed");
        }
        Some(ghost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DragOptions;
    use crate::controller::DragController;
    use crate::geometry::{Bounds, CursorSample, Position};
    use crate::host::{FixedBounds, MemoryElement, MemoryHost};
    use crate::pointer::{Pointer, PointerInput};
    use kurbo::Point;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn laid_out(top: f64, left: f64, width: f64, height: f64) -> MemoryElement {
        MemoryElement::new(ElementRect::from_origin_size(top, left, width, height))
    }

    fn event_for(container: &MemoryElement) -> WindowDragEvent<MemoryElement> {
        WindowDragEvent {
            pointer: CursorSample::new(0, 0),
            container_el: container.clone(),
            draggable_el: container.clone(),
        }
    }

    #[test]
    fn test_attributes_keep_fractions() {
        let rect = ElementRect::from_origin_size(10.25, 20.0, 300.5, 200.0);
        let ghost = GhostWindow::from_rect(&rect);
        assert_eq!(
            ghost.attributes(),
            [
                ("width", "300.5px".to_string()),
                ("height", "200px".to_string()),
                ("top", "10.25px".to_string()),
                ("left", "20px".to_string()),
            ]
        );
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut layer = GhostLayer::new(GhostOptions {
            enabled: true,
            max_ghosts: Some(2),
        });

        assert_eq!(layer.push(1), None);
        assert_eq!(layer.push(2), None);
        assert_eq!(layer.push(3), Some(1));
        assert_eq!(layer.iter().copied().collect::<Vec<_>>(), vec![2, 3]);

        assert_eq!(layer.drain().collect::<Vec<_>>(), vec![2, 3]);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_uncapped_keeps_everything() {
        let mut layer = GhostLayer::default();
        for i in 0..50 {
            assert_eq!(layer.push(i), None);
        }
        assert_eq!(layer.len(), 50);
    }

    #[test]
    fn test_disabled_spawns_nothing() {
        let mut layer = GhostLayer::<GhostWindow>::new(GhostOptions {
            enabled: false,
            max_ghosts: None,
        });
        let container = laid_out(0.0, 0.0, 10.0, 10.0);

        assert_eq!(layer.on_window_drag(&event_for(&container)), None);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_unlaid_container_spawns_nothing() {
        let mut layer = GhostLayer::<GhostWindow>::default();
        assert_eq!(layer.on_window_drag(&event_for(&MemoryElement::unlaid())), None);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_ghosts_record_pre_move_geometry() {
        let host = MemoryHost::new();
        let draggable = laid_out(100.0, 100.0, 50.0, 50.0);
        let container = laid_out(100.0, 100.0, 300.0, 200.0);
        host.insert_container("#window", container.clone());

        let layer = Rc::new(RefCell::new(GhostLayer::<GhostWindow>::default()));
        let layer_in_listener = layer.clone();
        host.on_window_drag(move |event| {
            layer_in_listener.borrow_mut().on_window_drag(event);
        });

        let options = DragOptions::new("#window").with_initial_position(Position::new(100, 100));
        let mut controller =
            DragController::attach_to(host, FixedBounds(Bounds::new(800.0, 600.0)), options);
        controller.apply_drag(&draggable).unwrap();

        controller.handle_pointer(PointerInput::Down {
            pointer: Pointer::new(1, Point::ZERO),
        });
        for step in 1..=3 {
            let page = Point::new(f64::from(step * 10), f64::from(step * 5));
            controller.handle_pointer(PointerInput::Move {
                pointer: Pointer::new(1, page),
            });
            container.move_to(controller.position());
        }

        let tops: Vec<f64> = layer.borrow().iter().map(|ghost| ghost.top).collect();
        let lefts: Vec<f64> = layer.borrow().iter().map(|ghost| ghost.left).collect();
        assert_eq!(tops, vec![100.0, 105.0, 110.0]);
        assert_eq!(lefts, vec![100.0, 110.0, 120.0]);
        assert_eq!(controller.position(), Position::new(115, 130));
    }
}
