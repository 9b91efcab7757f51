//! Controller and ghost layer options.

use serde::{Deserialize, Serialize};

use crate::geometry::Position;

/// Options for a [`DragController`](crate::DragController).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragOptions {
    /// Selector of the container, resolved inside the host on every move.
    /// An empty selector never resolves.
    pub container_selector: String,
    /// Position the element starts at.
    pub initial_position: Position,
}

impl DragOptions {
    pub fn new(container_selector: impl Into<String>) -> Self {
        Self {
            container_selector: container_selector.into(),
            ..Default::default()
        }
    }

    pub fn with_initial_position(mut self, position: Position) -> Self {
        self.initial_position = position;
        self
    }
}

/// Options for spawning broken-window ghosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GhostOptions {
    pub enabled: bool,
    /// Oldest ghosts are removed past this count. `None` keeps all of them.
    pub max_ghosts: Option<usize>,
}

impl Default for GhostOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            max_ghosts: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let drag = DragOptions::default();
        assert_eq!(drag.container_selector, "");
        assert_eq!(drag.initial_position, Position::new(0, 0));

        let ghost = GhostOptions::default();
        assert!(ghost.enabled);
        assert_eq!(ghost.max_ghosts, None);
    }

    #[test]
    fn test_drag_options_partial() {
        let json = r##"{"containerSelector":"#window"}"##;
        let options: DragOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.container_selector, "#window");
        assert_eq!(options.initial_position, Position::default());
    }

    #[test]
    fn test_drag_options_initial_position() {
        let json = r##"{"containerSelector":"#window","initialPosition":{"top":40,"left":12}}"##;
        let options: DragOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.container_selector, "#window");
        assert_eq!(options.initial_position, Position::new(40, 12));
    }

    #[test]
    fn test_ghost_options_partial() {
        let options: GhostOptions = serde_json::from_str(r#"{"maxGhosts":8}"#).unwrap();
        assert!(options.enabled);
        assert_eq!(options.max_ghosts, Some(8));
    }

    #[test]
    fn test_ghost_options_invalid() {
        let result = serde_json::from_str::<GhostOptions>(r#"{"enabled":"yes"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_builder() {
        let options = DragOptions::new("#container").with_initial_position(Position::new(5, 6));
        assert_eq!(options.container_selector, "#container");
        assert_eq!(options.initial_position, Position::new(5, 6));
    }
}
