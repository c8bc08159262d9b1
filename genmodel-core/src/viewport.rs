//! Horizontal scroll position of the board inside the host viewport.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    pointer_x: f64,
    scroll_left: f64,
}

/// Scroll offset, viewport width and content width, always kept clamped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    scroll_left: f64,
    width: f64,
    content_width: f64,
    #[serde(skip)]
    drag: Option<DragAnchor>,
}

impl Viewport {
    pub fn new(content_width: f64) -> Self {
        Self {
            scroll_left: 0.0,
            width: 0.0,
            content_width: content_width.max(0.0),
            drag: None,
        }
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    pub fn max_scroll(&self) -> f64 {
        (self.content_width - self.width).max(0.0)
    }

    pub fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_scroll())
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Moves to `offset`; returns whether the position changed.
    pub fn scroll_to(&mut self, offset: f64) -> bool {
        let next = self.clamp(offset);
        let changed = next != self.scroll_left;
        self.scroll_left = next;
        changed
    }

    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.scroll_to(self.scroll_left + delta)
    }

    /// Records a new viewport width and re-clamps the offset.
    pub fn resize(&mut self, width: f64) -> bool {
        self.width = width.max(0.0);
        self.scroll_to(self.scroll_left)
    }

    pub fn begin_drag(&mut self, pointer_x: f64) {
        self.drag = Some(DragAnchor {
            pointer_x,
            scroll_left: self.scroll_left,
        });
    }

    /// Grab-to-scroll: content follows the pointer. No-op without an active drag.
    pub fn drag_to(&mut self, pointer_x: f64) -> bool {
        let Some(anchor) = self.drag else {
            return false;
        };
        self.scroll_to(anchor.scroll_left - (pointer_x - anchor.pointer_x))
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Offset centering a node at board x `node_x`.
    pub fn centered_on(&self, node_x: f64) -> f64 {
        self.clamp(node_x - self.width / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_clamps_to_content() {
        let mut viewport = Viewport::new(1000.0);
        viewport.resize(400.0);
        assert!(viewport.scroll_by(250.0));
        assert_eq!(viewport.scroll_left(), 250.0);
        assert!(viewport.scroll_by(1000.0));
        assert_eq!(viewport.scroll_left(), 600.0);
        assert!(!viewport.scroll_by(10.0));
        assert!(viewport.scroll_to(-40.0));
        assert_eq!(viewport.scroll_left(), 0.0);
    }

    #[test]
    fn drag_moves_against_pointer() {
        let mut viewport = Viewport::new(2000.0);
        viewport.resize(500.0);
        viewport.scroll_to(300.0);
        assert!(!viewport.drag_to(10.0));

        viewport.begin_drag(200.0);
        assert!(viewport.drag_to(150.0));
        assert_eq!(viewport.scroll_left(), 350.0);
        assert!(viewport.drag_to(260.0));
        assert_eq!(viewport.scroll_left(), 240.0);

        viewport.end_drag();
        assert!(!viewport.drag_to(0.0));
        assert_eq!(viewport.scroll_left(), 240.0);
    }

    #[test]
    fn shrinking_content_view_reclamps() {
        let mut viewport = Viewport::new(800.0);
        viewport.scroll_to(700.0);
        assert_eq!(viewport.scroll_left(), 700.0);
        assert!(viewport.resize(300.0));
        assert_eq!(viewport.scroll_left(), 500.0);
        assert_eq!(viewport.centered_on(100.0), 0.0);
    }
}
