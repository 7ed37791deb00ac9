#![forbid(unsafe_code)]

//! Pointer drag tracking shared by the drag and resize adapters.
//!
//! A [`DragMove`] is created on pointer-down and fed every subsequent
//! pointer-move and the final pointer-up. Accepted moves return a
//! [`DragStep`] with the displacement from the pointer-down position.
//!
//! # Initial-event rule
//!
//! A move is dropped when its displacement equals the last accepted one, so
//! moves that never leave the pointer-down position are dropped too. The
//! first accepted move is flagged `initial`: adapters open the layout session
//! there, capture the baseline, and then feed the displaced rect like any
//! later move. When the pointer is released before any move was accepted,
//! the end step is flagged `initial` and the interaction is a click that
//! mutates nothing.

use crate::geometry::{Point, Vector};

/// One observation of an ongoing drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    /// Current pointer position.
    pub point: Point,
    /// Displacement from the pointer-down position.
    pub vector: Vector,
    /// Whether no displacement had been accepted before this step.
    pub initial: bool,
}

/// Tracks one pointer-down → move* → up sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DragMove {
    origin: Point,
    last_vector: Vector,
    moves: u32,
}

impl DragMove {
    /// Start tracking at the pointer-down position.
    #[must_use]
    pub const fn start(origin: Point) -> Self {
        Self {
            origin,
            last_vector: Vector::ZERO,
            moves: 0,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Displacement of the last accepted move.
    #[must_use]
    pub const fn last_vector(&self) -> Vector {
        self.last_vector
    }

    /// Number of accepted moves.
    #[must_use]
    pub const fn move_count(&self) -> u32 {
        self.moves
    }

    /// Whether the pointer has actually moved since pointer-down.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.moves > 0
    }

    /// Record a pointer-move. `None` when the displacement did not change.
    pub fn on_move(&mut self, point: Point) -> Option<DragStep> {
        let vector = point.vector_from(self.origin);
        if vector == self.last_vector {
            return None;
        }
        let initial = self.moves == 0;
        self.moves = self.moves.saturating_add(1);
        self.last_vector = vector;
        Some(DragStep {
            point,
            vector,
            initial,
        })
    }

    /// Record the pointer-up that ends the drag.
    #[must_use]
    pub fn on_end(&self, point: Point) -> DragStep {
        DragStep {
            point,
            vector: point.vector_from(self.origin),
            initial: !self.is_dragging(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_displaced_move_is_initial() {
        let mut drag = DragMove::start(Point::new(10.0, 10.0));
        let first = drag.on_move(Point::new(12.0, 15.0)).unwrap();
        assert!(first.initial);
        assert_eq!(first.vector, Vector::new(2.0, 5.0));

        let second = drag.on_move(Point::new(20.0, 30.0)).unwrap();
        assert!(!second.initial);
        assert_eq!(second.vector, Vector::new(10.0, 20.0));
        assert!(drag.is_dragging());
    }

    #[test]
    fn moves_at_the_press_point_are_dropped() {
        let mut drag = DragMove::start(Point::new(10.0, 10.0));
        assert_eq!(drag.on_move(Point::new(10.0, 10.0)), None);
        assert_eq!(drag.on_move(Point::new(10.0, 10.0)), None);
        assert!(!drag.is_dragging());
        assert!(drag.on_end(Point::new(10.0, 10.0)).initial);
    }

    #[test]
    fn unchanged_displacement_is_dropped() {
        let mut drag = DragMove::start(Point::new(0.0, 0.0));
        assert!(drag.on_move(Point::new(4.0, 0.0)).is_some());
        assert_eq!(drag.on_move(Point::new(4.0, 0.0)), None);
        assert_eq!(drag.move_count(), 1);

        // Coming back to the press point is a real move once dragging.
        let back = drag.on_move(Point::new(0.0, 0.0)).unwrap();
        assert!(back.vector.is_zero());
        assert!(!back.initial);
    }

    #[test]
    fn release_without_moves_is_a_click() {
        let drag = DragMove::start(Point::new(0.0, 0.0));
        let end = drag.on_end(Point::new(0.0, 0.0));
        assert!(end.initial);
        assert!(end.vector.is_zero());
    }

    #[test]
    fn release_after_single_displaced_move_is_a_drag() {
        let mut drag = DragMove::start(Point::new(10.0, 210.0));
        let _ = drag.on_move(Point::new(160.0, 210.0));
        let end = drag.on_end(Point::new(160.0, 210.0));
        assert!(!end.initial);
        assert_eq!(end.vector, Vector::new(150.0, 0.0));
    }

    #[test]
    fn release_after_drag_reports_total_vector() {
        let mut drag = DragMove::start(Point::new(5.0, 5.0));
        let _ = drag.on_move(Point::new(6.0, 6.0));
        let _ = drag.on_move(Point::new(8.0, 9.0));
        let end = drag.on_end(Point::new(15.0, 0.0));
        assert!(!end.initial);
        assert_eq!(end.vector, Vector::new(10.0, -5.0));
        assert_eq!(drag.last_vector(), Vector::new(3.0, 4.0));
        assert_eq!(drag.move_count(), 2);
    }
}
