#![forbid(unsafe_code)]

//! Drop adapter: a block dragged in from outside the board.
//!
//! While the pointer is over the board the incoming block is a virtual rect
//! with an unassigned id, centred on the pointer. It pushes real blocks
//! around like any dragged block. Dropping inserts it under a generated id;
//! leaving the board or rejecting the drop restores everything.

use tinyboard_core::{LayoutId, LayoutRect, Point, Rect, Size};
use web_time::Instant;

use crate::instance::Instance;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DropSession {
    size: Size,
    last: Point,
}

/// Tracks one drag-in from outside the board.
#[derive(Debug, Default)]
pub struct DropAdapter {
    session: Option<DropSession>,
}

/// Board-local rect of size `size` centred on client point `point`.
#[must_use]
pub fn centred_rect(point: Point, size: Size, bounds: &Rect) -> Rect {
    Rect::new(
        point.x - bounds.left - size.width / 2.0,
        point.y - bounds.top - size.height / 2.0,
        size.width,
        size.height,
    )
}

impl DropAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.session.is_some()
    }

    /// The pointer entered the board carrying a block of `size`.
    pub fn enter<T: Clone>(
        &mut self,
        instance: &mut Instance<T>,
        size: Size,
        point: Point,
        now: Instant,
    ) -> bool {
        if self.session.is_some() {
            return self.over(instance, point, now);
        }
        if !instance.activate() {
            return false;
        }
        tracing::debug!(width = size.width, height = size.height, "drop target entered");
        self.session = Some(DropSession { size, last: point });
        let rect = centred_rect(point, size, &instance.bounds());
        instance.re_layout(vec![LayoutRect::unassigned(rect)], false, now);
        true
    }

    /// The pointer moved over the board. Unchanged positions are ignored.
    pub fn over<T: Clone>(&mut self, instance: &mut Instance<T>, point: Point, now: Instant) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.last == point {
            return false;
        }
        session.last = point;
        let rect = centred_rect(point, session.size, &instance.bounds());
        instance.re_layout(vec![LayoutRect::unassigned(rect)], false, now);
        true
    }

    /// The pointer left the board.
    pub fn leave<T: Clone>(&mut self, instance: &mut Instance<T>) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        tracing::debug!("drop target left");
        instance.cancel()
    }

    /// The block was released at `point`. `data` is `None` when the host
    /// rejects the drop.
    pub fn drop<T: Clone>(
        &mut self,
        instance: &mut Instance<T>,
        point: Point,
        data: Option<T>,
        now: Instant,
    ) -> Option<LayoutId> {
        let session = self.session.take()?;
        let Some(data) = data else {
            tracing::debug!("drop rejected");
            instance.cancel();
            return None;
        };
        let rect = centred_rect(point, session.size, &instance.bounds());
        instance.commit_insert(rect, data, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::item::LayoutItem;

    fn board() -> Instance<&'static str> {
        Instance::builder(vec![LayoutItem::new(
            "a",
            Rect::new(0.0, 0.0, 100.0, 50.0),
            "existing",
        )])
        .config(BoardConfig {
            layout: "compact".into(),
            ..BoardConfig::default()
        })
        .bounds(Rect::new(20.0, 10.0, 300.0, 600.0))
        .build()
        .unwrap()
    }

    #[test]
    fn rect_is_centred_on_board_local_pointer() {
        let rect = centred_rect(
            Point::new(120.0, 60.0),
            Size::new(100.0, 40.0),
            &Rect::new(20.0, 10.0, 300.0, 600.0),
        );
        assert_eq!(rect, Rect::new(50.0, 30.0, 100.0, 40.0));
    }

    #[test]
    fn accepted_drop_inserts_block() {
        let now = Instant::now();
        let mut board = board();
        let mut dropper = DropAdapter::new();
        assert!(dropper.enter(&mut board, Size::new(100.0, 40.0), Point::new(70.0, 200.0), now));
        assert_eq!(board.shadows().len(), 1);
        assert!(!dropper.over(&mut board, Point::new(70.0, 200.0), now));

        let id = dropper
            .drop(&mut board, Point::new(70.0, 200.0), Some("chart"), now)
            .unwrap();
        let item = board.dashboard().get_by_id(id.as_str()).unwrap();
        assert_eq!(item.data, "chart");
        // Compaction floats the new block up under `a`.
        assert_eq!(item.rect, Rect::new(0.0, 50.0, 100.0, 40.0));
        assert!(!board.is_active());
        assert!(!dropper.is_over());
    }

    #[test]
    fn rejected_drop_and_leave_restore() {
        let now = Instant::now();
        let mut board = board();
        let before = board.dashboard().layout_rects();
        let mut dropper = DropAdapter::new();

        dropper.enter(&mut board, Size::new(100.0, 40.0), Point::new(70.0, 30.0), now);
        assert!(dropper.leave(&mut board));
        assert_eq!(board.dashboard().layout_rects(), before);
        assert!(!dropper.leave(&mut board));

        dropper.enter(&mut board, Size::new(100.0, 40.0), Point::new(70.0, 30.0), now);
        assert_eq!(dropper.drop(&mut board, Point::new(70.0, 30.0), None, now), None);
        assert_eq!(board.dashboard().layout_rects(), before);
        assert!(!board.is_active());
    }
}
