#![forbid(unsafe_code)]

//! Layout handlers: resolve a candidate rect set into the rects to show.
//!
//! A handler receives the rects currently being interacted with and the full
//! rect set of one layer. `all` already contains the interacting rects at
//! their candidate positions; a virtual block dragged in from outside the
//! board carries an unassigned id. The returned set contains every input
//! rect exactly once, ordered top to bottom.
//!
//! Handlers are pure: the same inputs always give the same output.

use tinyboard_core::{LayoutRect, Rect};

use crate::rect_setter::{RectSetter, Unsnapped};

/// Board-level inputs shared by every handler call.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    /// Board container box.
    pub bounds: Rect,
    /// Snapping applied to interacting rects.
    pub rect_setter: &'a dyn RectSetter,
}

impl<'a> LayoutContext<'a> {
    #[must_use]
    pub fn new(bounds: Rect, rect_setter: &'a dyn RectSetter) -> Self {
        Self {
            bounds,
            rect_setter,
        }
    }

    /// Context without snapping.
    #[must_use]
    pub fn unsnapped(bounds: Rect) -> LayoutContext<'static> {
        LayoutContext {
            bounds,
            rect_setter: &Unsnapped,
        }
    }

    /// Run `rect` through the context's setter.
    #[must_use]
    pub fn snap(&self, rect: Rect) -> Rect {
        self.rect_setter.set_rect(rect, &self.bounds)
    }
}

impl std::fmt::Debug for LayoutContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutContext")
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

/// A layout resolution policy.
pub trait LayoutHandler {
    /// Name the handler is registered under.
    fn name(&self) -> &str;

    /// Resolve `all` given the rects in `interacting`.
    fn resolve(
        &self,
        interacting: &[LayoutRect],
        all: &[LayoutRect],
        cx: &LayoutContext<'_>,
    ) -> Vec<LayoutRect>;
}

/// Sort rects top to bottom, then left to right, then by id.
pub fn sort_top_down(rects: &mut [LayoutRect]) {
    rects.sort_by(|a, b| {
        a.rect
            .top
            .total_cmp(&b.rect.top)
            .then(a.rect.left.total_cmp(&b.rect.left))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// No collision handling: every rect goes through the setter and is placed
/// where it was asked to be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreeLayout;

impl FreeLayout {
    pub const NAME: &'static str = "free";
}

impl LayoutHandler for FreeLayout {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn resolve(
        &self,
        _interacting: &[LayoutRect],
        all: &[LayoutRect],
        cx: &LayoutContext<'_>,
    ) -> Vec<LayoutRect> {
        let mut out: Vec<LayoutRect> = all.iter().map(|r| r.with_rect(cx.snap(r.rect))).collect();
        sort_top_down(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect_setter::GridAlign;

    fn lr(id: &str, left: f64, top: f64, width: f64, height: f64) -> LayoutRect {
        LayoutRect::new(id, Rect::new(left, top, width, height))
    }

    #[test]
    fn free_layout_keeps_overlaps() {
        let all = vec![lr("b", 0.0, 40.0, 100.0, 50.0), lr("a", 0.0, 0.0, 100.0, 50.0)];
        let cx = LayoutContext::unsnapped(Rect::from_size(300.0, 300.0));
        let out = FreeLayout.resolve(&all[..1], &all, &cx);
        assert_eq!(out, vec![all[1].clone(), all[0].clone()]);
    }

    #[test]
    fn free_layout_snaps_every_rect() {
        let grid = GridAlign::default();
        let cx = LayoutContext::new(Rect::from_size(300.0, 300.0), &grid);
        let out = FreeLayout.resolve(&[], &[lr("a", 3.0, 17.0, 48.0, 52.0)], &cx);
        assert_eq!(out, vec![lr("a", 0.0, 20.0, 50.0, 50.0)]);
    }

    #[test]
    fn sort_is_total() {
        let mut rects = vec![
            lr("c", 10.0, 0.0, 1.0, 1.0),
            lr("b", 0.0, 0.0, 1.0, 1.0),
            lr("a", 0.0, 0.0, 1.0, 1.0),
        ];
        sort_top_down(&mut rects);
        let ids: Vec<&str> = rects.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
