#![forbid(unsafe_code)]

//! Shadow indicator: the resolved target of each block that is following
//! the pointer.

use tinyboard_core::{LayoutRect, Rect};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShadowIndicator {
    rects: Vec<LayoutRect>,
}

impl ShadowIndicator {
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Move (or show) the shadow of `id`. Returns `true` if anything changed.
    pub fn update(&mut self, shadow: LayoutRect) -> bool {
        if let Some(existing) = self.rects.iter_mut().find(|r| r.id == shadow.id) {
            if existing.rect == shadow.rect {
                return false;
            }
            existing.rect = shadow.rect;
            return true;
        }
        self.rects.push(shadow);
        true
    }

    /// Hide every shadow. Returns `true` if any was shown.
    pub fn hide(&mut self) -> bool {
        let shown = !self.rects.is_empty();
        self.rects.clear();
        shown
    }

    #[must_use]
    pub fn rects(&self) -> &[LayoutRect] {
        &self.rects
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Rect> {
        self.rects
            .iter()
            .find(|r| r.id.as_str() == id)
            .map(|r| r.rect)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.rects.is_empty()
    }
}
