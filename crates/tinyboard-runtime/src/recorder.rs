#![forbid(unsafe_code)]

//! Bridge from rendered blocks back to rects.
//!
//! The host measures its rendered elements and hands the numbers over as
//! plain values; nothing here touches a rendering API. After a percentage or
//! grid style has been laid out by the renderer, the recorded rects are the
//! pixel truth and can be synced into the board with
//! [`LayoutRecorder::apply`].

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tinyboard_core::{LayoutId, LayoutRect, Rect};

use crate::instance::Instance;

/// Offsets and client size of one rendered block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementMeasurement {
    pub offset_left: f64,
    pub offset_top: f64,
    pub client_width: f64,
    pub client_height: f64,
}

impl ElementMeasurement {
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(
            self.offset_left,
            self.offset_top,
            self.client_width,
            self.client_height,
        )
    }
}

/// Position and scroll size of the board container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContainerMeasurement {
    /// Client-space left edge.
    pub left: f64,
    /// Client-space top edge.
    pub top: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
}

impl ContainerMeasurement {
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.scroll_width, self.scroll_height)
    }
}

/// Last measured rect of every rendered block.
#[derive(Debug, Clone, Default)]
pub struct LayoutRecorder {
    bounds: Rect,
    rects: IndexMap<LayoutId, Rect, FxBuildHasher>,
}

impl LayoutRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the recorded state with a fresh measurement. Elements without
    /// a layout id are skipped.
    pub fn update(
        &mut self,
        container: ContainerMeasurement,
        elements: impl IntoIterator<Item = (LayoutId, ElementMeasurement)>,
    ) {
        self.bounds = container.bounds();
        self.rects.clear();
        for (id, measurement) in elements {
            if id.is_assigned() {
                self.rects.insert(id, measurement.rect());
            }
        }
        tracing::trace!(blocks = self.rects.len(), "layout recorded");
    }

    pub fn reset(&mut self) {
        self.bounds = Rect::ZERO;
        self.rects.clear();
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[must_use]
    pub fn rect_by_id(&self, id: &str) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    /// Recorded rects in measurement order.
    #[must_use]
    pub fn layout_rects(&self) -> Vec<LayoutRect> {
        self.rects
            .iter()
            .map(|(id, rect)| LayoutRect::new(id.clone(), *rect))
            .collect()
    }

    /// Push the recorded bounds and rects into `instance`. Returns how many
    /// items changed.
    pub fn apply<T: Clone>(&self, instance: &mut Instance<T>) -> usize {
        instance.set_bounds(self.bounds);
        instance.sync_measured(&self.layout_rects())
    }
}
