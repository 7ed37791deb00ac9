#![forbid(unsafe_code)]

//! Board items.

use serde::{Deserialize, Serialize};
use tinyboard_core::{LayoutId, LayoutRect, Rect};

/// Layer an item belongs to when none is given.
pub const DEFAULT_LAYER: &str = "default";

fn default_layer() -> String {
    DEFAULT_LAYER.to_owned()
}

/// One block on the board, carrying caller data `T`.
///
/// Items in different layers never collide with each other. Items sharing a
/// `group` are selected together under
/// [`SelectionPolicy::WholeGroup`](crate::SelectionPolicy::WholeGroup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem<T> {
    #[serde(default)]
    pub id: LayoutId,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default = "default_layer")]
    pub layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub data: T,
}

impl<T> LayoutItem<T> {
    /// Item in the default layer with no group.
    #[must_use]
    pub fn new(id: impl Into<LayoutId>, rect: Rect, data: T) -> Self {
        Self {
            id: id.into(),
            rect,
            layer: default_layer(),
            group: None,
            data,
        }
    }

    /// Item whose id is generated on insertion.
    #[must_use]
    pub fn unassigned(rect: Rect, data: T) -> Self {
        Self::new(LayoutId::unassigned(), rect, data)
    }

    #[must_use]
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// The `{id, rect}` pair exchanged with layout handlers.
    #[must_use]
    pub fn layout_rect(&self) -> LayoutRect {
        LayoutRect::new(self.id.clone(), self.rect)
    }
}

/// Per-item interaction flags. Kept beside the items, never exposed in the
/// public item view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ItemStatus {
    pub(crate) selected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders() {
        let item = LayoutItem::new("a", Rect::from_size(10.0, 20.0), ())
            .with_layer("overlay")
            .with_group("g");
        assert_eq!(item.layer, "overlay");
        assert_eq!(item.group.as_deref(), Some("g"));
        assert_eq!(item.layout_rect(), LayoutRect::new("a", Rect::from_size(10.0, 20.0)));
        assert!(!LayoutItem::unassigned(Rect::ZERO, ()).id.is_assigned());
    }

    #[test]
    fn serde_flattens_rect_and_defaults_layer() {
        let item: LayoutItem<u32> = serde_json::from_str(
            r#"{"id":"a","top":1.0,"left":2.0,"width":3.0,"height":4.0,"data":7}"#,
        )
        .unwrap();
        assert_eq!(item.rect, Rect::new(2.0, 1.0, 3.0, 4.0));
        assert_eq!(item.layer, DEFAULT_LAYER);
        assert_eq!(item.group, None);
        assert_eq!(item.data, 7);
    }
}
