#![forbid(unsafe_code)]

//! The board model.
//!
//! # Role in tinyboard
//! [`Dashboard`] is the authoritative store of [`LayoutItem`]s and their
//! selection flags. The [`Instance`](crate::Instance) writes speculative
//! rects into it during a session; everything else only reads.
//!
//! # Invariants
//! 1. Ids are unique. Iteration follows insertion order.
//! 2. Selection flags exist only for items that are on the board: removing an
//!    item drops its flag in the same call.
//! 3. [`DashboardEvent::SelectionChanged`] is emitted exactly when the set of
//!    selected ids differs from what it was before the call.
//! 4. [`Dashboard::items`] returns a cached snapshot. Every structural or rect
//!    mutation invalidates it; reading never changes observable state.

use std::cell::OnceCell;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use tinyboard_core::{IdGenerator, LayoutId, LayoutRect, Rect, bounding_box};

use crate::error::{BoardError, Result};
use crate::events::{DashboardEvent, Emitter, SubscriptionId};
use crate::item::{ItemStatus, LayoutItem};

/// Item store with selection state and change notification.
pub struct Dashboard<T> {
    items: IndexMap<LayoutId, LayoutItem<T>, FxBuildHasher>,
    status: FxHashMap<LayoutId, ItemStatus>,
    snapshot: OnceCell<Rc<[LayoutItem<T>]>>,
    ids: IdGenerator,
    events: Emitter<DashboardEvent>,
}

impl<T> Dashboard<T> {
    /// Build a board from `items`. Items with an unassigned id get a
    /// generated one.
    ///
    /// # Errors
    ///
    /// [`BoardError::DuplicateId`] if two items share an id.
    pub fn new(items: impl IntoIterator<Item = LayoutItem<T>>) -> Result<Self> {
        Self::with_id_generator(items, IdGenerator::default())
    }

    /// Like [`new`](Self::new) with a custom id source.
    ///
    /// # Errors
    ///
    /// [`BoardError::DuplicateId`] if two items share an id.
    pub fn with_id_generator(
        items: impl IntoIterator<Item = LayoutItem<T>>,
        ids: IdGenerator,
    ) -> Result<Self> {
        let mut board = Self {
            items: IndexMap::default(),
            status: FxHashMap::default(),
            snapshot: OnceCell::new(),
            ids,
            events: Emitter::new(),
        };
        for item in items {
            board.insert(item)?;
        }
        Ok(board)
    }

    fn invalidate(&mut self) {
        self.snapshot.take();
    }

    fn fresh_id(&mut self) -> LayoutId {
        loop {
            let id = self.ids.next_id();
            if !self.items.contains_key(&id) {
                return id;
            }
        }
    }

    /// Insert a new item and return its id.
    ///
    /// # Errors
    ///
    /// [`BoardError::DuplicateId`] if the id is already on the board.
    pub fn insert(&mut self, mut item: LayoutItem<T>) -> Result<LayoutId> {
        if !item.id.is_assigned() {
            item.id = self.fresh_id();
        } else if self.items.contains_key(&item.id) {
            return Err(BoardError::DuplicateId { id: item.id });
        }
        let id = item.id.clone();
        self.status.insert(id.clone(), ItemStatus::default());
        self.items.insert(id.clone(), item);
        self.invalidate();
        Ok(id)
    }

    /// Insert `item`, or replace the item with the same id in place. The
    /// selection flag of a replaced item is kept.
    pub fn add_or_update(&mut self, mut item: LayoutItem<T>) -> LayoutId {
        if !item.id.is_assigned() {
            item.id = self.fresh_id();
        }
        let id = item.id.clone();
        self.status.entry(id.clone()).or_default();
        self.items.insert(id.clone(), item);
        self.invalidate();
        id
    }

    /// Remove one item. Returns `false` if it was not on the board.
    pub fn delete(&mut self, id: &str) -> bool {
        self.delete_batch([id]) == 1
    }

    /// Remove several items and return how many were removed.
    pub fn delete_batch<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> usize {
        let mut removed = 0;
        let mut selection_changed = false;
        for id in ids {
            if self.items.shift_remove(id).is_some() {
                removed += 1;
                if self.status.remove(id).is_some_and(|s| s.selected) {
                    selection_changed = true;
                }
            }
        }
        if removed > 0 {
            self.invalidate();
        }
        if selection_changed {
            let selected = self.selected_ids();
            self.events.emit(&DashboardEvent::SelectionChanged(selected));
        }
        removed
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        let had_selection = self.status.values().any(|s| s.selected);
        self.items.clear();
        self.status.clear();
        self.invalidate();
        if had_selection {
            self.events
                .emit(&DashboardEvent::SelectionChanged(Vec::new()));
        }
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&LayoutItem<T>> {
        self.items.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Layer of an item, if it is on the board.
    #[must_use]
    pub fn layer_name(&self, id: &str) -> Option<&str> {
        self.items.get(id).map(|item| item.layer.as_str())
    }

    /// Distinct layer names in order of first appearance.
    #[must_use]
    pub fn layers(&self) -> Vec<&str> {
        let mut layers: Vec<&str> = Vec::new();
        for item in self.items.values() {
            if !layers.contains(&item.layer.as_str()) {
                layers.push(&item.layer);
            }
        }
        layers
    }

    /// Iterate items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutItem<T>> {
        self.items.values()
    }

    /// `{id, rect}` of every item, in insertion order.
    #[must_use]
    pub fn layout_rects(&self) -> Vec<LayoutRect> {
        self.items.values().map(LayoutItem::layout_rect).collect()
    }

    /// Overwrite the rect of one item. Returns `true` if the rect changed.
    pub fn update_rect(&mut self, id: &str, rect: Rect) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        if item.rect == rect {
            return false;
        }
        item.rect = rect;
        let changed = item.layout_rect();
        self.invalidate();
        tracing::trace!(id = %changed.id, top = rect.top, left = rect.left, "item rect updated");
        self.events.emit(&DashboardEvent::ItemChanged(changed));
        true
    }

    // --- selection -------------------------------------------------------

    fn is_flagged(&self, id: &str) -> bool {
        self.status.get(id).is_some_and(|s| s.selected)
    }

    /// Apply `f` to the selection flags and emit if the selected set changed.
    fn update_selection(&mut self, f: impl FnOnce(&mut FxHashMap<LayoutId, ItemStatus>)) -> bool {
        let before = self.selected_ids();
        f(&mut self.status);
        let after = self.selected_ids();
        if before == after {
            return false;
        }
        tracing::debug!(selected = after.len(), "selection changed");
        self.events.emit(&DashboardEvent::SelectionChanged(after));
        true
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.is_flagged(id)
    }

    /// Selected ids in item order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<LayoutId> {
        self.items
            .keys()
            .filter(|id| self.is_flagged(id.as_str()))
            .cloned()
            .collect()
    }

    pub fn selected_items(&self) -> impl Iterator<Item = &LayoutItem<T>> {
        self.items.values().filter(|item| self.is_flagged(item.id.as_str()))
    }

    pub fn unselected_items(&self) -> impl Iterator<Item = &LayoutItem<T>> {
        self.items.values().filter(|item| !self.is_flagged(item.id.as_str()))
    }

    /// Bounding box of the selection, or `None` when nothing is selected.
    #[must_use]
    pub fn selected_bbox(&self) -> Option<Rect> {
        let mut selected = self.selected_items().map(|item| &item.rect).peekable();
        selected.peek()?;
        Some(bounding_box(selected))
    }

    /// Select `id` and nothing else. Unknown ids leave the selection alone.
    pub fn select_single(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.update_selection(|status| {
            for (key, s) in status.iter_mut() {
                s.selected = key.as_str() == id;
            }
        })
    }

    /// Replace the selection. Ids not on the board are ignored.
    pub fn set_selection<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> bool {
        let wanted: Vec<&str> = ids.into_iter().collect();
        self.update_selection(|status| {
            for (key, s) in status.iter_mut() {
                s.selected = wanted.contains(&key.as_str());
            }
        })
    }

    /// Flip the selection flag of one item.
    pub fn toggle_select(&mut self, id: &str) -> bool {
        self.update_selection(|status| {
            if let Some(s) = status.get_mut(id) {
                s.selected = !s.selected;
            }
        })
    }

    pub fn unselect_item(&mut self, id: &str) -> bool {
        self.update_selection(|status| {
            if let Some(s) = status.get_mut(id) {
                s.selected = false;
            }
        })
    }

    pub fn clear_selection(&mut self) -> bool {
        self.update_selection(|status| {
            for s in status.values_mut() {
                s.selected = false;
            }
        })
    }

    // --- notifications ---------------------------------------------------

    pub fn subscribe(&mut self, listener: impl FnMut(&DashboardEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}

impl<T: Clone> Dashboard<T> {
    /// Snapshot of every item in insertion order.
    #[must_use]
    pub fn items(&self) -> Rc<[LayoutItem<T>]> {
        Rc::clone(
            self.snapshot
                .get_or_init(|| self.items.values().cloned().collect()),
        )
    }
}

impl<T> std::fmt::Debug for Dashboard<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("items", &self.items.keys().collect::<Vec<_>>())
            .field("selected", &self.selected_ids())
            .field("events", &self.events)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn item(id: &str, top: f64) -> LayoutItem<()> {
        LayoutItem::new(id, Rect::new(0.0, top, 100.0, 50.0), ())
    }

    fn board() -> Dashboard<()> {
        Dashboard::new([item("a", 0.0), item("b", 50.0), item("c", 100.0)]).unwrap()
    }

    fn record(board: &mut Dashboard<()>) -> Rc<RefCell<Vec<DashboardEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        board.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        seen
    }

    fn selection_events(seen: &RefCell<Vec<DashboardEvent>>) -> Vec<Vec<LayoutId>> {
        seen.borrow()
            .iter()
            .filter_map(|e| match e {
                DashboardEvent::SelectionChanged(ids) => Some(ids.clone()),
                DashboardEvent::ItemChanged(_) => None,
            })
            .collect()
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Dashboard::new([item("a", 0.0), item("a", 10.0)]).unwrap_err();
        assert!(matches!(err, BoardError::DuplicateId { id } if id.as_str() == "a"));
        let mut board = board();
        assert!(board.insert(item("b", 0.0)).is_err());
    }

    #[test]
    fn generated_ids_skip_taken_ones() {
        let mut board = Dashboard::new([item("block-1", 0.0)]).unwrap();
        let id = board.add_or_update(LayoutItem::unassigned(Rect::ZERO, ()));
        assert_eq!(id.as_str(), "block-2");
        let id = board.insert(LayoutItem::unassigned(Rect::ZERO, ())).unwrap();
        assert_eq!(id.as_str(), "block-3");
    }

    #[test]
    fn add_or_update_replaces_in_place_and_keeps_selection() {
        let mut board = board();
        board.select_single("b");
        board.add_or_update(item("b", 400.0));
        let ids: Vec<&str> = board.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(board.get_by_id("b").unwrap().rect.top, 400.0);
        assert!(board.is_selected("b"));
    }

    #[test]
    fn selection_events_fire_only_on_change() {
        let mut board = board();
        let seen = record(&mut board);

        assert!(board.select_single("a"));
        assert!(!board.select_single("a"));
        assert!(!board.set_selection(["a"]));
        assert!(board.set_selection(["a", "c", "zzz"]));
        assert!(!board.set_selection(["c", "a"]));
        assert!(board.toggle_select("c"));
        assert!(board.unselect_item("a"));
        assert!(!board.unselect_item("a"));
        assert!(!board.clear_selection());

        let a: LayoutId = "a".into();
        let c: LayoutId = "c".into();
        assert_eq!(
            selection_events(&seen),
            vec![vec![a.clone()], vec![a.clone(), c], vec![a], vec![]]
        );
    }

    #[test]
    fn deleting_selected_item_emits_once() {
        let mut board = board();
        board.set_selection(["a", "b"]);
        let seen = record(&mut board);

        assert!(!board.delete("nope"));
        assert!(board.delete("c"));
        assert!(selection_events(&seen).is_empty());

        assert_eq!(board.delete_batch(["a", "b", "a"]), 2);
        assert_eq!(selection_events(&seen), vec![Vec::<LayoutId>::new()]);
        assert!(board.is_empty());
        assert!(!board.is_selected("a"));
    }

    #[test]
    fn selected_bbox_and_partition() {
        let mut board = board();
        assert_eq!(board.selected_bbox(), None);
        board.set_selection(["a", "c"]);
        assert_eq!(board.selected_bbox(), Some(Rect::new(0.0, 0.0, 100.0, 150.0)));
        assert_eq!(board.selected_items().count(), 2);
        let rest: Vec<&str> = board.unselected_items().map(|i| i.id.as_str()).collect();
        assert_eq!(rest, vec!["b"]);
    }

    #[test]
    fn items_snapshot_is_cached_until_mutation() {
        let mut board = board();
        let first = board.items();
        assert!(Rc::ptr_eq(&first, &board.items()));

        assert!(!board.update_rect("a", first[0].rect));
        assert!(Rc::ptr_eq(&first, &board.items()));

        assert!(board.update_rect("a", Rect::new(0.0, 5.0, 100.0, 50.0)));
        let second = board.items();
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(second[0].rect.top, 5.0);
        assert_eq!(first[0].rect.top, 0.0);
    }

    #[test]
    fn update_rect_emits_item_changed() {
        let mut board = board();
        let seen = record(&mut board);
        board.update_rect("b", Rect::new(10.0, 50.0, 100.0, 50.0));
        assert_eq!(
            *seen.borrow(),
            vec![DashboardEvent::ItemChanged(LayoutRect::new(
                "b",
                Rect::new(10.0, 50.0, 100.0, 50.0)
            ))]
        );
        assert!(!board.update_rect("zzz", Rect::ZERO));
    }

    #[test]
    fn layers_in_first_seen_order() {
        let mut board = board();
        board.add_or_update(item("d", 0.0).with_layer("overlay"));
        assert_eq!(board.layers(), vec!["default", "overlay"]);
        assert_eq!(board.layer_name("d"), Some("overlay"));
        assert_eq!(board.layer_name("zzz"), None);
    }

    #[test]
    fn clear_drops_selection() {
        let mut board = board();
        board.select_single("a");
        let seen = record(&mut board);
        board.clear();
        assert!(board.is_empty());
        assert_eq!(selection_events(&seen), vec![Vec::<LayoutId>::new()]);
    }
}
