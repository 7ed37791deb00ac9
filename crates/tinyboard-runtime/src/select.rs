#![forbid(unsafe_code)]

//! Pointer-driven selection.
//!
//! The host hands over the node that was hit together with an
//! [`ElementTree`] view of its rendered tree. The controller walks up to the
//! nearest node carrying a layout id and updates the selection:
//!
//! - empty space clears the selection (unless a resize handle was hit);
//! - a plain click selects the block alone;
//! - with [`BoardConfig::multiple`](crate::BoardConfig::multiple) and the
//!   toggle modifier (Ctrl or Meta) the block is toggled;
//! - a plain click inside a multi-selection keeps it until pointer-up, so
//!   the whole selection can be dragged, and narrows it to the block only if
//!   no drag happened.
//!
//! Readonly boards ignore selection input.

use serde::{Deserialize, Serialize};
use tinyboard_core::{LayoutId, PointerEvent};

use crate::instance::Instance;

/// Read-only view of the host's rendered element tree.
pub trait ElementTree {
    type Node: Copy;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// The `data-layout-id` carried by `node` itself.
    fn layout_id(&self, node: Self::Node) -> Option<LayoutId>;

    /// Whether `node` is a resize handle.
    fn is_resize_handle(&self, _node: Self::Node) -> bool {
        false
    }
}

fn ancestors<E: ElementTree>(tree: &E, node: E::Node) -> impl Iterator<Item = E::Node> + '_ {
    std::iter::successors(Some(node), move |&n| tree.parent(n))
}

/// Layout id of `node` or its nearest ancestor that has one.
pub fn closest_layout_id<E: ElementTree>(tree: &E, node: E::Node) -> Option<LayoutId> {
    ancestors(tree, node).find_map(|n| tree.layout_id(n))
}

fn within_resize_handle<E: ElementTree>(tree: &E, node: E::Node) -> bool {
    ancestors(tree, node).any(|n| tree.is_resize_handle(n))
}

/// Which items a click selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Only the clicked item.
    #[default]
    SingleItem,
    /// The clicked item and every item in its group.
    WholeGroup,
}

/// What a pointer event did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Ignored,
    /// Selection is unchanged.
    Unchanged,
    Cleared,
    Selected,
    Toggled,
    /// Narrowing waits for pointer-up.
    Deferred,
}

/// Selection state machine across pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    policy: SelectionPolicy,
    deferred: Option<LayoutId>,
}

impl SelectionController {
    #[must_use]
    pub const fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            deferred: None,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Ids a click on `id` selects under the policy.
    fn expand<T: Clone>(&self, instance: &Instance<T>, id: &LayoutId) -> Vec<LayoutId> {
        let board = instance.dashboard();
        let group = match self.policy {
            SelectionPolicy::SingleItem => None,
            SelectionPolicy::WholeGroup => board
                .get_by_id(id.as_str())
                .and_then(|i| i.group.as_deref()),
        };
        let mut ids = vec![id.clone()];
        if let Some(group) = group {
            ids.extend(
                board
                    .iter()
                    .filter(|item| item.id != *id && item.group.as_deref() == Some(group))
                    .map(|item| item.id.clone()),
            );
        }
        ids
    }

    pub fn pointer_down<T: Clone, E: ElementTree>(
        &mut self,
        instance: &mut Instance<T>,
        tree: &E,
        target: E::Node,
        event: &PointerEvent,
    ) -> SelectOutcome {
        self.deferred = None;
        if instance.config().readonly || !event.is_primary() {
            return SelectOutcome::Ignored;
        }

        let Some(id) = closest_layout_id(tree, target)
            .filter(|id| instance.dashboard().contains(id.as_str()))
        else {
            if within_resize_handle(tree, target) {
                return SelectOutcome::Ignored;
            }
            return if instance.clear_selection() {
                SelectOutcome::Cleared
            } else {
                SelectOutcome::Unchanged
            };
        };

        let ids = self.expand(instance, &id);
        let selected = instance.dashboard().selected_ids();

        if instance.config().multiple && event.modifiers.is_toggle() {
            let next: Vec<LayoutId> = if selected.contains(&id) {
                selected.into_iter().filter(|s| !ids.contains(s)).collect()
            } else {
                selected.into_iter().chain(ids).collect()
            };
            instance.set_selection(next.iter().map(LayoutId::as_str));
            return SelectOutcome::Toggled;
        }

        if selected.contains(&id) && selected.len() > ids.len() {
            tracing::trace!(id = %id, "click inside selection; narrowing deferred");
            self.deferred = Some(id);
            return SelectOutcome::Deferred;
        }

        if instance.select_group(ids.iter().map(LayoutId::as_str)) {
            SelectOutcome::Selected
        } else {
            SelectOutcome::Unchanged
        }
    }

    /// A drag started: the pending narrowing no longer applies.
    pub fn drag_started(&mut self) {
        self.deferred = None;
    }

    pub fn pointer_up<T: Clone>(&mut self, instance: &mut Instance<T>) -> SelectOutcome {
        let Some(id) = self.deferred.take() else {
            return SelectOutcome::Ignored;
        };
        let ids = self.expand(instance, &id);
        if instance.select_group(ids.iter().map(LayoutId::as_str)) {
            SelectOutcome::Selected
        } else {
            SelectOutcome::Unchanged
        }
    }
}
