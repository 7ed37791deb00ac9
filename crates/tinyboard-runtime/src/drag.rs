#![forbid(unsafe_code)]

//! Drag adapter: pointer sequences on a block become candidate rects.
//!
//! Pointer-down arms the adapter. The first move that actually displaces the
//! pointer opens a session on the [`Instance`] and captures the dragged
//! rects; that move and every later one displaces them by the pointer vector
//! and calls [`Instance::re_layout`]. Pointer-up commits, or is a click when
//! the pointer never moved.
//!
//! Dragging a selected block drags the whole selection.

use tinyboard_core::{
    DragMove, LayoutId, LayoutRect, PointerEvent, Rect, Vector, bounding_box, clamp,
};
use web_time::Instant;

use crate::instance::Instance;

/// Caller hooks around a drag.
pub trait DragHooks {
    /// Return `false` to veto the drag before anything happens.
    fn on_drag_start(&mut self, _id: &LayoutId, _event: &PointerEvent) -> bool {
        true
    }

    /// Constrain the pointer displacement, e.g. to one axis.
    fn adjust_vector(&mut self, _id: &LayoutId, vector: Vector) -> Vector {
        vector
    }
}

/// Hooks that allow everything and change nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDragHooks;

impl DragHooks for NoDragHooks {}

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Not handled: wrong button, readonly board, unknown item, vetoed, no
    /// drag in progress, or a move that did not change the displacement.
    Ignored,
    /// Pointer-down accepted; waiting for movement.
    Armed,
    /// First displaced move: the session is open, the baseline captured,
    /// and the candidate rects fed.
    Activated,
    /// Candidate rects were fed to the instance.
    Moved,
    Committed,
    /// Released before a drag was confirmed. Nothing changed.
    Click,
    Cancelled,
}

/// Displacement bounds that keep the dragged set inside the board
/// horizontally and below its top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VectorLimit {
    min_x: f64,
    max_x: f64,
    min_y: f64,
}

impl VectorLimit {
    fn new(dragged: &Rect, bounds: &Rect) -> Self {
        Self {
            min_x: -dragged.left,
            max_x: bounds.width - dragged.right(),
            min_y: -dragged.top,
        }
    }

    fn apply(&self, vector: Vector) -> Vector {
        Vector::new(
            clamp(vector.x, self.min_x, self.max_x),
            vector.y.max(self.min_y),
        )
    }
}

#[derive(Debug)]
struct DragSession {
    primary: LayoutId,
    ids: Vec<LayoutId>,
    tracker: DragMove,
    origins: Vec<LayoutRect>,
    activated: bool,
    limit: Option<VectorLimit>,
}

impl DragSession {
    fn candidates(&self, vector: Vector) -> Vec<LayoutRect> {
        let vector = self.limit.map_or(vector, |limit| limit.apply(vector));
        self.origins
            .iter()
            .map(|r| r.with_rect(r.rect.translate(vector)))
            .collect()
    }
}

/// Turns pointer events on blocks into drag sessions.
#[derive(Debug, Default)]
pub struct DragAdapter<H = NoDragHooks> {
    hooks: H,
    session: Option<DragSession>,
}

impl DragAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: DragHooks> DragAdapter<H> {
    #[must_use]
    pub fn with_hooks(hooks: H) -> Self {
        Self {
            hooks,
            session: None,
        }
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the pointer has moved since pointer-down.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.tracker.is_dragging())
    }

    /// Pointer pressed on block `id`.
    pub fn pointer_down<T: Clone>(
        &mut self,
        instance: &Instance<T>,
        id: &str,
        event: &PointerEvent,
    ) -> DragOutcome {
        if instance.config().readonly || !event.is_primary() {
            return DragOutcome::Ignored;
        }
        let Some(item) = instance.dashboard().get_by_id(id) else {
            return DragOutcome::Ignored;
        };
        let primary = item.id.clone();
        if !self.hooks.on_drag_start(&primary, event) {
            tracing::debug!(id = %primary, "drag vetoed");
            return DragOutcome::Ignored;
        }

        let mut ids = vec![primary.clone()];
        if instance.is_selected(id) {
            ids.extend(
                instance
                    .dashboard()
                    .selected_ids()
                    .into_iter()
                    .filter(|selected| *selected != primary),
            );
        }
        tracing::trace!(id = %primary, blocks = ids.len(), "drag armed");
        self.session = Some(DragSession {
            primary,
            ids,
            tracker: DragMove::start(event.point()),
            origins: Vec::new(),
            activated: false,
            limit: None,
        });
        DragOutcome::Armed
    }

    pub fn pointer_move<T: Clone>(
        &mut self,
        instance: &mut Instance<T>,
        event: &PointerEvent,
        now: Instant,
    ) -> DragOutcome {
        let Some(session) = self.session.as_mut() else {
            return DragOutcome::Ignored;
        };
        let Some(step) = session.tracker.on_move(event.point()) else {
            return DragOutcome::Ignored;
        };

        if step.initial {
            if instance.activate_item(session.primary.as_str()).is_none() {
                self.session = None;
                return DragOutcome::Ignored;
            }
            session.origins = session
                .ids
                .iter()
                .filter_map(|id| instance.dashboard().get_by_id(id.as_str()))
                .map(|item| item.layout_rect())
                .collect();
            if instance.config().no_overflow {
                let dragged = bounding_box(session.origins.iter().map(|r| &r.rect));
                session.limit = Some(VectorLimit::new(&dragged, &instance.bounds()));
            }
            session.activated = true;
        }

        let vector = self.hooks.adjust_vector(&session.primary, step.vector);
        instance.re_layout(session.candidates(vector), false, now);
        if step.initial {
            DragOutcome::Activated
        } else {
            DragOutcome::Moved
        }
    }

    pub fn pointer_up<T: Clone>(
        &mut self,
        instance: &mut Instance<T>,
        event: &PointerEvent,
        now: Instant,
    ) -> DragOutcome {
        let Some(session) = self.session.take() else {
            return DragOutcome::Ignored;
        };
        let step = session.tracker.on_end(event.point());
        if step.initial {
            if session.activated {
                instance.cancel();
            }
            return DragOutcome::Click;
        }
        let vector = self.hooks.adjust_vector(&session.primary, step.vector);
        instance.commit(session.candidates(vector), now);
        DragOutcome::Committed
    }

    /// Abandon the drag, restoring the board.
    pub fn abort<T: Clone>(&mut self, instance: &mut Instance<T>) -> DragOutcome {
        match self.session.take() {
            Some(session) if session.activated => {
                instance.cancel();
                DragOutcome::Cancelled
            }
            Some(_) => DragOutcome::Cancelled,
            None => DragOutcome::Ignored,
        }
    }
}
