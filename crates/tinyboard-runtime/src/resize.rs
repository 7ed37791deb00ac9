#![forbid(unsafe_code)]

//! Resize adapter: pointer sequences on a resize handle become candidate
//! rects.
//!
//! The lifecycle matches the [drag adapter](crate::drag): arm on
//! pointer-down, open the session on the first displaced move, re-layout on
//! every displaced move, and commit on pointer-up unless the pointer never
//! moved (a click).
//!
//! Each edge is clamped independently against the item's [`SizeLimit`].
//! The right edge never passes the board's right edge and the left edge
//! never passes 0; the top edge never passes 0, and the bottom edge is only
//! bounded by the limit.

use serde::{Deserialize, Serialize};
use tinyboard_core::{
    DragMove, Edges, LayoutId, LayoutRect, PointerEvent, Rect, ResizeDirection, Vector, clamp,
};
use web_time::Instant;

use crate::instance::Instance;

/// Size bounds for one item. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeLimit {
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
}

impl SizeLimit {
    /// No bounds at all.
    pub const NONE: Self = Self {
        min_width: None,
        min_height: None,
        max_width: None,
        max_height: None,
    };

    /// Minimum size used when nothing else is configured.
    pub const DEFAULT: Self = Self::min(16.0, 16.0);

    #[must_use]
    pub const fn min(width: f64, height: f64) -> Self {
        Self {
            min_width: Some(width),
            min_height: Some(height),
            max_width: None,
            max_height: None,
        }
    }

    #[must_use]
    pub const fn with_max(mut self, width: f64, height: f64) -> Self {
        self.max_width = Some(width);
        self.max_height = Some(height);
        self
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Resize `origin` by dragging the handle at `direction` by `vector`.
#[must_use]
pub fn resize_rect(
    origin: Rect,
    vector: Vector,
    direction: ResizeDirection,
    limit: &SizeLimit,
    bounds: &Rect,
) -> Rect {
    let min_w = limit.min_width.unwrap_or(0.0);
    let min_h = limit.min_height.unwrap_or(0.0);
    let max_w = limit.max_width.unwrap_or(f64::INFINITY);
    let max_h = limit.max_height.unwrap_or(f64::INFINITY);
    let edges = direction.edges();
    let mut rect = origin;

    if edges.contains(Edges::RIGHT) {
        let room = if bounds.width > 0.0 {
            bounds.width - origin.left
        } else {
            f64::INFINITY
        };
        rect.width = clamp(origin.width + vector.x, min_w, max_w.min(room).max(min_w));
    } else if edges.contains(Edges::LEFT) {
        let right = origin.right();
        let left = clamp(
            origin.left + vector.x,
            (right - max_w).max(0.0),
            (right - min_w).max(0.0),
        );
        rect.left = left;
        rect.width = right - left;
    }

    if edges.contains(Edges::BOTTOM) {
        rect.height = clamp(origin.height + vector.y, min_h, max_h);
    } else if edges.contains(Edges::TOP) {
        let bottom = origin.bottom();
        let top = clamp(
            origin.top + vector.y,
            (bottom - max_h).max(0.0),
            (bottom - min_h).max(0.0),
        );
        rect.top = top;
        rect.height = bottom - top;
    }

    rect
}

/// Caller hooks around a resize.
pub trait ResizeHooks {
    /// Return `false` to veto the resize before anything happens.
    fn on_resize_start(
        &mut self,
        _id: &LayoutId,
        _direction: ResizeDirection,
        _event: &PointerEvent,
    ) -> bool {
        true
    }

    /// Adjust the clamped candidate rect.
    fn adjust_rect(&mut self, _id: &LayoutId, rect: Rect) -> Rect {
        rect
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoResizeHooks;

impl ResizeHooks for NoResizeHooks {}

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    Ignored,
    Armed,
    Activated,
    Resized,
    Committed,
    /// Released before a resize was confirmed. Nothing changed.
    Click,
    Cancelled,
}

type SizeLimitFn = Box<dyn Fn(&LayoutId) -> SizeLimit>;

#[derive(Debug)]
struct ResizeSession {
    id: LayoutId,
    direction: ResizeDirection,
    tracker: DragMove,
    origin: Option<Rect>,
    limit: SizeLimit,
}

/// Turns pointer events on resize handles into resize sessions.
pub struct ResizeAdapter<H = NoResizeHooks> {
    hooks: H,
    size_limit: SizeLimitFn,
    session: Option<ResizeSession>,
}

impl ResizeAdapter {
    /// Adapter with the default 16x16 minimum.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hooks(NoResizeHooks)
    }
}

impl Default for ResizeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ResizeHooks> ResizeAdapter<H> {
    #[must_use]
    pub fn with_hooks(hooks: H) -> Self {
        Self {
            hooks,
            size_limit: Box::new(|_| SizeLimit::DEFAULT),
            session: None,
        }
    }

    /// Use the same limit for every item.
    #[must_use]
    pub fn with_limit(self, limit: SizeLimit) -> Self {
        self.with_size_limit(move |_| limit)
    }

    /// Compute the limit per item.
    #[must_use]
    pub fn with_size_limit(mut self, f: impl Fn(&LayoutId) -> SizeLimit + 'static) -> Self {
        self.size_limit = Box::new(f);
        self
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.session.is_some()
    }

    /// Pointer pressed on the `direction` handle of block `id`.
    pub fn pointer_down<T: Clone>(
        &mut self,
        instance: &Instance<T>,
        id: &str,
        direction: ResizeDirection,
        event: &PointerEvent,
    ) -> ResizeOutcome {
        if instance.config().readonly || !event.is_primary() {
            return ResizeOutcome::Ignored;
        }
        let Some(item) = instance.dashboard().get_by_id(id) else {
            return ResizeOutcome::Ignored;
        };
        let id = item.id.clone();
        if !self.hooks.on_resize_start(&id, direction, event) {
            tracing::debug!(id = %id, %direction, "resize vetoed");
            return ResizeOutcome::Ignored;
        }
        let limit = (self.size_limit)(&id);
        tracing::trace!(id = %id, %direction, "resize armed");
        self.session = Some(ResizeSession {
            id,
            direction,
            tracker: DragMove::start(event.point()),
            origin: None,
            limit,
        });
        ResizeOutcome::Armed
    }

    pub fn pointer_move<T: Clone>(
        &mut self,
        instance: &mut Instance<T>,
        event: &PointerEvent,
        now: Instant,
    ) -> ResizeOutcome {
        let Some(session) = self.session.as_mut() else {
            return ResizeOutcome::Ignored;
        };
        let Some(step) = session.tracker.on_move(event.point()) else {
            return ResizeOutcome::Ignored;
        };
        if step.initial {
            let Some(origin) = instance.activate_item(session.id.as_str()) else {
                self.session = None;
                return ResizeOutcome::Ignored;
            };
            session.origin = Some(origin.rect);
        }
        let Some(origin) = session.origin else {
            return ResizeOutcome::Ignored;
        };
        let rect = resize_rect(
            origin,
            step.vector,
            session.direction,
            &session.limit,
            &instance.bounds(),
        );
        let rect = self.hooks.adjust_rect(&session.id, rect);
        instance.re_layout(vec![LayoutRect::new(session.id.clone(), rect)], false, now);
        if step.initial {
            ResizeOutcome::Activated
        } else {
            ResizeOutcome::Resized
        }
    }

    pub fn pointer_up<T: Clone>(
        &mut self,
        instance: &mut Instance<T>,
        event: &PointerEvent,
        now: Instant,
    ) -> ResizeOutcome {
        let Some(session) = self.session.take() else {
            return ResizeOutcome::Ignored;
        };
        let step = session.tracker.on_end(event.point());
        let Some(origin) = session.origin.filter(|_| !step.initial) else {
            if session.origin.is_some() {
                instance.cancel();
            }
            return ResizeOutcome::Click;
        };
        let rect = resize_rect(
            origin,
            step.vector,
            session.direction,
            &session.limit,
            &instance.bounds(),
        );
        let rect = self.hooks.adjust_rect(&session.id, rect);
        instance.commit(vec![LayoutRect::new(session.id, rect)], now);
        ResizeOutcome::Committed
    }

    /// Abandon the resize, restoring the board.
    pub fn abort<T: Clone>(&mut self, instance: &mut Instance<T>) -> ResizeOutcome {
        match self.session.take() {
            Some(session) => {
                if session.origin.is_some() {
                    instance.cancel();
                }
                ResizeOutcome::Cancelled
            }
            None => ResizeOutcome::Ignored,
        }
    }
}

impl<H: std::fmt::Debug> std::fmt::Debug for ResizeAdapter<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeAdapter")
            .field("hooks", &self.hooks)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
