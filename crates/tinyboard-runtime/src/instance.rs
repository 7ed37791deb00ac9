#![forbid(unsafe_code)]

//! Interaction sessions on one board.
//!
//! # Role in tinyboard
//! [`Instance`] sits between the pointer adapters and the [`Dashboard`]. It
//! owns the composed [`LayoutPipeline`], the throttle that rate-limits
//! speculative resolution, and the shadow indicator.
//!
//! # Session lifecycle
//!
//! ```text
//! Idle ──activate──▶ Activated ──re_layout*──▶ commit | cancel ──▶ Idle
//! ```
//!
//! - The first `re_layout` of a session resolves synchronously (leading
//!   call). Later calls park their rects in a single pending slot that is
//!   resolved when the window closes; the host drives that through
//!   [`Instance::poll`].
//! - `commit` resolves synchronously with the final rects, keeps the result,
//!   and notifies `on_layout_updated`.
//! - `cancel` puts every rect back exactly as it was at activation and never
//!   notifies `on_layout_updated`.
//! - Session methods called while idle are ignored and logged at `debug`.
//!
//! # Layers
//! Every layer is resolved on its own: rects in one layer never push rects in
//! another. A block dragged in from outside belongs to the default layer.

use std::fmt;

use rustc_hash::FxHashSet;
use tinyboard_core::{IdGenerator, LayoutId, LayoutRect, Rect};
use tinyboard_layout::{
    AbsoluteStyle, BlockStyle, LayoutContext, LayoutFn, LayoutMiddleware, LayoutPipeline,
    LayoutRegistry, RectSetter, StyleSetter, clamp_horizontal,
};
use web_time::Instant;

use crate::config::BoardConfig;
use crate::dashboard::Dashboard;
use crate::error::{BoardError, Result};
use crate::events::{DashboardEvent, Emitter, InstanceEvent, SubscriptionId};
use crate::item::{DEFAULT_LAYER, LayoutItem};
use crate::shadow::ShadowIndicator;
use crate::throttle::Throttle;

/// A board whose content overshoots its container by less than this is not
/// grown.
pub const AUTO_EXPAND_TOLERANCE: f64 = 5.0;

/// Where the session state machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Activated,
}

/// Boolean board options, for [`Instance::is_enabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardFlag {
    Readonly,
    Multiple,
    SmoothDrag,
    NoOverflow,
}

type ActivatedHook = Box<dyn FnMut(Option<&LayoutId>)>;
type UpdatedHook<T> = Box<dyn FnMut(&[LayoutItem<T>])>;
type BoxedMiddleware = Box<dyn Fn(LayoutFn) -> LayoutFn>;

#[derive(Debug)]
struct Session {
    target: Option<LayoutId>,
    snapshot: Vec<LayoutRect>,
    leading: bool,
    interacting: Vec<LayoutId>,
}

/// Assembles an [`Instance`].
pub struct InstanceBuilder<T> {
    items: Vec<LayoutItem<T>>,
    config: BoardConfig,
    bounds: Rect,
    registry: Option<LayoutRegistry>,
    middleware: Vec<BoxedMiddleware>,
    rect_setter: Option<Box<dyn RectSetter>>,
    style_setter: Option<Box<dyn StyleSetter>>,
    on_layout_activated: Option<ActivatedHook>,
    on_layout_updated: Option<UpdatedHook<T>>,
}

impl<T: Clone> InstanceBuilder<T> {
    #[must_use]
    pub fn config(mut self, config: BoardConfig) -> Self {
        self.config = config;
        self
    }

    /// Container box of the board.
    #[must_use]
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Look handlers up here instead of in the built-in registry.
    #[must_use]
    pub fn registry(mut self, registry: LayoutRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Add a middleware stage. Stages added later run first.
    #[must_use]
    pub fn middleware(mut self, middleware: impl LayoutMiddleware + 'static) -> Self {
        self.middleware
            .push(Box::new(move |next: LayoutFn| middleware.wrap(next)));
        self
    }

    /// Override the rect setter built from [`BoardConfig::grid`].
    #[must_use]
    pub fn rect_setter(mut self, setter: impl RectSetter + 'static) -> Self {
        self.rect_setter = Some(Box::new(setter));
        self
    }

    /// Override the style setter built from [`BoardConfig::style`].
    #[must_use]
    pub fn style_setter(mut self, setter: impl StyleSetter + 'static) -> Self {
        self.style_setter = Some(Box::new(setter));
        self
    }

    /// Called when a session opens, with the item it targets (if any).
    #[must_use]
    pub fn on_layout_activated(mut self, hook: impl FnMut(Option<&LayoutId>) + 'static) -> Self {
        self.on_layout_activated = Some(Box::new(hook));
        self
    }

    /// Called with every item after each commit.
    #[must_use]
    pub fn on_layout_updated(mut self, hook: impl FnMut(&[LayoutItem<T>]) + 'static) -> Self {
        self.on_layout_updated = Some(Box::new(hook));
        self
    }

    /// Validate the configuration and compose the pipeline.
    ///
    /// # Errors
    ///
    /// - [`BoardError::Config`] when the configuration does not validate.
    /// - [`BoardError::Layout`] when the handler is not registered or the
    ///   grid is invalid.
    /// - [`BoardError::DuplicateId`] when two items share an id.
    pub fn build(self) -> Result<Instance<T>> {
        let config = self.config.into_validated()?;
        let registry = self
            .registry
            .unwrap_or_else(|| LayoutRegistry::with_builtins(config.compact));
        let handler = registry.get(&config.layout)?;

        let mut pipeline = LayoutPipeline::from_shared(handler).with(clamp_horizontal());
        for middleware in self.middleware {
            pipeline = pipeline.with(middleware);
        }

        let rect_setter = match self.rect_setter {
            Some(setter) => setter,
            None => config.grid.build()?,
        };
        let style_setter = self
            .style_setter
            .unwrap_or_else(|| config.style.build());
        let dashboard = Dashboard::with_id_generator(
            self.items,
            IdGenerator::new(config.id_prefix.clone()),
        )?;

        tracing::debug!(
            handler = pipeline.handler_name(),
            stages = pipeline.stages(),
            items = dashboard.len(),
            "board instance built"
        );

        Ok(Instance {
            throttle: Throttle::new(config.throttle_timing()),
            dashboard,
            config,
            pipeline,
            rect_setter,
            style_setter,
            bounds: self.bounds,
            session: None,
            shadow: ShadowIndicator::new(),
            events: Emitter::new(),
            on_layout_activated: self.on_layout_activated,
            on_layout_updated: self.on_layout_updated,
        })
    }
}

/// Session controller for one board.
pub struct Instance<T> {
    dashboard: Dashboard<T>,
    config: BoardConfig,
    pipeline: LayoutPipeline,
    rect_setter: Box<dyn RectSetter>,
    style_setter: Box<dyn StyleSetter>,
    bounds: Rect,
    session: Option<Session>,
    throttle: Throttle<Vec<LayoutRect>>,
    shadow: ShadowIndicator,
    events: Emitter<InstanceEvent>,
    on_layout_activated: Option<ActivatedHook>,
    on_layout_updated: Option<UpdatedHook<T>>,
}

impl<T: Clone> Instance<T> {
    /// Start building a board holding `items`.
    #[must_use]
    pub fn builder(items: impl IntoIterator<Item = LayoutItem<T>>) -> InstanceBuilder<T> {
        InstanceBuilder {
            items: items.into_iter().collect(),
            config: BoardConfig::default(),
            bounds: Rect::ZERO,
            registry: None,
            middleware: Vec::new(),
            rect_setter: None,
            style_setter: None,
            on_layout_activated: None,
            on_layout_updated: None,
        }
    }

    // --- accessors -------------------------------------------------------

    #[must_use]
    pub fn dashboard(&self) -> &Dashboard<T> {
        &self.dashboard
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn pipeline(&self) -> &LayoutPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn is_enabled(&self, flag: BoardFlag) -> bool {
        match flag {
            BoardFlag::Readonly => self.config.readonly,
            BoardFlag::Multiple => self.config.multiple,
            BoardFlag::SmoothDrag => self.config.smooth_drag,
            BoardFlag::NoOverflow => self.config.no_overflow,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::Activated
        } else {
            SessionState::Idle
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Resolved targets of the blocks following the pointer.
    #[must_use]
    pub fn shadows(&self) -> &[LayoutRect] {
        self.shadow.rects()
    }

    /// Deadline of the pending trailing resolution.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttle.next_deadline()
    }

    /// Height the board container needs to show every item. `None` for an
    /// empty board.
    #[must_use]
    pub fn board_height(&self) -> Option<f64> {
        let bottom = self
            .dashboard
            .iter()
            .map(|item| item.rect.bottom())
            .reduce(f64::max)?;
        let overshoot = bottom - self.bounds.height;
        if overshoot > 0.0 && overshoot < AUTO_EXPAND_TOLERANCE {
            Some(self.bounds.height)
        } else {
            Some(bottom)
        }
    }

    // --- notifications ---------------------------------------------------

    pub fn subscribe(&mut self, listener: impl FnMut(&InstanceEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn subscribe_dashboard(
        &mut self,
        listener: impl FnMut(&DashboardEvent) + 'static,
    ) -> SubscriptionId {
        self.dashboard.subscribe(listener)
    }

    // --- session ---------------------------------------------------------

    /// Open a session with no target item, e.g. for a drag-in from outside.
    /// Returns `false` on a readonly board.
    pub fn activate(&mut self) -> bool {
        self.open_session(None)
    }

    /// Open a session targeting `id` and return its committed rect.
    pub fn activate_item(&mut self, id: &str) -> Option<LayoutRect> {
        let rect = self.dashboard.get_by_id(id)?.layout_rect();
        self.open_session(Some(rect.id.clone())).then_some(rect)
    }

    fn open_session(&mut self, target: Option<LayoutId>) -> bool {
        if self.config.readonly {
            tracing::debug!("activation ignored: board is readonly");
            return false;
        }
        if self.session.is_some() {
            tracing::trace!("activation inside an open session keeps its snapshot");
            return true;
        }
        tracing::debug!(item = ?target, "layout session activated");
        self.throttle.reset();
        self.session = Some(Session {
            target: target.clone(),
            snapshot: self.dashboard.layout_rects(),
            leading: true,
            interacting: Vec::new(),
        });
        if let Some(hook) = self.on_layout_activated.as_mut() {
            hook(target.as_ref());
        }
        true
    }

    /// Feed candidate rects for the interacting blocks.
    ///
    /// With `immediate`, the pending trailing run is dropped and `rects` are
    /// resolved now, and every block (dragged ones included) takes its
    /// resolved position.
    pub fn re_layout(&mut self, rects: Vec<LayoutRect>, immediate: bool, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(op = "re_layout", "ignored outside a session");
            return;
        };
        session.interacting = rects
            .iter()
            .filter(|r| r.id.is_assigned())
            .map(|r| r.id.clone())
            .collect();
        let leading = std::mem::replace(&mut session.leading, false);

        if immediate {
            self.throttle.run_now(now);
            self.resolve(&rects, true);
            return;
        }

        if self.config.smooth_drag {
            for r in rects.iter().filter(|r| r.id.is_assigned()) {
                self.dashboard.update_rect(r.id.as_str(), r.rect);
            }
        }

        if leading {
            self.throttle.run_now(now);
            self.resolve(&rects, false);
        } else if let Some(rects) = self.throttle.submit(rects, now) {
            self.resolve(&rects, false);
        } else {
            tracing::trace!("re_layout deferred to trailing run");
        }
    }

    /// Run the trailing resolution if it is due. Returns `true` if it ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.session.is_none() {
            return false;
        }
        let Some(rects) = self.throttle.poll(now) else {
            return false;
        };
        self.resolve(&rects, false);
        true
    }

    /// Resolve `rects` one last time, keep the result, and end the session.
    pub fn commit(&mut self, rects: Vec<LayoutRect>, now: Instant) -> bool {
        if self.session.is_none() {
            tracing::debug!(op = "commit", "ignored outside a session");
            return false;
        }
        self.re_layout(rects, true, now);
        self.notify_updated();
        self.end_session("committed");
        true
    }

    /// Commit a block dragged in from outside: `rect` is resolved as an
    /// unassigned block and inserted under a generated id.
    pub fn commit_insert(&mut self, rect: Rect, data: T, now: Instant) -> Option<LayoutId> {
        if self.session.is_none() {
            tracing::debug!(op = "commit_insert", "ignored outside a session");
            return None;
        }
        self.throttle.run_now(now);
        let placed = self
            .resolve(&[LayoutRect::unassigned(rect)], true)
            .unwrap_or(rect);
        let id = self
            .dashboard
            .add_or_update(LayoutItem::unassigned(placed, data));
        tracing::debug!(id = %id, "dropped block inserted");
        self.notify_updated();
        self.end_session("committed");
        Some(id)
    }

    /// Drop pending work and restore every rect to its activation value.
    pub fn cancel(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            tracing::debug!(op = "cancel", "ignored outside a session");
            return false;
        };
        for r in &session.snapshot {
            self.dashboard.update_rect(r.id.as_str(), r.rect);
        }
        self.end_session("cancelled");
        true
    }

    fn end_session(&mut self, outcome: &'static str) {
        self.session = None;
        self.throttle.reset();
        if self.shadow.hide() {
            self.events.emit(&InstanceEvent::ShadowHidden);
        }
        self.show_resizer();
        tracing::debug!(outcome, "layout session ended");
    }

    fn notify_updated(&mut self) {
        if let Some(hook) = self.on_layout_updated.as_mut() {
            let items = self.dashboard.items();
            hook(&items[..]);
        }
    }

    fn show_resizer(&mut self) {
        if let Some(bbox) = self.dashboard.selected_bbox() {
            self.events.emit(&InstanceEvent::ResizerShown(bbox));
        }
    }

    /// Resolve each layer and apply the result. Returns where an unassigned
    /// block ended up.
    fn resolve(&mut self, rects: &[LayoutRect], align_to_shadow: bool) -> Option<Rect> {
        let _span = tracing::debug_span!(
            "instance.resolve",
            interacting = rects.len(),
            align_to_shadow,
            handler = self.pipeline.handler_name()
        )
        .entered();

        let interacting: Vec<&LayoutRect> = rects
            .iter()
            .filter(|r| {
                let known = !r.id.is_assigned() || self.dashboard.contains(r.id.as_str());
                if !known {
                    tracing::debug!(id = %r.id, "interacting rect for unknown item ignored");
                }
                known
            })
            .collect();
        let layer_of = |r: &LayoutRect| {
            self.dashboard
                .layer_name(r.id.as_str())
                .unwrap_or(DEFAULT_LAYER)
                .to_owned()
        };

        let mut layers: Vec<String> = self
            .dashboard
            .layers()
            .into_iter()
            .map(str::to_owned)
            .collect();
        if interacting.iter().any(|r| !r.id.is_assigned())
            && !layers.iter().any(|l| l == DEFAULT_LAYER)
        {
            layers.push(DEFAULT_LAYER.to_owned());
        }

        let resolved: Vec<LayoutRect> = {
            let cx = LayoutContext::new(self.bounds, &*self.rect_setter);
            let mut resolved = Vec::with_capacity(self.dashboard.len() + 1);
            for layer in &layers {
                let moving: Vec<LayoutRect> = interacting
                    .iter()
                    .filter(|r| layer_of(**r) == *layer)
                    .map(|r| (*r).clone())
                    .collect();
                let mut all: Vec<LayoutRect> = self
                    .dashboard
                    .iter()
                    .filter(|item| item.layer == *layer)
                    .map(|item| {
                        moving
                            .iter()
                            .find(|m| m.id == item.id)
                            .cloned()
                            .unwrap_or_else(|| item.layout_rect())
                    })
                    .collect();
                all.extend(moving.iter().filter(|m| !m.id.is_assigned()).cloned());
                resolved.extend(self.pipeline.resolve(&moving, &all, &cx));
            }
            resolved
        };

        let follow_pointer = self.config.smooth_drag && !align_to_shadow;
        let moving_ids: FxHashSet<&LayoutId> = interacting.iter().map(|r| &r.id).collect();
        let mut placed = None;
        let mut shadows = Vec::new();
        let mut writes = Vec::new();
        for r in resolved {
            if !r.id.is_assigned() {
                placed = Some(r.rect);
                if !align_to_shadow {
                    shadows.push(r);
                }
            } else if follow_pointer && moving_ids.contains(&r.id) {
                shadows.push(r);
            } else {
                writes.push(r);
            }
        }

        let mut changed = 0usize;
        for r in writes {
            if self.dashboard.update_rect(r.id.as_str(), r.rect) {
                changed += 1;
            }
        }
        for shadow in shadows {
            if self.shadow.update(shadow.clone()) {
                self.events.emit(&InstanceEvent::ShadowUpdated {
                    id: shadow.id,
                    rect: shadow.rect,
                });
            }
        }
        tracing::trace!(changed, "resolution applied");
        placed
    }

    // --- board API -------------------------------------------------------

    /// Insert `item` and lay the board out again.
    ///
    /// # Errors
    ///
    /// [`BoardError::Readonly`] on a readonly board,
    /// [`BoardError::DuplicateId`] if the id is taken.
    pub fn add_layout_item(&mut self, item: LayoutItem<T>, now: Instant) -> Result<LayoutId> {
        if self.config.readonly {
            return Err(BoardError::Readonly);
        }
        let id = self.dashboard.insert(item)?;
        if self.session.is_some() {
            tracing::debug!(id = %id, "item added during a session; layout waits for commit");
        } else if self.open_session(Some(id.clone())) {
            self.commit(Vec::new(), now);
        }
        Ok(id)
    }

    /// Remove an item and lay the board out again.
    pub fn remove_layout_item(&mut self, id: &str, now: Instant) -> bool {
        if self.config.readonly {
            tracing::debug!(op = "remove_layout_item", "ignored: board is readonly");
            return false;
        }
        if !self.dashboard.delete(id) {
            return false;
        }
        if self.session.is_none() && self.open_session(None) {
            self.commit(Vec::new(), now);
        }
        true
    }

    /// Move or resize an item outside any pointer interaction.
    ///
    /// # Errors
    ///
    /// [`BoardError::Readonly`] on a readonly board,
    /// [`BoardError::UnknownItem`] if the id is not on the board.
    pub fn update_layout_item(&mut self, rect: LayoutRect, now: Instant) -> Result<()> {
        if self.config.readonly {
            return Err(BoardError::Readonly);
        }
        if !self.dashboard.contains(rect.id.as_str()) {
            return Err(BoardError::UnknownItem { id: rect.id });
        }
        if self.session.is_some() {
            self.re_layout(vec![rect], true, now);
        } else if self.open_session(Some(rect.id.clone())) {
            self.commit(vec![rect], now);
        }
        Ok(())
    }

    /// Write measured rects straight into the board without resolving.
    /// Returns how many items changed. Ignored during a session.
    pub fn sync_measured(&mut self, rects: &[LayoutRect]) -> usize {
        if self.session.is_some() {
            tracing::debug!(op = "sync_measured", "ignored during a session");
            return 0;
        }
        rects
            .iter()
            .filter(|r| self.dashboard.update_rect(r.id.as_str(), r.rect))
            .count()
    }

    /// Replace the selection. An empty list clears it. Without
    /// [`BoardConfig::multiple`] only the first id is kept.
    pub fn set_selection<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> bool {
        if self.config.readonly {
            return false;
        }
        let mut ids: Vec<&str> = ids.into_iter().collect();
        if !self.config.multiple {
            ids.truncate(1);
        }
        self.replace_selection(ids)
    }

    /// Select every item of one group, whatever [`BoardConfig::multiple`]
    /// says: a group is a single selection target.
    pub(crate) fn select_group<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> bool {
        if self.config.readonly {
            return false;
        }
        self.replace_selection(ids.into_iter().collect())
    }

    fn replace_selection(&mut self, ids: Vec<&str>) -> bool {
        let changed = if ids.is_empty() {
            self.dashboard.clear_selection()
        } else {
            self.dashboard.set_selection(ids)
        };
        if changed {
            self.show_resizer();
        }
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.config.readonly {
            return false;
        }
        self.dashboard.clear_selection()
    }

    /// Toggle one item. Without [`BoardConfig::multiple`] selecting it drops
    /// the rest of the selection.
    pub fn toggle_selected(&mut self, id: &str) -> bool {
        if self.config.readonly {
            return false;
        }
        let changed = if self.config.multiple {
            self.dashboard.toggle_select(id)
        } else if self.dashboard.is_selected(id) {
            self.dashboard.unselect_item(id)
        } else {
            self.dashboard.select_single(id)
        };
        if changed {
            self.show_resizer();
        }
        changed
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.dashboard.is_selected(id)
    }

    /// Presentation style of an item. Blocks being interacted with are
    /// always absolutely positioned.
    #[must_use]
    pub fn style_of(&self, id: &str) -> Option<BlockStyle> {
        let item = self.dashboard.get_by_id(id)?;
        let interacting = self.session.as_ref().is_some_and(|s| {
            s.target.as_ref().is_some_and(|t| t.as_str() == id)
                || s.interacting.iter().any(|i| i.as_str() == id)
        });
        Some(if interacting {
            AbsoluteStyle.style(&item.rect, &self.bounds)
        } else {
            self.style_setter.style(&item.rect, &self.bounds)
        })
    }

    /// Style for an arbitrary rect, e.g. a shadow.
    #[must_use]
    pub fn style_for(&self, rect: &Rect) -> BlockStyle {
        self.style_setter.style(rect, &self.bounds)
    }

    /// Attributes the renderer puts on an item's element.
    #[must_use]
    pub fn item_attributes(item: &LayoutItem<T>) -> [(&'static str, String); 2] {
        [
            ("data-layer", item.layer.clone()),
            ("data-layout-id", item.id.to_string()),
        ]
    }
}

impl<T> fmt::Debug for Instance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("dashboard", &self.dashboard)
            .field("pipeline", &self.pipeline)
            .field("bounds", &self.bounds)
            .field("session", &self.session)
            .field("shadow", &self.shadow)
            .finish_non_exhaustive()
    }
}
