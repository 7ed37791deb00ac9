#![forbid(unsafe_code)]

//! Middleware composition around a [`LayoutHandler`].
//!
//! A [`LayoutPipeline`] starts from a handler and is extended with an ordered
//! list of [`LayoutMiddleware`]. Each middleware receives the function built
//! so far and returns a wrapped one, so the last middleware added runs first
//! and decides whether (and with what inputs) to call the earlier stages.
//!
//! ```
//! use tinyboard_core::{LayoutRect, Rect};
//! use tinyboard_layout::{FreeLayout, LayoutContext, LayoutFn, LayoutPipeline, layout_fn};
//!
//! let pipeline = LayoutPipeline::new(FreeLayout).with(|next: LayoutFn| {
//!     layout_fn(move |interacting, all, cx| {
//!         let mut out = next(interacting, all, cx);
//!         out.retain(|r| r.rect.width > 0.0);
//!         out
//!     })
//! });
//! let cx = LayoutContext::unsnapped(Rect::from_size(100.0, 100.0));
//! let all = [LayoutRect::new("a", Rect::from_size(0.0, 10.0))];
//! assert!(pipeline.resolve(&[], &all, &cx).is_empty());
//! ```

use std::fmt;
use std::rc::Rc;

use tinyboard_core::{LayoutRect, clamp};

use crate::handler::{LayoutContext, LayoutHandler};

/// A composed resolution function.
pub type LayoutFn = Rc<dyn Fn(&[LayoutRect], &[LayoutRect], &LayoutContext<'_>) -> Vec<LayoutRect>>;

/// Wrap a closure as a [`LayoutFn`].
pub fn layout_fn<F>(f: F) -> LayoutFn
where
    F: Fn(&[LayoutRect], &[LayoutRect], &LayoutContext<'_>) -> Vec<LayoutRect> + 'static,
{
    Rc::new(f)
}

/// One stage of a [`LayoutPipeline`].
pub trait LayoutMiddleware {
    fn wrap(&self, next: LayoutFn) -> LayoutFn;
}

impl<F> LayoutMiddleware for F
where
    F: Fn(LayoutFn) -> LayoutFn,
{
    fn wrap(&self, next: LayoutFn) -> LayoutFn {
        self(next)
    }
}

/// A handler plus its middleware, composed once at construction.
#[derive(Clone)]
pub struct LayoutPipeline {
    name: String,
    resolve: LayoutFn,
    stages: usize,
}

impl LayoutPipeline {
    #[must_use]
    pub fn new(handler: impl LayoutHandler + 'static) -> Self {
        Self::from_shared(Rc::new(handler))
    }

    /// Build on a handler that is shared with a registry.
    #[must_use]
    pub fn from_shared(handler: Rc<dyn LayoutHandler>) -> Self {
        let name = handler.name().to_owned();
        Self {
            name,
            resolve: layout_fn(move |interacting, all, cx| handler.resolve(interacting, all, cx)),
            stages: 0,
        }
    }

    /// Add a middleware. It wraps every stage added before it.
    #[must_use]
    pub fn with(mut self, middleware: impl LayoutMiddleware) -> Self {
        self.resolve = middleware.wrap(self.resolve);
        self.stages += 1;
        self
    }

    /// Number of middleware stages.
    #[must_use]
    pub const fn stages(&self) -> usize {
        self.stages
    }

    /// Name of the handler at the core of the pipeline.
    #[must_use]
    pub fn handler_name(&self) -> &str {
        &self.name
    }

    pub fn resolve(
        &self,
        interacting: &[LayoutRect],
        all: &[LayoutRect],
        cx: &LayoutContext<'_>,
    ) -> Vec<LayoutRect> {
        (self.resolve)(interacting, all, cx)
    }
}

impl LayoutHandler for LayoutPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(
        &self,
        interacting: &[LayoutRect],
        all: &[LayoutRect],
        cx: &LayoutContext<'_>,
    ) -> Vec<LayoutRect> {
        LayoutPipeline::resolve(self, interacting, all, cx)
    }
}

impl fmt::Debug for LayoutPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutPipeline")
            .field("handler", &self.name)
            .field("stages", &self.stages)
            .finish()
    }
}

/// Keep interacting rects inside the board horizontally before resolving.
#[must_use]
pub fn clamp_horizontal() -> impl LayoutMiddleware {
    |next: LayoutFn| {
        layout_fn(move |interacting, all, cx| {
            let max_right = cx.bounds.width;
            let clamped: Vec<LayoutRect> = interacting
                .iter()
                .map(|r| {
                    let mut rect = r.rect;
                    rect.left = clamp(rect.left, 0.0, (max_right - rect.width).max(0.0));
                    r.with_rect(rect)
                })
                .collect();
            let all: Vec<LayoutRect> = all
                .iter()
                .map(|r| {
                    clamped
                        .iter()
                        .find(|c| c.id == r.id)
                        .cloned()
                        .unwrap_or_else(|| r.clone())
                })
                .collect();
            next(&clamped, &all, cx)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tinyboard_core::Rect;

    use super::*;
    use crate::compact::CompactLayout;
    use crate::handler::FreeLayout;

    fn cx() -> LayoutContext<'static> {
        LayoutContext::unsnapped(Rect::from_size(300.0, 300.0))
    }

    #[test]
    fn bare_pipeline_delegates_to_handler() {
        let pipeline = LayoutPipeline::new(CompactLayout::default());
        let a = LayoutRect::new("a", Rect::new(0.0, 0.0, 100.0, 50.0));
        let b = LayoutRect::new("b", Rect::new(0.0, 40.0, 100.0, 50.0));
        let out = pipeline.resolve(&[a.clone()], &[a, b], &cx());
        assert_eq!(out[1].rect.top, 50.0);
        assert_eq!(pipeline.handler_name(), "compact");
        assert_eq!(pipeline.stages(), 0);
    }

    #[test]
    fn last_middleware_runs_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let tag = |label: &'static str, log: Rc<RefCell<Vec<&'static str>>>| {
            move |next: LayoutFn| {
                let log = Rc::clone(&log);
                layout_fn(move |interacting, all, cx| {
                    log.borrow_mut().push(label);
                    next(interacting, all, cx)
                })
            }
        };
        let pipeline = LayoutPipeline::new(FreeLayout)
            .with(tag("first", Rc::clone(&log)))
            .with(tag("second", Rc::clone(&log)));
        let _ = pipeline.resolve(&[], &[], &cx());
        assert_eq!(*log.borrow(), vec!["second", "first"]);
        assert_eq!(pipeline.stages(), 2);
    }

    #[test]
    fn middleware_can_skip_previous_stages() {
        let pipeline = LayoutPipeline::new(CompactLayout::default())
            .with(|_next: LayoutFn| layout_fn(|_, all, _| all.to_vec()));
        let b = LayoutRect::new("b", Rect::new(0.0, 40.0, 100.0, 50.0));
        assert_eq!(pipeline.resolve(&[], &[b.clone()], &cx()), vec![b]);
    }

    #[test]
    fn clamp_horizontal_keeps_dragged_rect_inside() {
        let pipeline = LayoutPipeline::new(FreeLayout).with(clamp_horizontal());
        let dragged = LayoutRect::new("a", Rect::new(250.0, 0.0, 100.0, 50.0));
        let out = pipeline.resolve(&[dragged.clone()], &[dragged], &cx());
        assert_eq!(out[0].rect.left, 200.0);

        let dragged = LayoutRect::new("a", Rect::new(-20.0, 0.0, 100.0, 50.0));
        let out = pipeline.resolve(&[dragged.clone()], &[dragged], &cx());
        assert_eq!(out[0].rect.left, 0.0);
    }
}
