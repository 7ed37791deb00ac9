#![forbid(unsafe_code)]

//! Layout resolution for tinyboard.
//!
//! # Role in tinyboard
//! `tinyboard-layout` turns a candidate set of block rects into the rects the
//! board shows. It is pure: no state survives a call.
//!
//! # Primary responsibilities
//! - **Handlers**: [`FreeLayout`] (no correction) and [`CompactLayout`]
//!   (vertical gravity with swap negotiation), behind [`LayoutHandler`].
//! - **Snapping**: [`RectSetter`] implementations for pixel and
//!   width-relative grids.
//! - **Styles**: [`StyleSetter`] implementations producing [`BlockStyle`]s.
//! - **Composition**: [`LayoutPipeline`] middleware and the owned
//!   [`LayoutRegistry`].

pub mod compact;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod rect_setter;
pub mod registry;
pub mod style_setter;

pub use compact::{CompactConfig, CompactLayout};
pub use error::{LayoutError, Result};
pub use handler::{FreeLayout, LayoutContext, LayoutHandler, sort_top_down};
pub use pipeline::{LayoutFn, LayoutMiddleware, LayoutPipeline, clamp_horizontal, layout_fn};
pub use rect_setter::{GridAlign, GridConfig, PercentGrid, RectSetter, Unsnapped};
pub use registry::LayoutRegistry;
pub use style_setter::{
    AbsoluteStyle, BlockStyle, GridStyle, PercentStyle, StyleConfig, StyleSetter, TransformStyle,
};
