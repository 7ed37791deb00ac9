#![forbid(unsafe_code)]

//! Rect setters: snap a raw candidate rect onto the board's unit grid.
//!
//! A [`RectSetter`] runs on every rect a handler resolves for an interacting
//! block. It only changes numbers; collision handling is the handler's job.
//!
//! Snapping rounds half-way values towards positive infinity so that a block
//! dragged to exactly half a cell above zero lands on the same cell as one
//! dragged half a cell below it.

use serde::{Deserialize, Serialize};
use tinyboard_core::Rect;

use crate::error::{LayoutError, Result};

/// Transform applied to candidate rects before collision handling.
pub trait RectSetter {
    /// Snap `rect`. `bounds` is the board container box.
    fn set_rect(&self, rect: Rect, bounds: &Rect) -> Rect;
}

impl<F> RectSetter for F
where
    F: Fn(Rect, &Rect) -> Rect,
{
    fn set_rect(&self, rect: Rect, bounds: &Rect) -> Rect {
        self(rect, bounds)
    }
}

#[inline]
fn snap(value: f64, unit: f64) -> f64 {
    (value / unit + 0.5).floor() * unit
}

/// Pass rects through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unsnapped;

impl RectSetter for Unsnapped {
    fn set_rect(&self, rect: Rect, _bounds: &Rect) -> Rect {
        rect
    }
}

/// Snap every edge to a fixed pixel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridAlign {
    unit_x: f64,
    unit_y: f64,
}

impl GridAlign {
    pub const DEFAULT_UNIT: f64 = 10.0;

    /// Create a grid with the given cell size.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidGridUnit`] when a unit is not a finite,
    /// positive number.
    pub fn new(unit_x: f64, unit_y: f64) -> Result<Self> {
        for (axis, value) in [('x', unit_x), ('y', unit_y)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidGridUnit { axis, value });
            }
        }
        Ok(Self { unit_x, unit_y })
    }

    #[must_use]
    pub const fn unit_x(&self) -> f64 {
        self.unit_x
    }

    #[must_use]
    pub const fn unit_y(&self) -> f64 {
        self.unit_y
    }
}

impl Default for GridAlign {
    fn default() -> Self {
        Self {
            unit_x: Self::DEFAULT_UNIT,
            unit_y: Self::DEFAULT_UNIT,
        }
    }
}

impl RectSetter for GridAlign {
    fn set_rect(&self, rect: Rect, _bounds: &Rect) -> Rect {
        Rect {
            top: snap(rect.top, self.unit_y),
            left: snap(rect.left, self.unit_x),
            width: snap(rect.width, self.unit_x),
            height: snap(rect.height, self.unit_y),
        }
    }
}

/// Snap to a square grid whose cell is a fixed fraction of the board width.
///
/// Both axes use `bounds.width / cell_count`, so layouts keep their shape when
/// the board is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentGrid {
    cell_count: u32,
}

impl PercentGrid {
    pub const DEFAULT_CELL_COUNT: u32 = 192;

    /// # Errors
    ///
    /// Returns [`LayoutError::EmptyPercentGrid`] when `cell_count` is zero.
    pub fn new(cell_count: u32) -> Result<Self> {
        if cell_count == 0 {
            return Err(LayoutError::EmptyPercentGrid);
        }
        Ok(Self { cell_count })
    }

    #[must_use]
    pub const fn cell_count(&self) -> u32 {
        self.cell_count
    }

    /// Cell edge length for a board of the given width.
    #[must_use]
    pub fn unit(&self, container_width: f64) -> f64 {
        container_width / f64::from(self.cell_count)
    }
}

impl Default for PercentGrid {
    fn default() -> Self {
        Self {
            cell_count: Self::DEFAULT_CELL_COUNT,
        }
    }
}

impl RectSetter for PercentGrid {
    fn set_rect(&self, rect: Rect, bounds: &Rect) -> Rect {
        let unit = self.unit(bounds.width);
        if !unit.is_finite() || unit <= 0.0 {
            // Unmeasured board.
            return rect;
        }
        Rect {
            top: snap(rect.top, unit),
            left: snap(rect.left, unit),
            width: snap(rect.width, unit),
            height: snap(rect.height, unit),
        }
    }
}

/// Serializable choice of rect setter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GridConfig {
    /// No snapping.
    #[default]
    None,
    /// Fixed pixel grid.
    Align { unit_x: f64, unit_y: f64 },
    /// Width-relative square grid.
    WidthPercent { cell_count: u32 },
}

impl GridConfig {
    /// Build the configured setter.
    ///
    /// # Errors
    ///
    /// Propagates the constructor errors of [`GridAlign`] and [`PercentGrid`].
    pub fn build(&self) -> Result<Box<dyn RectSetter>> {
        Ok(match *self {
            Self::None => Box::new(Unsnapped),
            Self::Align { unit_x, unit_y } => Box::new(GridAlign::new(unit_x, unit_y)?),
            Self::WidthPercent { cell_count } => Box::new(PercentGrid::new(cell_count)?),
        })
    }
}
