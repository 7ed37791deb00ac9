#![forbid(unsafe_code)]

//! Style setters: turn a resolved rect into a presentation style.
//!
//! The rendering layer is outside this crate. It receives a [`BlockStyle`]
//! per block and either reads the typed fields or asks for CSS declarations
//! with [`BlockStyle::to_css`].

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tinyboard_core::Rect;

/// CSS transition used by [`TransformStyle`].
pub const TRANSFORM_TRANSITION: &str = "all 0.2s ease-out 0s";

/// Presentation form of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockStyle {
    /// Absolutely positioned pixel box.
    Absolute {
        top: f64,
        left: f64,
        width: f64,
        height: f64,
    },
    /// Percentages of the board width, encoded as margins and paddings so the
    /// block scales with its container.
    Percent {
        margin_top: f64,
        margin_left: f64,
        padding_top: f64,
        padding_left: f64,
    },
    /// GPU-composited translation.
    Transform {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// CSS grid placement. Lines are 1-based.
    Grid {
        column_start: i64,
        column_end: i64,
        row_start: i64,
        row_end: i64,
    },
}

fn percent(value: f64) -> String {
    format!("{value:.6}%")
}

impl BlockStyle {
    /// CSS declarations as `(property, value)` pairs.
    #[must_use]
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        match *self {
            Self::Absolute {
                top,
                left,
                width,
                height,
            } => vec![
                ("position", "absolute".to_owned()),
                ("top", format!("{top}px")),
                ("left", format!("{left}px")),
                ("width", format!("{width}px")),
                ("height", format!("{height}px")),
            ],
            Self::Percent {
                margin_top,
                margin_left,
                padding_top,
                padding_left,
            } => vec![
                ("margin-top", percent(margin_top)),
                ("margin-left", percent(margin_left)),
                ("padding-top", percent(padding_top)),
                ("padding-left", percent(padding_left)),
            ],
            Self::Transform {
                x,
                y,
                width,
                height,
            } => vec![
                ("transition", TRANSFORM_TRANSITION.to_owned()),
                ("transform", format!("translate3d({x}px, {y}px, 0)")),
                ("width", format!("{width}px")),
                ("height", format!("{height}px")),
            ],
            Self::Grid {
                column_start,
                column_end,
                row_start,
                row_end,
            } => vec![
                ("grid-column", format!("{column_start} / {column_end}")),
                ("grid-row", format!("{row_start} / {row_end}")),
            ],
        }
    }

    /// Inline CSS text, e.g. `top: 10px; left: 0px;`.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (property, value) in self.declarations() {
            if !css.is_empty() {
                css.push(' ');
            }
            let _ = write!(css, "{property}: {value};");
        }
        css
    }
}

/// Convert a resolved rect into a [`BlockStyle`].
pub trait StyleSetter {
    /// `bounds` is the board container box.
    fn style(&self, rect: &Rect, bounds: &Rect) -> BlockStyle;
}

impl<F> StyleSetter for F
where
    F: Fn(&Rect, &Rect) -> BlockStyle,
{
    fn style(&self, rect: &Rect, bounds: &Rect) -> BlockStyle {
        self(rect, bounds)
    }
}

/// Absolute pixel positioning. Always used for the block being interacted
/// with, whatever setter the board is configured with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsoluteStyle;

impl StyleSetter for AbsoluteStyle {
    fn style(&self, rect: &Rect, _bounds: &Rect) -> BlockStyle {
        BlockStyle::Absolute {
            top: rect.top,
            left: rect.left,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Width-relative percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PercentStyle;

impl StyleSetter for PercentStyle {
    fn style(&self, rect: &Rect, bounds: &Rect) -> BlockStyle {
        let scale = if bounds.width > 0.0 {
            100.0 / bounds.width
        } else {
            0.0
        };
        BlockStyle::Percent {
            margin_top: rect.top * scale,
            margin_left: rect.left * scale,
            padding_top: rect.height * scale,
            padding_left: rect.width * scale,
        }
    }
}

/// `translate3d` positioning with an ease-out transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStyle;

impl StyleSetter for TransformStyle {
    fn style(&self, rect: &Rect, _bounds: &Rect) -> BlockStyle {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        BlockStyle::Transform {
            x: finite(rect.left),
            y: finite(rect.top),
            width: rect.width,
            height: rect.height,
        }
    }
}

/// CSS grid placement with a fixed column count and row height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub columns: u32,
    pub row_height: f64,
}

impl GridStyle {
    pub const DEFAULT_COLUMNS: u32 = 24;
    pub const DEFAULT_ROW_HEIGHT: f64 = 30.0;
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            columns: Self::DEFAULT_COLUMNS,
            row_height: Self::DEFAULT_ROW_HEIGHT,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn grid_index(value: f64, unit: f64) -> i64 {
    if unit > 0.0 && unit.is_finite() {
        (value / unit).round() as i64
    } else {
        0
    }
}

impl StyleSetter for GridStyle {
    fn style(&self, rect: &Rect, bounds: &Rect) -> BlockStyle {
        let unit_x = bounds.width / f64::from(self.columns.max(1));
        let column_start = grid_index(rect.left, unit_x) + 1;
        let row_start = grid_index(rect.top, self.row_height) + 1;
        BlockStyle::Grid {
            column_start,
            column_end: column_start + grid_index(rect.width, unit_x),
            row_start,
            row_end: row_start + grid_index(rect.height, self.row_height),
        }
    }
}

/// Serializable choice of style setter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StyleConfig {
    #[default]
    Absolute,
    Percent,
    Transform,
    Grid {
        #[serde(default = "default_columns")]
        columns: u32,
        #[serde(default = "default_row_height")]
        row_height: f64,
    },
}

fn default_columns() -> u32 {
    GridStyle::DEFAULT_COLUMNS
}

fn default_row_height() -> f64 {
    GridStyle::DEFAULT_ROW_HEIGHT
}

impl StyleConfig {
    #[must_use]
    pub fn build(&self) -> Box<dyn StyleSetter> {
        match *self {
            Self::Absolute => Box::new(AbsoluteStyle),
            Self::Percent => Box::new(PercentStyle),
            Self::Transform => Box::new(TransformStyle),
            Self::Grid {
                columns,
                row_height,
            } => Box::new(GridStyle {
                columns,
                row_height,
            }),
        }
    }
}
