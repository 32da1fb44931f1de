//! Layout configuration: mode, scale policy, grid shape, background, ceiling.
//!
//! # Example
//!
//! ```
//! use zencollage::{Background, GridFit, LayoutConfig, LayoutMode, ScalePolicy};
//!
//! let config = LayoutConfig::grid(3, 2)
//!     .scale(ScalePolicy::GrowToLargest)
//!     .fit(GridFit::Crop)
//!     .background(Background::Transparent);
//!
//! assert_eq!(config.mode, LayoutMode::Grid);
//! assert_eq!(config.grid.rows(), 3);
//! assert_eq!(config.grid.cols(), 2);
//! ```

use crate::color::Background;

/// Default ceiling on output width and height.
pub const DEFAULT_MAX_CANVAS_DIMENSION: f64 = 10_000.0;

/// Rows and columns used when the configured value is zero.
pub const DEFAULT_GRID_DIMENSION: u32 = 2;

/// Placement algorithm.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum LayoutMode {
    /// Common width, images stacked top to bottom.
    #[default]
    Column,
    /// Common height, images placed left to right.
    Row,
    /// Uniform cells filled row-major.
    Grid,
}

/// Which image sets the common width, height, or cell size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ScalePolicy {
    /// Use the minimum across all images; larger images shrink.
    #[default]
    ShrinkToSmallest,
    /// Use the maximum across all images; smaller images grow.
    GrowToLargest,
}

impl ScalePolicy {
    /// Reduce a non-empty sequence of dimensions to the common one.
    ///
    /// Returns `None` for an empty sequence.
    pub fn reduce(self, values: impl IntoIterator<Item = f64>) -> Option<f64> {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, |acc, v| match self {
            Self::ShrinkToSmallest => acc.min(v),
            Self::GrowToLargest => acc.max(v),
        }))
    }
}

/// How an image whose aspect differs from its grid cell is fitted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum GridFit {
    /// Shrink to fit inside the cell, centre, paint the cell background.
    #[default]
    Letterbox,
    /// Crop the source to the cell aspect and fill the cell exactly.
    Crop,
}

/// Grid shape. Only consulted in [`LayoutMode::Grid`].
///
/// A zero row or column count means "unset" and resolves to
/// [`DEFAULT_GRID_DIMENSION`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    pub fit: GridFit,
}

impl GridSpec {
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            fit: GridFit::Letterbox,
        }
    }

    /// Effective row count.
    pub fn rows(&self) -> u32 {
        resolve_grid_dimension(self.rows)
    }

    /// Effective column count.
    pub fn cols(&self) -> u32 {
        resolve_grid_dimension(self.cols)
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_DIMENSION, DEFAULT_GRID_DIMENSION)
    }
}

fn resolve_grid_dimension(v: u32) -> u32 {
    if v == 0 { DEFAULT_GRID_DIMENSION } else { v }
}

/// Everything the layout engine reads besides the images themselves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    pub scale: ScalePolicy,
    pub grid: GridSpec,
    pub background: Background,
    pub max_canvas_dimension: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Column,
            scale: ScalePolicy::ShrinkToSmallest,
            grid: GridSpec::default(),
            background: Background::default(),
            max_canvas_dimension: DEFAULT_MAX_CANVAS_DIMENSION,
        }
    }
}

impl LayoutConfig {
    /// Configuration for the given mode with every other field defaulted.
    pub fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Vertical stack.
    pub fn column() -> Self {
        Self::new(LayoutMode::Column)
    }

    /// Horizontal strip.
    pub fn row() -> Self {
        Self::new(LayoutMode::Row)
    }

    /// `rows × cols` grid, letterboxed.
    pub fn grid(rows: u32, cols: u32) -> Self {
        Self {
            mode: LayoutMode::Grid,
            grid: GridSpec::new(rows, cols),
            ..Self::default()
        }
    }

    /// Set the scale policy.
    pub fn scale(mut self, scale: ScalePolicy) -> Self {
        self.scale = scale;
        self
    }

    /// Set how grid cells fit mismatched images.
    pub fn fit(mut self, fit: GridFit) -> Self {
        self.grid.fit = fit;
        self
    }

    /// Set the background used for letterbox fills.
    pub fn background(mut self, background: impl Into<Background>) -> Self {
        self.background = background.into();
        self
    }

    /// Set the ceiling on output width and height.
    pub fn max_canvas_dimension(mut self, max: f64) -> Self {
        self.max_canvas_dimension = max;
        self
    }

    /// Ceiling actually applied: non-positive or non-finite values fall
    /// back to [`DEFAULT_MAX_CANVAS_DIMENSION`].
    pub fn effective_max_canvas_dimension(&self) -> f64 {
        let max = self.max_canvas_dimension;
        if max.is_finite() && max > 0.0 {
            max
        } else {
            DEFAULT_MAX_CANVAS_DIMENSION
        }
    }
}
