//! Collage layout computation and compositing.
//!
//! Give it the dimensions of an ordered set of images and a [`LayoutConfig`];
//! get back a [`PlacementPlan`] saying how big the canvas is, where each image
//! lands, which part of each source is shown, and where background fills go.
//! Any [`DrawSurface`] can then replay the plan.
//!
//! Layout is pure geometry and `no_std` compatible (with `alloc`).
//!
//! # Modules
//!
//! - [`layout`]: column, row and grid placement, letterbox and crop, canvas clamping
//! - [`composite`]: plan replay onto a [`DrawSurface`], plus a recording surface
//! - [`config`]: layout modes, scale policy, grid shape and canvas ceiling
//! - [`color`]: background colors and hex parsing
//! - [`geometry`]: sizes and rectangles
//! - `raster` (feature `raster`): RGBA8 canvas and PNG export via `image`
//! - `svg` (feature `svg`): SVG preview of a plan
//! - `query` (feature `query`): configuration from URL query strings
//!
//! # Example
//!
//! ```
//! use zencollage::{GridFit, ImageDescriptor, LayoutConfig, Recorder, ScalePolicy, compute_layout};
//!
//! let images = [
//!     ImageDescriptor::new("landscape", 1600.0, 900.0),
//!     ImageDescriptor::new("square", 1000.0, 1000.0),
//!     ImageDescriptor::new("portrait", 900.0, 1600.0),
//! ];
//! let config = LayoutConfig::grid(2, 2)
//!     .scale(ScalePolicy::ShrinkToSmallest)
//!     .fit(GridFit::Crop);
//!
//! let plan = compute_layout(&images, &config).unwrap();
//! assert_eq!((plan.canvas.width, plan.canvas.height), (1800.0, 1800.0));
//!
//! // Replay in order: fills (none for crop), then images.
//! let ops = Recorder::record(&plan);
//! assert_eq!(ops.len(), 3);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod color;
pub mod composite;
pub mod config;
pub mod geometry;
pub mod layout;

#[cfg(feature = "query")]
pub mod query;
#[cfg(feature = "raster")]
pub mod raster;
#[cfg(feature = "svg")]
pub mod svg;

pub use color::{Background, ParseColorError, Rgba};
pub use composite::{DrawOp, DrawSurface, Recorder, composite};
pub use config::{
    DEFAULT_GRID_DIMENSION, DEFAULT_MAX_CANVAS_DIMENSION, GridFit, GridSpec, LayoutConfig,
    LayoutMode, ScalePolicy,
};
pub use geometry::{Rect, Size};
pub use layout::{Fill, ImageDescriptor, LayoutError, Placement, PlacementPlan, compute_layout};
