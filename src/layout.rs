//! Collage layout computation.
//!
//! Turns an ordered list of image dimensions plus a [`LayoutConfig`] into a
//! [`PlacementPlan`]: canvas size, where each image goes, which part of the
//! source it shows, and which background fills precede it. Pure geometry,
//! no pixel operations.
//!
//! # Example
//!
//! ```
//! use zencollage::{ImageDescriptor, LayoutConfig, Rect, compute_layout};
//!
//! let images = [
//!     ImageDescriptor::new("a", 100.0, 100.0),
//!     ImageDescriptor::new("b", 200.0, 50.0),
//! ];
//! let plan = compute_layout(&images, &LayoutConfig::column()).unwrap();
//!
//! assert_eq!((plan.canvas.width, plan.canvas.height), (100.0, 125.0));
//! assert_eq!(plan.placements[1].dest, Rect::new(0.0, 100.0, 100.0, 25.0));
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::color::Background;
use crate::config::{GridFit, LayoutConfig, LayoutMode};
use crate::geometry::{self, Rect, Size};

/// An image to place: caller handle plus natural pixel dimensions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageDescriptor<I> {
    pub id: I,
    pub width: f64,
    pub height: f64,
}

impl<I> ImageDescriptor<I> {
    pub fn new(id: I, width: f64, height: f64) -> Self {
        Self { id, width, height }
    }

    /// Descriptor from decoded pixel dimensions.
    pub fn from_pixels(id: I, width: u32, height: u32) -> Self {
        Self::new(id, width as f64, height as f64)
    }

    fn has_valid_dimensions(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Dimensions measured in `unit`s.
    fn dims_in(&self, unit: f64) -> (f64, f64) {
        (self.width / unit, self.height / unit)
    }
}

/// Background paint that precedes an image draw.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fill {
    /// Canvas area to paint.
    pub rect: Rect,
    pub background: Background,
}

/// Where and how one image is drawn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Placement<I> {
    pub image_id: I,
    /// Destination on the canvas.
    pub dest: Rect,
    /// Painted before the image, if any.
    pub fill: Option<Fill>,
    /// Region of the source to draw, in source pixels. `None` = full source.
    pub src_crop: Option<Rect>,
}

/// Output of [`compute_layout`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlacementPlan<I> {
    /// Final canvas dimensions, after the ceiling is applied.
    pub canvas: Size,
    /// One entry per input image, in input order.
    pub placements: Vec<Placement<I>>,
    /// Factor the ceiling scaled the layout by (`1.0` when untouched).
    pub clamp_ratio: f64,
}

impl<I> PlacementPlan<I> {
    /// Integer raster size for a surface realizing this plan.
    pub fn pixel_size(&self) -> (u32, u32) {
        (to_pixels(self.canvas.width), to_pixels(self.canvas.height))
    }

    /// Whether the canvas ceiling rescaled the layout.
    pub fn was_clamped(&self) -> bool {
        self.clamp_ratio != 1.0
    }

    /// Number of background fills the plan paints.
    pub fn fill_count(&self) -> usize {
        self.placements.iter().filter(|p| p.fill.is_some()).count()
    }
}

fn to_pixels(v: f64) -> u32 {
    (v.round() as u32).max(1)
}

/// Layout computation error.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// No images to lay out.
    #[error("no images to lay out")]
    EmptyInput,
    /// An image has a zero, negative, or non-finite dimension.
    #[error("image {index} has invalid dimensions {width}x{height}")]
    InvalidImageDimensions { index: usize, width: f64, height: f64 },
    /// The images' sizes are so far apart that a placement would shrink to
    /// nothing or grow past the floating-point range.
    #[error("image {index} cannot be placed: its extent is out of floating-point range")]
    ExtentOutOfRange { index: usize },
}

/// Compute the placement plan for `images` under `config`.
///
/// Fails with [`LayoutError::EmptyInput`] for an empty slice and with
/// [`LayoutError::InvalidImageDimensions`] for the first image whose width or
/// height is not a positive finite number. Inputs that are individually valid
/// but whose relative sizes cannot be represented (one image scaled by the
/// ratio of two extreme dimensions) fail with
/// [`LayoutError::ExtentOutOfRange`]. No plan is produced on failure.
#[tracing::instrument(level = "debug", skip_all, fields(mode = ?config.mode, images = images.len()))]
pub fn compute_layout<I: Clone>(
    images: &[ImageDescriptor<I>],
    config: &LayoutConfig,
) -> Result<PlacementPlan<I>, LayoutError> {
    validate(images)?;

    // Arrange in power-of-two units near the largest dimension so sums of
    // huge images stay finite. Converting back is exact.
    let largest = images
        .iter()
        .fold(0.0_f64, |acc, img| acc.max(img.width).max(img.height));
    let unit = geometry::power_of_two_floor(largest);

    let (canvas, placements) = match config.mode {
        LayoutMode::Column => stack(images, config, Axis::Vertical, unit),
        LayoutMode::Row => stack(images, config, Axis::Horizontal, unit),
        LayoutMode::Grid => grid(images, config, unit),
    };

    let plan = clamp_canvas(canvas, placements, unit, config.effective_max_canvas_dimension());
    check_extents(&plan)?;

    tracing::debug!(
        canvas_width = plan.canvas.width,
        canvas_height = plan.canvas.height,
        fills = plan.fill_count(),
        "computed collage layout"
    );
    Ok(plan)
}

fn validate<I>(images: &[ImageDescriptor<I>]) -> Result<(), LayoutError> {
    if images.is_empty() {
        return Err(LayoutError::EmptyInput);
    }
    match images.iter().position(|img| !img.has_valid_dimensions()) {
        Some(index) => Err(LayoutError::InvalidImageDimensions {
            index,
            width: images[index].width,
            height: images[index].height,
        }),
        None => Ok(()),
    }
}

/// Every placement must keep a positive, finite size at a finite position.
fn check_extents<I>(plan: &PlacementPlan<I>) -> Result<(), LayoutError> {
    let size_ok = |v: f64| v.is_finite() && v > 0.0;
    let bad = plan.placements.iter().position(|p| {
        !(size_ok(p.dest.width) && size_ok(p.dest.height) && p.dest.x.is_finite() && p.dest.y.is_finite())
    });
    match bad {
        Some(index) => Err(LayoutError::ExtentOutOfRange { index }),
        None if !(size_ok(plan.canvas.width) && size_ok(plan.canvas.height)) => {
            Err(LayoutError::ExtentOutOfRange { index: 0 })
        }
        None => Ok(()),
    }
}

// ============================================================================
// Column / row
// ============================================================================

/// Stacking direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Axis {
    /// Column: shared width, y accumulates.
    Vertical,
    /// Row: shared height, x accumulates.
    Horizontal,
}

fn stack<I: Clone>(
    images: &[ImageDescriptor<I>],
    config: &LayoutConfig,
    axis: Axis,
    unit: f64,
) -> (Size, Vec<Placement<I>>) {
    // The shared axis is the one every image is scaled to match.
    let shared = |img: &ImageDescriptor<I>| {
        let (w, h) = img.dims_in(unit);
        match axis {
            Axis::Vertical => w,
            Axis::Horizontal => h,
        }
    };
    let common = config
        .scale
        .reduce(images.iter().map(shared))
        .unwrap_or_default();

    let mut offset = 0.0;
    let placements = images
        .iter()
        .map(|img| {
            let (w, h) = img.dims_in(unit);
            let dest = match axis {
                Axis::Vertical => Rect::new(0.0, offset, common, h * common / w),
                Axis::Horizontal => Rect::new(offset, 0.0, w * common / h, common),
            };
            offset += match axis {
                Axis::Vertical => dest.height,
                Axis::Horizontal => dest.width,
            };
            Placement {
                image_id: img.id.clone(),
                dest,
                fill: None,
                src_crop: None,
            }
        })
        .collect();

    let canvas = match axis {
        Axis::Vertical => Size::new(common, offset),
        Axis::Horizontal => Size::new(offset, common),
    };
    (canvas, placements)
}

// ============================================================================
// Grid
// ============================================================================

fn grid<I: Clone>(
    images: &[ImageDescriptor<I>],
    config: &LayoutConfig,
    unit: f64,
) -> (Size, Vec<Placement<I>>) {
    let rows = config.grid.rows();
    let cols = config.grid.cols();
    let cell_w = config
        .scale
        .reduce(images.iter().map(|img| img.dims_in(unit).0))
        .unwrap_or_default();
    let cell_h = config
        .scale
        .reduce(images.iter().map(|img| img.dims_in(unit).1))
        .unwrap_or_default();
    let canvas = Size::new(cell_w * cols as f64, cell_h * rows as f64);

    // Images past rows*cols keep following the row-major formula and land
    // below the canvas.
    let placements = images
        .iter()
        .enumerate()
        .map(|(i, img)| {
            let col = (i % cols as usize) as f64;
            let row = (i / cols as usize) as f64;
            let cell = Rect::new(col * cell_w, row * cell_h, cell_w, cell_h);
            match config.grid.fit {
                GridFit::Letterbox => letterbox(img, cell, config.background, unit),
                GridFit::Crop => crop_to_fill(img, cell, unit),
            }
        })
        .collect();

    (canvas, placements)
}

/// Fit inside the cell and centre. A mismatched aspect paints the whole
/// cell first, not just the exposed bars.
fn letterbox<I: Clone>(
    img: &ImageDescriptor<I>,
    cell: Rect,
    background: Background,
    unit: f64,
) -> Placement<I> {
    let (w, h) = img.dims_in(unit);
    let fitted = geometry::fit_inside(w, h, cell.width, cell.height);
    let dest = Rect::new(
        cell.x + geometry::center_offset(cell.width, fitted.width),
        cell.y + geometry::center_offset(cell.height, fitted.height),
        fitted.width,
        fitted.height,
    );
    let exact = geometry::compare_aspect(w, h, cell.width, cell.height)
        == geometry::AspectRelation::Equal;
    Placement {
        image_id: img.id.clone(),
        dest,
        fill: (!exact).then_some(Fill {
            rect: cell,
            background,
        }),
        src_crop: None,
    }
}

/// Crop the source to the cell aspect and cover the cell exactly.
///
/// The crop is computed in layout units and converted back to source
/// pixels.
fn crop_to_fill<I: Clone>(img: &ImageDescriptor<I>, cell: Rect, unit: f64) -> Placement<I> {
    let (w, h) = img.dims_in(unit);
    Placement {
        image_id: img.id.clone(),
        dest: cell,
        fill: None,
        src_crop: geometry::crop_to_aspect(w, h, cell.width, cell.height).map(|c| c.scale(unit)),
    }
}

// ============================================================================
// Canvas ceiling
// ============================================================================

/// Convert a layout computed in `unit`s back to canvas units, uniformly
/// shrinking it so neither canvas side exceeds `max`.
///
/// When clamped, the limiting side is set to exactly `max`. Source crops are
/// in source coordinates and stay untouched.
fn clamp_canvas<I>(
    canvas: Size,
    mut placements: Vec<Placement<I>>,
    unit: f64,
    max: f64,
) -> PlacementPlan<I> {
    let Size { width, height } = canvas;
    // Ceiling in layout units; infinite when `unit` is tiny.
    let limit = max / unit;

    let (ratio, canvas, clamp_ratio) = if width <= limit && height <= limit {
        (unit, canvas.scale(unit), 1.0)
    } else {
        let ratio_w = max / width;
        let ratio_h = max / height;
        let ratio = ratio_w.min(ratio_h);
        let canvas = if ratio_w <= ratio_h {
            Size::new(max, height * ratio)
        } else {
            Size::new(width * ratio, max)
        };
        tracing::debug!(
            raw_width = width * unit,
            raw_height = height * unit,
            ratio = ratio / unit,
            "canvas exceeds ceiling, rescaled"
        );
        (ratio, canvas, ratio / unit)
    };

    for p in &mut placements {
        p.dest = p.dest.scale(ratio);
        if let Some(fill) = &mut p.fill {
            fill.rect = fill.rect.scale(ratio);
        }
    }
    PlacementPlan {
        canvas,
        placements,
        clamp_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::config::ScalePolicy;

    const EPS: f64 = 1e-9;

    fn imgs(dims: &[(f64, f64)]) -> Vec<ImageDescriptor<usize>> {
        dims.iter()
            .enumerate()
            .map(|(i, &(w, h))| ImageDescriptor::new(i, w, h))
            .collect()
    }

    fn dests(plan: &PlacementPlan<usize>) -> Vec<Rect> {
        plan.placements.iter().map(|p| p.dest).collect()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "{a} != {b}");
    }

    // ── Preconditions ───────────────────────────────────────────────────

    #[test]
    fn empty_input_is_rejected() {
        let images: [ImageDescriptor<usize>; 0] = [];
        for config in [
            LayoutConfig::column(),
            LayoutConfig::row(),
            LayoutConfig::grid(2, 2),
        ] {
            assert_eq!(compute_layout(&images, &config), Err(LayoutError::EmptyInput));
        }
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = compute_layout(&imgs(&[(0.0, 10.0)]), &LayoutConfig::default()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidImageDimensions {
                index: 0,
                width: 0.0,
                height: 10.0
            }
        );
    }

    #[test]
    fn reports_first_bad_image() {
        let images = imgs(&[(10.0, 10.0), (10.0, -1.0), (0.0, 0.0)]);
        match compute_layout(&images, &LayoutConfig::grid(2, 2)) {
            Err(LayoutError::InvalidImageDimensions { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nan_dimension_is_rejected() {
        let images = imgs(&[(f64::NAN, 10.0)]);
        assert!(matches!(
            compute_layout(&images, &LayoutConfig::row()),
            Err(LayoutError::InvalidImageDimensions { .. })
        ));
    }

    // ── Column ──────────────────────────────────────────────────────────

    #[test]
    fn column_shrink_to_smallest() {
        let plan = compute_layout(
            &imgs(&[(100.0, 100.0), (200.0, 50.0)]),
            &LayoutConfig::column().scale(ScalePolicy::ShrinkToSmallest),
        )
        .unwrap();
        assert_eq!(plan.canvas, Size::new(100.0, 125.0));
        assert_eq!(
            dests(&plan),
            vec![
                Rect::new(0.0, 0.0, 100.0, 100.0),
                Rect::new(0.0, 100.0, 100.0, 25.0)
            ]
        );
        assert!(plan.placements.iter().all(|p| p.fill.is_none() && p.src_crop.is_none()));
    }

    #[test]
    fn column_grow_to_largest() {
        let plan = compute_layout(
            &imgs(&[(100.0, 100.0), (200.0, 50.0)]),
            &LayoutConfig::column().scale(ScalePolicy::GrowToLargest),
        )
        .unwrap();
        assert_eq!(plan.canvas, Size::new(200.0, 250.0));
        assert_eq!(plan.placements[0].dest, Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(plan.placements[1].dest, Rect::new(0.0, 200.0, 200.0, 50.0));
    }

    // ── Row ─────────────────────────────────────────────────────────────

    #[test]
    fn row_grow_to_largest() {
        let plan = compute_layout(
            &imgs(&[(100.0, 100.0), (200.0, 50.0)]),
            &LayoutConfig::row().scale(ScalePolicy::GrowToLargest),
        )
        .unwrap();
        assert_eq!(plan.canvas, Size::new(300.0, 100.0));
        assert_eq!(
            dests(&plan),
            vec![
                Rect::new(0.0, 0.0, 100.0, 100.0),
                Rect::new(100.0, 0.0, 200.0, 100.0)
            ]
        );
    }

    #[test]
    fn row_shrink_to_smallest() {
        let plan = compute_layout(
            &imgs(&[(100.0, 100.0), (200.0, 50.0)]),
            &LayoutConfig::row(),
        )
        .unwrap();
        assert_eq!(plan.canvas, Size::new(250.0, 50.0));
        assert_eq!(plan.placements[0].dest, Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(plan.placements[1].dest, Rect::new(50.0, 0.0, 200.0, 50.0));
    }

    #[test]
    fn single_image_keeps_its_size() {
        for config in [LayoutConfig::column(), LayoutConfig::row()] {
            let plan = compute_layout(&imgs(&[(640.0, 480.0)]), &config).unwrap();
            assert_eq!(plan.canvas, Size::new(640.0, 480.0));
            assert_eq!(plan.placements[0].dest, Rect::new(0.0, 0.0, 640.0, 480.0));
        }
    }

    // ── Grid ────────────────────────────────────────────────────────────

    #[test]
    fn grid_letterbox_exact_aspect_has_no_fill() {
        let plan = compute_layout(&imgs(&[(100.0, 100.0); 4]), &LayoutConfig::grid(2, 2)).unwrap();
        assert_eq!(plan.canvas, Size::new(200.0, 200.0));
        assert_eq!(
            dests(&plan),
            vec![
                Rect::new(0.0, 0.0, 100.0, 100.0),
                Rect::new(100.0, 0.0, 100.0, 100.0),
                Rect::new(0.0, 100.0, 100.0, 100.0),
                Rect::new(100.0, 100.0, 100.0, 100.0),
            ]
        );
        assert_eq!(plan.fill_count(), 0);
    }

    #[test]
    fn grid_letterbox_fills_whole_cell() {
        let config = LayoutConfig::grid(1, 2)
            .scale(ScalePolicy::GrowToLargest)
            .background(Rgba::black());
        let plan = compute_layout(&imgs(&[(100.0, 50.0), (50.0, 100.0)]), &config).unwrap();
        assert_eq!(plan.canvas, Size::new(200.0, 100.0));

        // Wider than the square cell: full width, centred vertically.
        let p0 = &plan.placements[0];
        assert_eq!(p0.dest, Rect::new(0.0, 25.0, 100.0, 50.0));
        assert_eq!(
            p0.fill,
            Some(Fill {
                rect: Rect::new(0.0, 0.0, 100.0, 100.0),
                background: Background::Opaque(Rgba::black()),
            })
        );

        // Taller: full height, centred horizontally in the second cell.
        let p1 = &plan.placements[1];
        assert_eq!(p1.dest, Rect::new(125.0, 0.0, 50.0, 100.0));
        assert_eq!(p1.fill.unwrap().rect, Rect::new(100.0, 0.0, 100.0, 100.0));
        assert!(plan.placements.iter().all(|p| p.src_crop.is_none()));
    }

    #[test]
    fn grid_letterbox_transparent_fill() {
        let config = LayoutConfig::grid(2, 2).background(Background::Transparent);
        let plan = compute_layout(&imgs(&[(300.0, 100.0), (100.0, 100.0)]), &config).unwrap();
        // Shrink: cell is 100×100; the 3:1 image letterboxes.
        assert_eq!(
            plan.placements[0].fill.unwrap().background,
            Background::Transparent
        );
        assert_eq!(plan.placements[1].fill, None);
    }

    #[test]
    fn grid_crop_fills_cells() {
        let config = LayoutConfig::grid(1, 2)
            .scale(ScalePolicy::GrowToLargest)
            .fit(GridFit::Crop);
        let plan = compute_layout(&imgs(&[(100.0, 50.0), (50.0, 100.0)]), &config).unwrap();
        assert_eq!(plan.canvas, Size::new(200.0, 100.0));

        let p0 = &plan.placements[0];
        assert_eq!(p0.dest, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(p0.src_crop, Some(Rect::new(25.0, 0.0, 50.0, 50.0)));
        assert_eq!(p0.fill, None);

        let p1 = &plan.placements[1];
        assert_eq!(p1.dest, Rect::new(100.0, 0.0, 100.0, 100.0));
        assert_eq!(p1.src_crop, Some(Rect::new(0.0, 25.0, 50.0, 50.0)));
        assert_eq!(p1.fill, None);
    }

    #[test]
    fn grid_crop_matching_aspect_uses_full_source() {
        let config = LayoutConfig::grid(2, 2).fit(GridFit::Crop);
        let plan = compute_layout(&imgs(&[(200.0, 100.0), (400.0, 200.0)]), &config).unwrap();
        assert!(plan.placements.iter().all(|p| p.src_crop.is_none()));
    }

    #[test]
    fn grid_non_square_cells() {
        // Cell is min width × min height = 100×50, independent reductions.
        let config = LayoutConfig::grid(2, 2).fit(GridFit::Crop);
        let plan = compute_layout(&imgs(&[(100.0, 200.0), (300.0, 50.0)]), &config).unwrap();
        assert_eq!(plan.canvas, Size::new(200.0, 100.0));
        let crop = plan.placements[0].src_crop.unwrap();
        assert_close(crop.width / crop.height, 2.0);
        assert!(crop.is_within(100.0, 200.0));
    }

    #[test]
    fn grid_overflow_continues_row_major() {
        let plan = compute_layout(&imgs(&[(10.0, 10.0); 5]), &LayoutConfig::grid(2, 2)).unwrap();
        assert_eq!(plan.canvas, Size::new(20.0, 20.0));
        assert_eq!(plan.placements.len(), 5);
        // Fifth image starts a third row past the canvas bottom.
        assert_eq!(plan.placements[4].dest, Rect::new(0.0, 20.0, 10.0, 10.0));
    }

    #[test]
    fn grid_zero_dimensions_default_to_two() {
        let plan = compute_layout(&imgs(&[(10.0, 10.0)]), &LayoutConfig::grid(0, 0)).unwrap();
        assert_eq!(plan.canvas, Size::new(20.0, 20.0));
    }

    #[test]
    fn placements_follow_input_order() {
        let images: Vec<_> = ["c", "a", "b"]
            .into_iter()
            .map(|id| ImageDescriptor::new(id, 10.0, 20.0))
            .collect();
        for config in [
            LayoutConfig::column(),
            LayoutConfig::row(),
            LayoutConfig::grid(3, 3),
        ] {
            let plan = compute_layout(&images, &config).unwrap();
            let ids: Vec<_> = plan.placements.iter().map(|p| p.image_id).collect();
            assert_eq!(ids, vec!["c", "a", "b"]);
        }
    }

    // ── Ceiling ─────────────────────────────────────────────────────────

    #[test]
    fn column_over_ceiling_is_rescaled() {
        let images = imgs(&[(1000.0, 8000.0), (1000.0, 8000.0)]);
        let plan = compute_layout(&images, &LayoutConfig::column()).unwrap();
        assert_eq!(plan.canvas, Size::new(625.0, 10_000.0));
        assert!(plan.was_clamped());
        assert_close(plan.clamp_ratio, 0.625);
        assert_eq!(plan.placements[1].dest, Rect::new(0.0, 5000.0, 625.0, 5000.0));
    }

    #[test]
    fn ceiling_preserves_ratios() {
        let images = imgs(&[(3000.0, 1000.0), (1000.0, 3000.0), (2000.0, 2000.0)]);
        let config = LayoutConfig::grid(2, 4)
            .scale(ScalePolicy::GrowToLargest)
            .max_canvas_dimension(1000.0);
        let raw = compute_layout(&images, &config.clone().max_canvas_dimension(f64::MAX)).unwrap();
        let plan = compute_layout(&images, &config).unwrap();

        assert_eq!(raw.canvas, Size::new(12_000.0, 6000.0));
        assert_eq!(plan.canvas.width, 1000.0);
        assert_close(plan.canvas.height, 500.0);

        for (a, b) in raw.placements.iter().zip(&plan.placements) {
            assert_close(a.dest.x / raw.canvas.width, b.dest.x / plan.canvas.width);
            assert_close(a.dest.y / raw.canvas.height, b.dest.y / plan.canvas.height);
            assert_close(a.dest.width / a.dest.height, b.dest.width / b.dest.height);
            if let (Some(fa), Some(fb)) = (a.fill, b.fill) {
                assert_close(fa.rect.width * plan.clamp_ratio, fb.rect.width);
            }
            assert_eq!(a.src_crop, b.src_crop);
        }
    }

    #[test]
    fn ceiling_on_height_sets_height_exactly() {
        let images = imgs(&[(10.0, 30_000.0)]);
        let plan = compute_layout(&images, &LayoutConfig::row()).unwrap();
        assert_eq!(plan.canvas.height, 10_000.0);
        assert_close(plan.canvas.width, 10.0 / 3.0);
    }

    #[test]
    fn under_ceiling_is_untouched() {
        let plan = compute_layout(&imgs(&[(10_000.0, 10_000.0)]), &LayoutConfig::column()).unwrap();
        assert!(!plan.was_clamped());
        assert_eq!(plan.canvas, Size::new(10_000.0, 10_000.0));
    }

    // ── Extreme sizes ───────────────────────────────────────────────────

    #[test]
    fn huge_images_stay_representable() {
        // Raw column height is 2e308, past f64::MAX.
        let images = imgs(&[(1.0, 1e308), (1.0, 1e308)]);
        let plan = compute_layout(&images, &LayoutConfig::column()).unwrap();

        assert!(plan.was_clamped());
        assert_eq!(plan.canvas.height, 10_000.0);
        assert!(plan.canvas.width > 0.0);
        for p in &plan.placements {
            assert!(p.dest.width > 0.0 && p.dest.width.is_finite(), "{:?}", p.dest);
            assert!(p.dest.height > 0.0 && p.dest.height.is_finite(), "{:?}", p.dest);
        }
        let y1 = plan.placements[1].dest.y;
        assert!((y1 / 5000.0 - 1.0).abs() < EPS, "{y1}");
    }

    #[test]
    fn huge_grid_keeps_crops_in_source_pixels() {
        let images = imgs(&[(1e308, 5e307), (5e307, 1e308)]);
        let config = LayoutConfig::grid(1, 2)
            .scale(ScalePolicy::GrowToLargest)
            .fit(GridFit::Crop);
        let plan = compute_layout(&images, &config).unwrap();
        assert_eq!(plan.canvas.width, 10_000.0);
        assert_close(plan.canvas.height, 5000.0);
        let crop = plan.placements[0].src_crop.unwrap();
        assert_close(crop.x / 2.5e307, 1.0);
        assert_close(crop.width / 5e307, 1.0);
    }

    #[test]
    fn collapsing_extent_is_rejected() {
        // The first image would be 1e-600 tall at the shared width.
        let images = imgs(&[(1e300, 1e-300), (1.0, 1.0)]);
        assert_eq!(
            compute_layout(&images, &LayoutConfig::column()),
            Err(LayoutError::ExtentOutOfRange { index: 0 })
        );
    }

    #[test]
    fn pixel_size_rounds() {
        let images = imgs(&[(300.0, 100.0), (300.0, 100.0), (300.0, 100.0)]);
        let plan = compute_layout(&images, &LayoutConfig::column().max_canvas_dimension(100.0)).unwrap();
        assert_eq!(plan.pixel_size(), (100, 100));
        let plan = compute_layout(&imgs(&[(3.0, 1.0), (1.0, 1.0)]), &LayoutConfig::row()).unwrap();
        assert_eq!(plan.pixel_size(), (4, 1));
    }
}
