//! Plan replay onto a drawing surface.
//!
//! The compositor does no geometry. It walks a [`PlacementPlan`] in order and
//! calls the surface: the placement's fill first (if any), then the image.
//! Fills therefore never cover image content drawn for the same or an
//! earlier placement's cell.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::color::Background;
use crate::geometry::Rect;
use crate::layout::PlacementPlan;

/// Drawing capability a backend provides.
pub trait DrawSurface<I> {
    /// Failure reported by the backend (missing image handle, I/O, ...).
    type Error;

    /// Paint `rect` with `background`. `Transparent` clears the area.
    fn fill_rect(&mut self, rect: Rect, background: Background) -> Result<(), Self::Error>;

    /// Draw the `src` region of image `id` (full image when `None`) scaled
    /// into `dest`.
    fn draw_image(&mut self, id: &I, src: Option<Rect>, dest: Rect) -> Result<(), Self::Error>;
}

/// Replay `plan` onto `surface`.
///
/// Stops at the first surface error and returns it; operations already
/// issued stay on the surface.
pub fn composite<I, S>(plan: &PlacementPlan<I>, surface: &mut S) -> Result<(), S::Error>
where
    S: DrawSurface<I> + ?Sized,
{
    for (index, p) in plan.placements.iter().enumerate() {
        if let Some(fill) = &p.fill {
            tracing::trace!(index, rect = ?fill.rect, "fill");
            surface.fill_rect(fill.rect, fill.background)?;
        }
        tracing::trace!(index, dest = ?p.dest, cropped = p.src_crop.is_some(), "draw image");
        surface.draw_image(&p.image_id, p.src_crop, p.dest)?;
    }
    tracing::debug!(placements = plan.placements.len(), "composited plan");
    Ok(())
}

/// A recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp<I> {
    Fill {
        rect: Rect,
        background: Background,
    },
    Image {
        id: I,
        src: Option<Rect>,
        dest: Rect,
    },
}

/// Surface that records calls instead of drawing.
///
/// Useful for driving a canvas API that lives outside Rust, and for tests.
#[derive(Clone, Debug, PartialEq)]
pub struct Recorder<I> {
    pub ops: Vec<DrawOp<I>>,
}

impl<I> Default for Recorder<I> {
    fn default() -> Self {
        Self { ops: Vec::new() }
    }
}

impl<I: Clone> Recorder<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every call a replay of `plan` makes.
    pub fn record(plan: &PlacementPlan<I>) -> Vec<DrawOp<I>> {
        let mut recorder = Self::new();
        match composite(plan, &mut recorder) {
            Ok(()) => recorder.ops,
            Err(never) => match never {},
        }
    }
}

impl<I: Clone> DrawSurface<I> for Recorder<I> {
    type Error = core::convert::Infallible;

    fn fill_rect(&mut self, rect: Rect, background: Background) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Fill { rect, background });
        Ok(())
    }

    fn draw_image(&mut self, id: &I, src: Option<Rect>, dest: Rect) -> Result<(), Self::Error> {
        self.ops.push(DrawOp::Image {
            id: id.clone(),
            src,
            dest,
        });
        Ok(())
    }
}
