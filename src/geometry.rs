//! Rectangles and sizes in canvas or source coordinates.
//!
//! All values are `f64`: column and row layouts produce fractional heights
//! and widths (a 200×50 image scaled to width 100 is 25 tall, a 300×100 one
//! is 33.33…), and the canvas ceiling rescales everything by an arbitrary
//! ratio. Rounding to whole pixels is the surface's job.

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Width × height.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Scale both axes by `ratio`.
    pub fn scale(self, ratio: f64) -> Self {
        Self {
            width: self.width * ratio,
            height: self.height * ratio,
        }
    }
}

/// Axis-aligned rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect at the origin covering `size`.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Scale position and extent by `ratio` (about the origin).
    pub fn scale(self, ratio: f64) -> Self {
        Self {
            x: self.x * ratio,
            y: self.y * ratio,
            width: self.width * ratio,
            height: self.height * ratio,
        }
    }

    /// Whether this rect lies inside `(0, 0, max_w, max_h)`.
    pub fn is_within(&self, max_w: f64, max_h: f64) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= max_w && self.bottom() <= max_h
    }

    /// Clamp this rect to fit within `(0, 0, max_w, max_h)`.
    pub fn clamp_to(self, max_w: f64, max_h: f64) -> Self {
        let x = self.x.clamp(0.0, max_w);
        let y = self.y.clamp(0.0, max_h);
        Self {
            x,
            y,
            width: self.width.min(max_w - x),
            height: self.height.min(max_h - y),
        }
    }

    /// Whether this rect covers the full source (no actual crop).
    pub fn is_full(&self, source_w: f64, source_h: f64) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.width == source_w && self.height == source_h
    }

    /// Snap to whole pixels: edges rounded independently, so adjacent rects
    /// that share an edge still share it after rounding.
    pub fn round_out(&self) -> (i64, i64, i64, i64) {
        let x0 = self.x.round() as i64;
        let y0 = self.y.round() as i64;
        let x1 = self.right().round() as i64;
        let y1 = self.bottom().round() as i64;
        (x0, y0, x1, y1)
    }
}

// ============================================================================
// Aspect geometry
// ============================================================================

/// How an image's aspect ratio relates to a cell's.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum AspectRelation {
    /// Image is relatively wider than the cell.
    Wider,
    /// Image is relatively taller than the cell.
    Taller,
    /// Same aspect ratio.
    Equal,
}

/// Compare `iw/ih` against `cw/ch` by cross-multiplication, so equal
/// integer-valued ratios compare equal without dividing.
pub(crate) fn compare_aspect(iw: f64, ih: f64, cw: f64, ch: f64) -> AspectRelation {
    let cross_i = iw * ch;
    let cross_c = ih * cw;
    if cross_i > cross_c {
        AspectRelation::Wider
    } else if cross_i < cross_c {
        AspectRelation::Taller
    } else {
        AspectRelation::Equal
    }
}

/// Largest size with the aspect of `iw×ih` that fits inside `cw×ch`.
/// One axis matches the cell; the other is ≤ the cell.
pub(crate) fn fit_inside(iw: f64, ih: f64, cw: f64, ch: f64) -> Size {
    match compare_aspect(iw, ih, cw, ch) {
        // Width constrains, letterbox top and bottom.
        AspectRelation::Wider => Size::new(cw, cw * ih / iw),
        // Height constrains, pillarbox left and right.
        AspectRelation::Taller => Size::new(ch * iw / ih, ch),
        AspectRelation::Equal => Size::new(cw, ch),
    }
}

/// Centred region of an `iw×ih` source with the aspect of `cw×ch`.
///
/// Returns `None` when the aspects already match (the full source is used).
pub(crate) fn crop_to_aspect(iw: f64, ih: f64, cw: f64, ch: f64) -> Option<Rect> {
    let crop = match compare_aspect(iw, ih, cw, ch) {
        AspectRelation::Equal => return None,
        AspectRelation::Wider => {
            // Keep full height, narrow the width to cw/ch * ih.
            let new_w = (ih * cw / ch).min(iw);
            Rect::new((iw - new_w) / 2.0, 0.0, new_w, ih)
        }
        AspectRelation::Taller => {
            // Keep full width, shorten the height to iw * ch/cw.
            let new_h = (iw * ch / cw).min(ih);
            Rect::new(0.0, (ih - new_h) / 2.0, iw, new_h)
        }
    };
    let crop = crop.clamp_to(iw, ih);
    if crop.is_full(iw, ih) { None } else { Some(crop) }
}

/// Largest power of two at or below `v` (positive, finite).
///
/// Dividing or multiplying by it is exact, so layouts can be computed in
/// these units and scaled back without changing any result.
pub(crate) fn power_of_two_floor(v: f64) -> f64 {
    let exponent = (v.to_bits() >> 52) & 0x7ff;
    // Subnormals use the smallest normal power.
    f64::from_bits(exponent.max(1) << 52)
}

/// Offset that centres `inner` inside `outer` on one axis.
pub(crate) fn center_offset(outer: f64, inner: f64) -> f64 {
    (outer - inner) / 2.0
}
