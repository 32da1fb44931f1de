//! Software RGBA8 surface and PNG export.
//!
//! [`RasterSurface`] realizes a plan on an [`RgbaImage`] sized to the plan's
//! pixel size. Image draws use nearest-neighbour sampling at pixel centres
//! and composite source-over with straight alpha.
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use zencollage::{ImageDescriptor, LayoutConfig, compute_layout, raster};
//!
//! let sources = vec![
//!     RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])),
//!     RgbaImage::from_pixel(8, 4, Rgba([0, 0, 255, 255])),
//! ];
//! let images: Vec<_> = sources
//!     .iter()
//!     .enumerate()
//!     .map(|(i, img)| ImageDescriptor::from_pixels(i, img.width(), img.height()))
//!     .collect();
//!
//! let plan = compute_layout(&images, &LayoutConfig::column()).unwrap();
//! let png = raster::export_png(&plan, sources.as_slice()).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::color::Background;
use crate::composite::{DrawSurface, composite};
use crate::geometry::{Rect, Size};
use crate::layout::PlacementPlan;

/// Raster backend failure.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The plan references an image the source lookup doesn't have.
    #[error("no source image for {0}")]
    MissingImage(String),
    /// PNG encoding failed.
    #[error(transparent)]
    Encode(#[from] image::ImageError),
}

/// Lookup from plan image ids to decoded pixels.
pub trait ImageSource<I> {
    fn get_image(&self, id: &I) -> Option<&RgbaImage>;
}

impl<I: Eq + Hash, S: std::hash::BuildHasher> ImageSource<I> for HashMap<I, RgbaImage, S> {
    fn get_image(&self, id: &I) -> Option<&RgbaImage> {
        self.get(id)
    }
}

impl<I: Ord> ImageSource<I> for BTreeMap<I, RgbaImage> {
    fn get_image(&self, id: &I) -> Option<&RgbaImage> {
        self.get(id)
    }
}

/// Index-addressed sources: image id `i` is `self[i]`.
impl ImageSource<usize> for [RgbaImage] {
    fn get_image(&self, id: &usize) -> Option<&RgbaImage> {
        self.get(*id)
    }
}

/// Canvas that [`composite`] draws into.
pub struct RasterSurface<'a, S: ?Sized> {
    canvas: RgbaImage,
    sources: &'a S,
}

impl<'a, S: ?Sized> RasterSurface<'a, S> {
    /// Fully transparent `width × height` canvas.
    pub fn new(width: u32, height: u32, sources: &'a S) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            sources,
        }
    }

    /// Canvas sized for `plan`.
    pub fn for_plan<I>(plan: &PlacementPlan<I>, sources: &'a S) -> Self {
        let (w, h) = plan.pixel_size();
        Self::new(w, h, sources)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    /// Pixel bounds of `rect` clipped to the canvas, as `(x0, y0, x1, y1)`
    /// with exclusive upper ends.
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let (x0, y0, x1, y1) = rect.round_out();
        let w = self.canvas.width() as i64;
        let h = self.canvas.height() as i64;
        let (x0, x1) = (x0.clamp(0, w), x1.clamp(0, w));
        let (y0, y1) = (y0.clamp(0, h), y1.clamp(0, h));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

impl<I, S> DrawSurface<I> for RasterSurface<'_, S>
where
    I: Debug,
    S: ImageSource<I> + ?Sized,
{
    type Error = RasterError;

    fn fill_rect(&mut self, rect: Rect, background: Background) -> Result<(), Self::Error> {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return Ok(());
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let px = self.canvas.get_pixel_mut(x, y);
                *px = match background.color() {
                    None => Rgba([0, 0, 0, 0]),
                    Some(c) => Rgba(over(px.0, c.to_array())),
                };
            }
        }
        Ok(())
    }

    fn draw_image(&mut self, id: &I, src: Option<Rect>, dest: Rect) -> Result<(), Self::Error> {
        let source = self
            .sources
            .get_image(id)
            .ok_or_else(|| RasterError::MissingImage(format!("{id:?}")))?;
        let (sw, sh) = source.dimensions();
        if sw == 0 || sh == 0 {
            return Ok(());
        }
        let src = src.unwrap_or(Rect::from_size(Size::new(sw as f64, sh as f64)));
        let Some((x0, y0, x1, y1)) = self.clip(dest) else {
            return Ok(());
        };

        for y in y0..y1 {
            let sy = sample_index(y, dest.y, dest.height, src.y, src.height, sh);
            for x in x0..x1 {
                let sx = sample_index(x, dest.x, dest.width, src.x, src.width, sw);
                let s = source.get_pixel(sx, sy).0;
                let px = self.canvas.get_pixel_mut(x, y);
                px.0 = over(px.0, s);
            }
        }
        Ok(())
    }
}

/// Source pixel index for the centre of destination pixel `d`.
fn sample_index(d: u32, dest_start: f64, dest_len: f64, src_start: f64, src_len: f64, limit: u32) -> u32 {
    let t = (d as f64 + 0.5 - dest_start) / dest_len;
    let s = (src_start + t * src_len).floor();
    (s.max(0.0) as u32).min(limit - 1)
}

/// Straight-alpha source-over.
fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }
    let sa = u32::from(src[3]);
    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    // Output alpha, scaled by 255.
    let out_a = sa * 255 + da * inv;
    if out_a == 0 {
        return [0; 4];
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv;
        out[i] = ((num + out_a / 2) / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    out
}

/// Replay `plan` onto a fresh canvas.
pub fn render<I, S>(plan: &PlacementPlan<I>, sources: &S) -> Result<RgbaImage, RasterError>
where
    I: Debug,
    S: ImageSource<I> + ?Sized,
{
    let mut surface = RasterSurface::for_plan(plan, sources);
    composite(plan, &mut surface)?;
    Ok(surface.into_image())
}

/// Encode a canvas as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RasterError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        bytes = buf.len(),
        "encoded collage png"
    );
    Ok(buf)
}

/// Render `plan` and encode the result as PNG.
pub fn export_png<I, S>(plan: &PlacementPlan<I>, sources: &S) -> Result<Vec<u8>, RasterError>
where
    I: Debug,
    S: ImageSource<I> + ?Sized,
{
    encode_png(&render(plan, sources)?)
}
