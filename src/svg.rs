//! SVG preview of a placement plan.
//!
//! Draws the canvas outline, every background fill, and each image as a
//! labelled box, scaled to fit a fixed preview panel. Crop placements are
//! annotated with the source region they read.
//!
//! # Example
//!
//! ```
//! use zencollage::{GridFit, ImageDescriptor, LayoutConfig, compute_layout, svg::render_plan_svg};
//!
//! let images = [
//!     ImageDescriptor::new("beach", 4000.0, 3000.0),
//!     ImageDescriptor::new("portrait", 3000.0, 4000.0),
//! ];
//! let plan = compute_layout(&images, &LayoutConfig::grid(1, 2).fit(GridFit::Crop)).unwrap();
//!
//! let svg = render_plan_svg(&plan);
//! assert!(svg.contains("beach"));
//! ```

#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::fmt::Display;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::color::Background;
use crate::composite::{DrawSurface, composite};
use crate::geometry::{Rect, Size};
use crate::layout::PlacementPlan;

/// Maximum pixel width of the preview panel.
const MAX_PANEL_W: f64 = 600.0;
/// Maximum pixel height of the preview panel.
const MAX_PANEL_H: f64 = 400.0;
/// Margin around the panel.
const MARGIN: f64 = 20.0;
/// Height of the caption line above the panel.
const LABEL_H: f64 = 22.0;

/// [`DrawSurface`] that accumulates SVG elements.
pub struct SvgSurface {
    canvas: Size,
    scale: f64,
    body: Vec<String>,
}

impl SvgSurface {
    /// Surface previewing a canvas of `canvas` size.
    pub fn new(canvas: Size) -> Self {
        Self {
            canvas,
            scale: scale_to_fit(canvas),
            body: Vec::new(),
        }
    }

    /// Map a canvas rect into panel coordinates.
    fn panel_rect(&self, r: Rect) -> Rect {
        let s = r.scale(self.scale);
        Rect::new(s.x + MARGIN, s.y + MARGIN + LABEL_H, s.width, s.height)
    }

    /// Close the document.
    pub fn finish(self) -> String {
        let panel = self.canvas.scale(self.scale);
        let total_w = panel.width + 2.0 * MARGIN;
        let total_h = panel.height + 2.0 * MARGIN + LABEL_H;

        let mut svg = String::with_capacity(2048);
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {:.1} {:.1}">"#,
            total_w.ceil() as u32,
            total_h.ceil() as u32,
            total_w,
            total_h
        ));
        svg.push('\n');

        svg.push_str(
            r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 10px; fill: #444; }
  .canvas { fill: none; stroke: #999; stroke-width: 1; }
  .image { fill: #6ba3d6; fill-opacity: 0.85; stroke: #2c6faa; stroke-width: 1; }
  .fill-transparent { fill: none; stroke: #999; stroke-width: 1; stroke-dasharray: 4,2; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #ccc; }
    .canvas { stroke: #555; }
    .image { fill: #3a72a4; stroke: #5a9fd4; }
  }
</style>
"##,
        );

        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="label">Canvas  {}×{}</text>"#,
            MARGIN,
            MARGIN + 14.0,
            fmt_dim(self.canvas.width),
            fmt_dim(self.canvas.height)
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="canvas"/>"#,
            MARGIN,
            MARGIN + LABEL_H,
            panel.width,
            panel.height
        ));
        svg.push('\n');

        for element in &self.body {
            svg.push_str(element);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl<I: Display> DrawSurface<I> for SvgSurface {
    type Error = core::convert::Infallible;

    fn fill_rect(&mut self, rect: Rect, background: Background) -> Result<(), Self::Error> {
        let r = self.panel_rect(rect);
        let element = match background {
            Background::Transparent => format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="fill-transparent"/>"#,
                r.x, r.y, r.width, r.height
            ),
            Background::Opaque(c) => format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" fill-opacity="{:.3}"/>"#,
                r.x,
                r.y,
                r.width,
                r.height,
                c.with_alpha(255),
                c.a as f64 / 255.0
            ),
        };
        self.body.push(element);
        Ok(())
    }

    fn draw_image(&mut self, id: &I, src: Option<Rect>, dest: Rect) -> Result<(), Self::Error> {
        let r = self.panel_rect(dest);
        self.body.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="image"/>"#,
            r.x, r.y, r.width, r.height
        ));
        self.body.push(format!(
            r#"<text x="{:.1}" y="{:.1}" class="annotation" text-anchor="middle">{}  {}×{}</text>"#,
            r.x + r.width / 2.0,
            r.y + r.height / 2.0,
            escape_xml(&format!("{id}")),
            fmt_dim(dest.width),
            fmt_dim(dest.height)
        ));
        if let Some(crop) = src {
            self.body.push(format!(
                r#"<text x="{:.1}" y="{:.1}" class="annotation" text-anchor="middle">crop {}×{} at ({}, {})</text>"#,
                r.x + r.width / 2.0,
                r.y + r.height / 2.0 + 12.0,
                fmt_dim(crop.width),
                fmt_dim(crop.height),
                fmt_dim(crop.x),
                fmt_dim(crop.y)
            ));
        }
        Ok(())
    }
}

/// Render `plan` as a complete SVG document.
pub fn render_plan_svg<I: Display>(plan: &PlacementPlan<I>) -> String {
    let mut surface = SvgSurface::new(plan.canvas);
    match composite(plan, &mut surface) {
        Ok(()) => surface.finish(),
        Err(never) => match never {},
    }
}

/// Uniform scale that fits `size` in the preview panel.
fn scale_to_fit(size: Size) -> f64 {
    if size.width <= 0.0 || size.height <= 0.0 {
        return 1.0;
    }
    (MAX_PANEL_W / size.width).min(MAX_PANEL_H / size.height)
}

/// Whole numbers print without decimals, fractions with one.
fn fmt_dim(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
