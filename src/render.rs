// Presents the canvas through the view transform into the window's 0x00RRGGBB surface.
// Sampling is nearest-neighbor: each screen pixel shows exactly one canvas pixel, no smoothing.

use rayon::prelude::*;

use crate::canvas::PixelBuffer;
use crate::compositor::alpha_blend;
use crate::error::Error;
use crate::types::{pack_rgb, unpack_rgb, FrameBuffer, Point};
use crate::view::ViewTransform;

/// Colors used around and beneath the canvas, as 0x00RRGGBB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderColors {
    /// Shown through transparent canvas pixels.
    pub paper: u32,
    /// Shown where the viewport extends past the canvas.
    pub backdrop: u32,
}

/// Fill `surface` with the backdrop, then the canvas (over its paper) where the view puts it.
/// Visual: a grey frame around a white sheet; paint shows as translucent color on the sheet,
/// with hard pixel edges once zoomed in.
pub fn render_into(
    surface: &mut FrameBuffer,
    canvas: &PixelBuffer,
    view: &ViewTransform,
    colors: &RenderColors,
) -> Result<(), Error> {
    let to_canvas = view.matrix().inverse().ok_or(Error::SingularTransform)?;
    let pixels = canvas.pixels();
    let (cw, ch) = (canvas.width(), canvas.height());
    let paper = unpack_rgb(colors.paper);
    let backdrop = colors.backdrop & 0x00FF_FFFF;

    if surface.width == 0 || surface.height == 0 {
        return Ok(());
    }

    surface
        .pixels
        .par_chunks_mut(surface.width)
        .enumerate()
        .for_each(|(sy, row)| {
            for (sx, out) in row.iter_mut().enumerate() {
                // Sample at the pixel center.
                let c = to_canvas.apply(Point::new(sx as f32 + 0.5, sy as f32 + 0.5));
                let (x, y) = (c.x.floor(), c.y.floor());
                *out = if x >= 0.0 && y >= 0.0 && x < cw as f32 && y < ch as f32 {
                    let src = pixels[y as usize * cw + x as usize];
                    pack_rgb(alpha_blend(src, paper))
                } else {
                    backdrop
                };
            }
        });
    Ok(())
}
