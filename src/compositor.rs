// Source-over alpha compositing in 8-bit integer space.
// Every step truncates, so results are bit-exact and reproducible across machines.

use crate::types::Pixel;

/// Layer `src` over `dst` and return the blended pixel.
///
/// aOut = aS + aD*(255-aS)/255
/// cOut = (cS*aS + cD*aD*(255-aS)/255) / aOut, clamped to 255
///
/// When the result would be fully transparent the destination is returned untouched.
#[inline]
pub fn alpha_blend(src: Pixel, dst: Pixel) -> Pixel {
    let [rs, gs, bs, a_s] = src.0.map(u32::from);
    let [rd, gd, bd, ad] = dst.0.map(u32::from);

    let inv = 255 - a_s;
    let a_out = a_s + ad * inv / 255;
    if a_out == 0 {
        return dst;
    }

    let channel = |cs: u32, cd: u32| -> u8 { ((cs * a_s + cd * ad * inv / 255) / a_out).min(255) as u8 };

    image::Rgba([channel(rs, rd), channel(gs, gd), channel(bs, bd), a_out as u8])
}

/// Blend `src` into `dst` in place.
#[inline]
pub fn blend_in_place(src: Pixel, dst: &mut Pixel) {
    *dst = alpha_blend(src, *dst);
}
