// Core value types shared by the canvas, the view and the window.

/// One canvas pixel. Channel order is [r, g, b, a], 8 bits each, straight (not premultiplied) alpha.
pub type Pixel = image::Rgba<u8>;

/// Build a pixel from (a, r, g, b), the order colors are usually spoken about in this crate.
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Pixel {
    image::Rgba([r, g, b, a])
}

/// Fully transparent black; what a fresh canvas is filled with.
pub const TRANSPARENT: Pixel = argb(0, 0, 0, 0);

/// A point in either screen or canvas space (the caller knows which).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point at parametric fraction `f` on the segment self → other.
    #[inline]
    pub fn lerp(&self, other: Point, f: f32) -> Point {
        Point {
            x: f * other.x + (1.0 - f) * self.x,
            y: f * other.y + (1.0 - f) * self.y,
        }
    }

    /// Integer pixel coordinate, truncating toward zero.
    #[inline]
    pub fn truncate(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the window surface is (pixels)
    pub height: usize,     // how tall the window surface is (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Reallocate to a new window size. Contents are garbage until the next render.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0u32; width * height];
    }
}

/// Pack an opaque pixel as 0x00RRGGBB (alpha is dropped).
#[inline]
pub fn pack_rgb(p: Pixel) -> u32 {
    ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32
}

/// Unpack 0x00RRGGBB into an opaque pixel.
#[inline]
pub fn unpack_rgb(c: u32) -> Pixel {
    argb(0xFF, (c >> 16) as u8, (c >> 8) as u8, c as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_both_ends() {
        let a = Point::new(2.0, 4.0);
        let b = Point::new(10.0, -4.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(6.0, 0.0));
    }

    #[test]
    fn truncate_goes_toward_zero() {
        assert_eq!(Point::new(-0.7, 3.9).truncate(), (0, 3));
        assert_eq!(Point::new(-1.2, -2.5).truncate(), (-1, -2));
    }

    #[test]
    fn rgb_packing_matches_minifb_layout() {
        let p = argb(255, 0x12, 0x34, 0x56);
        assert_eq!(pack_rgb(p), 0x0012_3456);
        assert_eq!(unpack_rgb(0x00AB_CDEF), argb(255, 0xAB, 0xCD, 0xEF));
    }

    #[test]
    fn frame_buffer_resize_reallocates() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.resize(5, 2);
        assert_eq!(fb.pixels.len(), 10);
        assert_eq!((fb.width, fb.height), (5, 2));
    }
}
