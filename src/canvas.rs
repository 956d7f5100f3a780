// The persistent canvas: a fixed-size, row-major buffer of RGBA pixels.
//
// Writes go through a `WriteView`, a scoped lock over the whole buffer. Taking the view flips the
// buffer into `LockedForWrite`; dropping it (on any exit path, including unwinding) flips it back.
// Display reads assert the buffer is `Unlocked`.

use std::ops::Range;

use image::RgbaImage;
use tracing::trace;

use crate::compositor::blend_in_place;
use crate::types::{Pixel, TRANSPARENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockState {
    Unlocked,
    LockedForWrite,
}

pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>, // len = width * height, stride = width
    state: LockState,
}

impl PixelBuffer {
    /// Allocate a fully transparent canvas. Size is fixed for the buffer's lifetime.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; width * height],
            state: LockState::Unlocked,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels per row in the flat buffer.
    pub fn stride(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y).then(|| y as usize * self.stride() + x as usize)
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::LockedForWrite
    }

    fn assert_readable(&self) {
        assert!(
            self.state == LockState::Unlocked,
            "canvas read while a write lock is held"
        );
    }

    /// Bounds-checked read of one pixel.
    pub fn get(&self, x: i32, y: i32) -> Option<Pixel> {
        self.assert_readable();
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// The whole buffer, row-major, for presentation.
    pub fn pixels(&self) -> &[Pixel] {
        self.assert_readable();
        &self.pixels
    }

    /// Copy the canvas into an `image::RgbaImage`.
    pub fn snapshot(&self) -> RgbaImage {
        self.assert_readable();
        let raw: Vec<u8> = self.pixels.iter().flat_map(|p| p.0).collect();
        // Length is width*height*4 by construction.
        RgbaImage::from_raw(self.width as u32, self.height as u32, raw)
            .unwrap_or_else(|| RgbaImage::new(self.width as u32, self.height as u32))
    }

    /// Take the coarse write lock. Panics if it is already held.
    pub fn lock(&mut self) -> WriteView<'_> {
        assert!(
            self.state == LockState::Unlocked,
            "canvas write lock acquired twice"
        );
        self.state = LockState::LockedForWrite;
        trace!("canvas locked for write");
        WriteView { buffer: self }
    }
}

/// Exclusive write access to the whole canvas. Released on drop.
pub struct WriteView<'a> {
    buffer: &'a mut PixelBuffer,
}

impl WriteView<'_> {
    pub fn width(&self) -> usize {
        self.buffer.width
    }

    pub fn height(&self) -> usize {
        self.buffer.height
    }

    pub fn stride(&self) -> usize {
        self.buffer.stride()
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.buffer.contains(x, y)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Pixel> {
        self.buffer.offset(x, y).map(|i| self.buffer.pixels[i])
    }

    /// Overwrite one pixel. Out-of-bounds writes are dropped and reported as `false`.
    pub fn set(&mut self, x: i32, y: i32, p: Pixel) -> bool {
        match self.buffer.offset(x, y) {
            Some(i) => {
                self.buffer.pixels[i] = p;
                true
            }
            None => false,
        }
    }

    /// Composite `src` over the pixel at (x,y). Out-of-bounds is skipped and reported as `false`.
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, src: Pixel) -> bool {
        match self.buffer.offset(x, y) {
            Some(i) => {
                blend_in_place(src, &mut self.buffer.pixels[i]);
                true
            }
            None => false,
        }
    }

    /// The contiguous run of whole rows `rows` (clipped to the canvas), for scanline fan-out.
    /// Split it with `chunks_mut(stride)`; the first chunk is row `rows.start`.
    pub fn rows_mut(&mut self, rows: Range<usize>) -> &mut [Pixel] {
        let end = rows.end.min(self.buffer.height);
        let start = rows.start.min(end);
        let stride = self.buffer.stride();
        &mut self.buffer.pixels[start * stride..end * stride]
    }
}

impl Drop for WriteView<'_> {
    fn drop(&mut self) {
        self.buffer.state = LockState::Unlocked;
        trace!("canvas write lock released");
    }
}
