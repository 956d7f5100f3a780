// Brush engine: stamps one square dab of a fixed diameter into the canvas.
//
// The footprint is the half-open square [cx-r, cx+r) x [cy-r, cy+r) with r = diameter/2.
// Pixels falling off the canvas are skipped one by one, so dabs near an edge are clipped.

use rayon::prelude::*;

use crate::canvas::WriteView;
use crate::compositor::blend_in_place;
use crate::types::Pixel;

/// How a single dab walks its footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DabStrategy {
    /// One thread, column by column.
    Sequential,
    /// Scanlines fanned out over the rayon pool; joined before `dab` returns.
    Parallel,
}

#[derive(Debug, Clone)]
pub struct BrushEngine {
    diameter: u32,
    strategy: DabStrategy,
}

impl BrushEngine {
    pub fn new(diameter: u32, strategy: DabStrategy) -> Self {
        Self { diameter, strategy }
    }

    pub fn diameter(&self) -> u32 {
        self.diameter
    }

    pub fn strategy(&self) -> DabStrategy {
        self.strategy
    }

    fn radius(&self) -> i32 {
        (self.diameter / 2) as i32
    }

    /// Composite `color` over every in-bounds pixel of the footprint centered at (cx, cy).
    /// Returns how many pixels were written.
    pub fn dab(&self, view: &mut WriteView<'_>, cx: i32, cy: i32, color: Pixel) -> usize {
        match self.strategy {
            DabStrategy::Sequential => self.dab_sequential(view, cx, cy, color),
            DabStrategy::Parallel => self.dab_parallel(view, cx, cy, color),
        }
    }

    fn dab_sequential(&self, view: &mut WriteView<'_>, cx: i32, cy: i32, color: Pixel) -> usize {
        let r = self.radius();
        let mut written = 0;
        for dx in -r..r {
            for dy in -r..r {
                if view.blend(cx.saturating_add(dx), cy.saturating_add(dy), color) {
                    written += 1;
                }
            }
        }
        written
    }

    fn dab_parallel(&self, view: &mut WriteView<'_>, cx: i32, cy: i32, color: Pixel) -> usize {
        let r = self.radius();
        let width = view.width() as i64;
        let stride = view.stride();

        // Rows above or below the canvas have no pixels to visit.
        let top = (cy as i64 - r as i64).max(0);
        let bottom = (cy as i64 + r as i64).min(view.height() as i64);
        if top >= bottom || stride == 0 {
            return 0;
        }

        view.rows_mut(top as usize..bottom as usize)
            .par_chunks_mut(stride)
            .map(|row| {
                let mut written = 0usize;
                for dx in -r..r {
                    let x = cx as i64 + dx as i64;
                    if x < 0 || x >= width {
                        continue;
                    }
                    blend_in_place(color, &mut row[x as usize]);
                    written += 1;
                }
                written
            })
            .sum()
    }
}
