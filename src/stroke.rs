// Stroke controller: turns a stream of canvas-space pointer samples into evenly spaced dabs.
//
// Idle until `begin`. The first in-bounds sample of a stroke gets a dab right away; every later
// sample at least `spacing` away from the previous dab gets dabs interpolated along the segment,
// one per `spacing` canvas units. Samples closer than `spacing` are dropped.

use tracing::{debug, trace, warn};

use crate::brush::BrushEngine;
use crate::canvas::WriteView;
use crate::types::{Pixel, Point};

/// Canvas units between consecutive dabs.
pub const DEFAULT_SPACING: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveStroke {
    color: Pixel,
    last_dab: Option<Point>, // None until the first accepted sample
}

impl ActiveStroke {
    /// Emit dab centers for a move to `p` and update `last_dab`. Returns how many were emitted.
    fn advance(&mut self, p: Point, spacing: f32, mut dab: impl FnMut(Point)) -> usize {
        let Some(last) = self.last_dab else {
            dab(p);
            self.last_dab = Some(p);
            return 1;
        };

        let distance = last.distance(p);
        if distance < spacing {
            return 0;
        }

        let step = spacing / distance;
        let mut placed = 0;
        let mut center = last;
        let mut f = step;
        while f <= 1.0 {
            center = last.lerp(p, f);
            dab(center);
            placed += 1;
            f += step;
        }
        self.last_dab = Some(center);
        placed
    }
}

#[derive(Debug, Clone)]
pub struct StrokeController {
    brush: BrushEngine,
    spacing: f32,
    stroke: Option<ActiveStroke>,
}

impl StrokeController {
    pub fn new(brush: BrushEngine, spacing: f32) -> Self {
        let spacing = if spacing.is_finite() && spacing > 0.0 {
            spacing
        } else {
            warn!(spacing, "dab spacing must be positive; using default");
            DEFAULT_SPACING
        };
        Self { brush, spacing, stroke: None }
    }

    pub fn brush(&self) -> &BrushEngine {
        &self.brush
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn is_active(&self) -> bool {
        self.stroke.is_some()
    }

    /// Color of the stroke in progress.
    pub fn color(&self) -> Option<Pixel> {
        self.stroke.map(|s| s.color)
    }

    /// Where the most recent dab of the current stroke landed.
    pub fn last_dab_position(&self) -> Option<Point> {
        self.stroke.and_then(|s| s.last_dab)
    }

    /// Arm a new stroke. No dab is placed until the first accepted sample.
    pub fn begin(&mut self, color: Pixel) {
        debug!(?color, "stroke armed");
        self.stroke = Some(ActiveStroke { color, last_dab: None });
    }

    /// Finish the current stroke; later samples are ignored until the next `begin`.
    pub fn end(&mut self) {
        if self.stroke.take().is_some() {
            debug!("stroke ended");
        }
    }

    /// Feed one canvas-space sample. Samples outside the canvas (or non-finite) are ignored
    /// entirely. Returns the number of dabs placed; non-zero means the canvas needs a repaint.
    pub fn stroke_to(&mut self, view: &mut WriteView<'_>, p: Point) -> usize {
        let Some(stroke) = self.stroke.as_mut() else {
            return 0;
        };
        if !p.is_finite() {
            return 0;
        }
        let (x, y) = p.truncate();
        if !view.contains(x, y) {
            return 0;
        }

        let brush = &self.brush;
        let color = stroke.color;
        let placed = stroke.advance(p, self.spacing, |center| {
            let (cx, cy) = center.truncate();
            brush.dab(&mut *view, cx, cy, color);
        });
        if placed > 0 {
            trace!(placed, x = p.x, y = p.y, "dabs placed");
        }
        placed
    }
}
