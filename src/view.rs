// Pan/zoom view transform between screen space (window pixels) and canvas space.
//
// Convention: points are row vectors, so `a.then(b)` maps p to b(a(p)). Every gesture is
// appended after the accumulated transform, which keeps pan and zoom predictable no matter
// what came before.

use tracing::{debug, warn};

use crate::error::Error;
use crate::types::Point;

/// 2x3 affine matrix:
///   x' = m11*x + m21*y + dx
///   y' = m12*x + m22*y + dy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine { m11: 1.0, m12: 0.0, m21: 0.0, m22: 1.0, dx: 0.0, dy: 0.0 };

    pub const fn translation(dx: f32, dy: f32) -> Affine {
        Affine { dx, dy, ..Affine::IDENTITY }
    }

    /// Uniform scale by `s` that leaves `center` where it is.
    pub fn scale_about(s: f32, center: Point) -> Affine {
        Affine {
            m11: s,
            m12: 0.0,
            m21: 0.0,
            m22: s,
            dx: center.x - s * center.x,
            dy: center.y - s * center.y,
        }
    }

    /// `self` first, then `next`.
    pub fn then(&self, next: &Affine) -> Affine {
        Affine {
            m11: self.m11 * next.m11 + self.m12 * next.m21,
            m12: self.m11 * next.m12 + self.m12 * next.m22,
            m21: self.m21 * next.m11 + self.m22 * next.m21,
            m22: self.m21 * next.m12 + self.m22 * next.m22,
            dx: self.dx * next.m11 + self.dy * next.m21 + next.dx,
            dy: self.dx * next.m12 + self.dy * next.m22 + next.dy,
        }
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.m11 * p.x + self.m21 * p.y + self.dx,
            y: self.m12 * p.x + self.m22 * p.y + self.dy,
        }
    }

    pub fn determinant(&self) -> f32 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    pub fn inverse(&self) -> Option<Affine> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = Affine {
            m11: self.m22 / det,
            m12: -self.m12 / det,
            m21: -self.m21 / det,
            m22: self.m11 / det,
            dx: (self.m21 * self.dy - self.m22 * self.dx) / det,
            dy: (self.m12 * self.dx - self.m11 * self.dy) / det,
        };
        let finite = [inv.m11, inv.m12, inv.m21, inv.m22, inv.dx, inv.dy].iter().all(|v| v.is_finite());
        finite.then_some(inv)
    }
}

impl Default for Affine {
    fn default() -> Self {
        Affine::IDENTITY
    }
}

/// Zoom factors the view may reach. Wheel notches past either end are dropped, so the
/// matrix stays well inside `f32` range and always invertible.
pub const MIN_ZOOM: f32 = 1.0 / 1024.0;
pub const MAX_ZOOM: f32 = 1024.0;

/// The accumulated canvas → screen transform.
#[derive(Debug, Clone, Default)]
pub struct ViewTransform {
    matrix: Affine,
}

impl ViewTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matrix(&self) -> &Affine {
        &self.matrix
    }

    /// Current zoom factor (screen pixels per canvas pixel).
    pub fn zoom(&self) -> f32 {
        self.matrix.determinant().abs().sqrt()
    }

    /// Shift the view by (dx, dy) screen pixels.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        if !(dx.is_finite() && dy.is_finite()) {
            warn!(dx, dy, "ignoring non-finite pan");
            return;
        }
        self.commit(self.matrix.then(&Affine::translation(dx, dy)), "pan");
    }

    /// Scale the view by `scale`, keeping whatever is under `screen_point` in place.
    pub fn zoom_at(&mut self, scale: f32, screen_point: Point) {
        if !(scale.is_finite() && scale > 0.0) || !screen_point.is_finite() {
            warn!(scale, x = screen_point.x, y = screen_point.y, "ignoring invalid zoom");
            return;
        }
        let candidate = self.matrix.then(&Affine::scale_about(scale, screen_point));
        let zoom = candidate.determinant().abs().sqrt();
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            debug!(zoom, "zoom limit reached; notch dropped");
            return;
        }
        self.commit(candidate, "zoom");
    }

    /// Adopt `candidate` only if it is finite and invertible; otherwise keep the current view.
    fn commit(&mut self, candidate: Affine, gesture: &str) {
        let det = candidate.determinant();
        if det.is_finite() && candidate.inverse().is_some() {
            self.matrix = candidate;
        } else {
            warn!(gesture, det, "dropping gesture that would make the view singular");
        }
    }

    pub fn canvas_to_screen(&self, p: Point) -> Point {
        self.matrix.apply(p)
    }

    /// Map a screen point back into canvas space.
    pub fn screen_to_canvas(&self, p: Point) -> Result<Point, Error> {
        self.matrix.inverse().map(|inv| inv.apply(p)).ok_or(Error::SingularTransform)
    }
}
