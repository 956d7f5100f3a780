// Canvas session: routes pointer events to panning/zooming or painting and owns all state.
//
// The primary button arms a paint gesture, the secondary one a pan gesture. Whichever armed the
// gesture owns it until that same button is released; other presses in between are ignored.
// Each paint event takes the canvas write lock for just its own batch of dabs, so the buffer is
// always unlocked by the time the display asks for it.

use tracing::debug;

use crate::brush::BrushEngine;
use crate::canvas::PixelBuffer;
use crate::error::Error;
use crate::palette::StrokePalette;
use crate::render::{self, RenderColors};
use crate::settings::Settings;
use crate::stroke::StrokeController;
use crate::types::{FrameBuffer, Point};
use crate::view::ViewTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

/// Input as delivered by the host window, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point, button: PointerButton },
    Move { position: Point },
    Up { position: Point, button: PointerButton },
    /// Positive `delta` zooms in, negative zooms out. Magnitude is ignored.
    Scroll { position: Point, delta: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Painting,
    Panning { last: Point },
}

pub struct CanvasSession {
    canvas: PixelBuffer,
    view: ViewTransform,
    stroke: StrokeController,
    palette: StrokePalette,
    zoom_step: f32,
    colors: RenderColors,
    gesture: Gesture,
    repaint: bool,
}

impl CanvasSession {
    pub fn new(
        canvas: PixelBuffer,
        stroke: StrokeController,
        palette: StrokePalette,
        zoom_step: f32,
        colors: RenderColors,
    ) -> Self {
        debug!(
            width = canvas.width(),
            height = canvas.height(),
            diameter = stroke.brush().diameter(),
            strategy = ?stroke.brush().strategy(),
            spacing = stroke.spacing(),
            alpha = palette.alpha(),
            "session ready"
        );
        Self {
            canvas,
            view: ViewTransform::new(),
            stroke,
            palette,
            zoom_step,
            colors,
            gesture: Gesture::Idle,
            repaint: true,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let brush = BrushEngine::new(settings.dab_diameter, settings.dab_strategy());
        Self::new(
            PixelBuffer::new(settings.canvas_width, settings.canvas_height),
            StrokeController::new(brush, settings.dab_spacing),
            StrokePalette::new(settings.stroke_alpha, settings.seed),
            settings.zoom_step,
            RenderColors { paper: settings.paper_color, backdrop: settings.backdrop_color },
        )
    }

    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn stroke(&self) -> &StrokeController {
        &self.stroke
    }

    pub fn palette(&self) -> &StrokePalette {
        &self.palette
    }

    pub fn is_painting(&self) -> bool {
        self.gesture == Gesture::Painting
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    /// Ask for a redraw. Multiple requests before the next `take_repaint` collapse into one.
    pub fn request_repaint(&mut self) {
        self.repaint = true;
    }

    /// True once per batch of repaint requests.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint)
    }

    /// Dispatch one host event to the matching handler.
    pub fn handle(&mut self, event: PointerEvent) -> Result<(), Error> {
        match event {
            PointerEvent::Down { position, button } => self.on_pointer_down(position, button),
            PointerEvent::Move { position } => self.on_pointer_move(position),
            PointerEvent::Up { position, button } => {
                self.on_pointer_up(position, button);
                Ok(())
            }
            PointerEvent::Scroll { position, delta } => {
                self.on_scroll(position, delta);
                Ok(())
            }
        }
    }

    /// Primary arms a stroke with a fresh color and dabs right away if the press is on the
    /// canvas; secondary starts a pan.
    /// Visual: a faint square appears under the cursor, or nothing yet when panning.
    pub fn on_pointer_down(&mut self, position: Point, button: PointerButton) -> Result<(), Error> {
        if self.gesture != Gesture::Idle {
            return Ok(());
        }
        match button {
            PointerButton::Primary => {
                let color = self.palette.next_color();
                self.stroke.begin(color);
                self.gesture = Gesture::Painting;
                self.paint_at(position)
            }
            PointerButton::Secondary => {
                debug!(x = position.x, y = position.y, "pan started");
                self.gesture = Gesture::Panning { last: position };
                Ok(())
            }
            PointerButton::Other => Ok(()),
        }
    }

    /// Visual: while painting, a trail of overlapping dabs follows the cursor; while panning,
    /// the whole canvas slides with it.
    pub fn on_pointer_move(&mut self, position: Point) -> Result<(), Error> {
        match self.gesture {
            Gesture::Idle => Ok(()),
            Gesture::Painting => self.paint_at(position),
            Gesture::Panning { last } => {
                if position.is_finite() {
                    self.view.pan_by(position.x - last.x, position.y - last.y);
                    self.gesture = Gesture::Panning { last: position };
                    self.request_repaint();
                }
                Ok(())
            }
        }
    }

    /// Ends the gesture only if `button` is the one that started it.
    pub fn on_pointer_up(&mut self, _position: Point, button: PointerButton) {
        match (self.gesture, button) {
            (Gesture::Painting, PointerButton::Primary) => {
                self.stroke.end();
                self.gesture = Gesture::Idle;
            }
            (Gesture::Panning { .. }, PointerButton::Secondary) => {
                debug!("pan ended");
                self.gesture = Gesture::Idle;
            }
            _ => {}
        }
    }

    /// One wheel notch per event, anchored at `position`.
    /// Visual: the canvas grows or shrinks around the cursor; the spot under it stays put.
    pub fn on_scroll(&mut self, position: Point, delta: f32) {
        if !position.is_finite() || !delta.is_finite() || delta == 0.0 {
            return;
        }
        let scale = if delta > 0.0 { 1.0 / self.zoom_step } else { self.zoom_step };
        self.view.zoom_at(scale, position);
        debug!(zoom = self.view.zoom(), "zoomed");
        self.request_repaint();
    }

    /// Paint the viewport into `surface`. The canvas is never write-locked between events.
    pub fn render_into(&self, surface: &mut FrameBuffer) -> Result<(), Error> {
        render::render_into(surface, &self.canvas, &self.view, &self.colors)
    }

    fn paint_at(&mut self, screen: Point) -> Result<(), Error> {
        if !screen.is_finite() {
            return Ok(());
        }
        let p = self.view.screen_to_canvas(screen)?;
        let placed = {
            let mut pixels = self.canvas.lock();
            self.stroke.stroke_to(&mut pixels, p)
        };
        if placed > 0 {
            self.request_repaint();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::DabStrategy;
    use crate::types::TRANSPARENT;

    fn session() -> CanvasSession {
        let settings = Settings { canvas_width: 100, canvas_height: 100, seed: Some(1), ..Settings::default() };
        CanvasSession::from_settings(&settings)
    }

    fn painted(s: &CanvasSession) -> usize {
        s.canvas().pixels().iter().filter(|p| **p != TRANSPARENT).count()
    }

    #[test]
    fn settings_reach_brush_stroke_and_palette() {
        let settings = Settings { dab_diameter: 9, parallel_dabs: false, dab_spacing: 2.0, stroke_alpha: 40, ..Settings::default() };
        let s = CanvasSession::from_settings(&settings);
        assert_eq!(s.stroke().brush().diameter(), 9);
        assert_eq!(s.stroke().brush().strategy(), DabStrategy::Sequential);
        assert_eq!(s.stroke().spacing(), 2.0);
        assert_eq!(s.palette().alpha(), 40);
        assert_eq!(session().stroke().brush().strategy(), DabStrategy::Parallel);
    }

    #[test]
    fn primary_drag_paints_and_ends_on_release() {
        let mut s = session();
        s.take_repaint();
        s.on_pointer_down(Point::new(50.0, 50.0), PointerButton::Primary).unwrap();
        assert!(s.is_painting());
        assert!(s.take_repaint());
        s.on_pointer_move(Point::new(60.0, 50.0)).unwrap();
        assert!(s.take_repaint());
        s.on_pointer_up(Point::new(60.0, 50.0), PointerButton::Primary);
        assert!(!s.is_painting());
        assert!(!s.stroke().is_active());

        let before = painted(&s);
        s.on_pointer_move(Point::new(10.0, 10.0)).unwrap();
        assert_eq!(painted(&s), before);
        assert!(!s.canvas().is_locked());
    }

    #[test]
    fn secondary_drag_pans_without_painting() {
        let mut s = session();
        s.on_pointer_down(Point::new(10.0, 10.0), PointerButton::Secondary).unwrap();
        s.on_pointer_move(Point::new(25.0, 5.0)).unwrap();
        s.on_pointer_move(Point::new(30.0, 0.0)).unwrap();
        s.on_pointer_up(Point::new(30.0, 0.0), PointerButton::Secondary);
        assert!(!s.is_panning());
        assert_eq!(painted(&s), 0);
        assert_eq!(s.view().canvas_to_screen(Point::new(0.0, 0.0)), Point::new(20.0, -10.0));
    }

    #[test]
    fn gesture_button_is_fixed_until_its_release() {
        let mut s = session();
        s.on_pointer_down(Point::new(10.0, 10.0), PointerButton::Secondary).unwrap();
        s.on_pointer_down(Point::new(10.0, 10.0), PointerButton::Primary).unwrap();
        assert!(s.is_panning());
        s.on_pointer_up(Point::new(10.0, 10.0), PointerButton::Primary);
        assert!(s.is_panning());
        s.on_pointer_move(Point::new(12.0, 10.0)).unwrap();
        assert_eq!(painted(&s), 0);
    }

    #[test]
    fn painting_follows_the_view_transform() {
        let mut s = session();
        s.on_pointer_down(Point::new(0.0, 0.0), PointerButton::Secondary).unwrap();
        s.on_pointer_move(Point::new(100.0, 100.0)).unwrap();
        s.on_pointer_up(Point::new(100.0, 100.0), PointerButton::Secondary);

        s.on_pointer_down(Point::new(150.0, 140.0), PointerButton::Primary).unwrap();
        s.on_pointer_up(Point::new(150.0, 140.0), PointerButton::Primary);
        assert_ne!(s.canvas().get(50, 40), Some(TRANSPARENT));
        assert_eq!(s.canvas().get(90, 90), Some(TRANSPARENT));
    }

    #[test]
    fn press_outside_the_canvas_then_drag_in_starts_the_stroke_there() {
        let mut s = session();
        s.on_pointer_down(Point::new(-30.0, 50.0), PointerButton::Primary).unwrap();
        assert_eq!(painted(&s), 0);
        assert_eq!(s.stroke().last_dab_position(), None);
        s.on_pointer_move(Point::new(20.0, 50.0)).unwrap();
        assert_eq!(s.stroke().last_dab_position(), Some(Point::new(20.0, 50.0)));
    }

    #[test]
    fn scroll_zooms_about_the_pointer() {
        let mut s = session();
        let anchor = Point::new(40.0, 60.0);
        let before = s.view().screen_to_canvas(anchor).unwrap();
        s.take_repaint();
        s.on_scroll(anchor, 120.0);
        assert!(s.take_repaint());
        assert!((s.view().zoom() - 1.25).abs() < 1e-5);
        s.on_scroll(anchor, -120.0);
        s.on_scroll(anchor, -1.0);
        assert!((s.view().zoom() - 0.8).abs() < 1e-5);
        let after = s.view().screen_to_canvas(anchor).unwrap();
        assert!((before.x - after.x).abs() < 1e-3 && (before.y - after.y).abs() < 1e-3);

        s.take_repaint();
        s.on_scroll(anchor, 0.0);
        assert!(!s.take_repaint());
    }

    #[test]
    fn long_wheel_runs_keep_rendering_and_painting() {
        let mut s = session();
        let anchor = Point::new(50.0, 50.0);
        let mut fb = FrameBuffer::new(16, 16);
        for delta in [1.0, -1.0] {
            for _ in 0..400 {
                s.handle(PointerEvent::Scroll { position: anchor, delta }).unwrap();
                s.render_into(&mut fb).unwrap();
            }
            s.handle(PointerEvent::Down { position: anchor, button: PointerButton::Primary }).unwrap();
            s.handle(PointerEvent::Up { position: anchor, button: PointerButton::Primary }).unwrap();
        }
        assert_ne!(s.canvas().get(50, 50), Some(TRANSPARENT));
    }

    #[test]
    fn non_finite_positions_are_ignored() {
        let mut s = session();
        s.on_pointer_down(Point::new(f32::NAN, 3.0), PointerButton::Primary).unwrap();
        s.on_pointer_move(Point::new(f32::INFINITY, 3.0)).unwrap();
        assert_eq!(painted(&s), 0);
        s.on_scroll(Point::new(f32::NAN, 0.0), 1.0);
        assert_eq!(s.view().zoom(), 1.0);
    }

    #[test]
    fn render_after_painting_sees_an_unlocked_canvas() {
        let mut s = session();
        s.on_pointer_down(Point::new(5.0, 5.0), PointerButton::Primary).unwrap();
        let mut fb = FrameBuffer::new(8, 8);
        s.render_into(&mut fb).unwrap();
        s.on_pointer_move(Point::new(7.0, 5.0)).unwrap();
        s.render_into(&mut fb).unwrap();
    }
}
