// Window host: shows the rendered viewport and turns minifb's polled mouse state into
// pointer events for the session.
// minifb only exposes "is the button down right now", so presses and releases are found by
// comparing against the previous frame's state.

use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::session::{PointerButton, PointerEvent};
use crate::types::{FrameBuffer, Point};

/// Owns the window and the mouse edge detector.
/// Visual: the only thing on screen; everything the session renders ends up here.
pub struct Drawer {
    window: Window, // the on-screen window you see
    tracker: PointerTracker,
}

impl Drawer {
    /// Create a resizable window. `target_fps` of 0 leaves the update rate unlimited.
    /// Visual: an empty window opens; nothing shows until the first `present`.
    pub fn new(title: &str, width: usize, height: usize, target_fps: usize) -> Result<Self, Error> {
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(target_fps);
        Ok(Self { window, tracker: PointerTracker::default() })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the viewport (backdrop, paper and paint) replaces last frame's image.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Pump window events without drawing; used on frames with nothing new to show.
    /// Visual: screen unchanged, but the window stays responsive to drags and resizes.
    pub fn idle(&mut self) {
        self.window.update();
    }

    /// Returns false when the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Visual: none; main stops the loop and the window closes.
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current client area in pixels. Either side is 0 while minimized.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Pointer events since the previous call, in the order they should be handled.
    /// Visual: none by itself; the session turns these into dabs, pans and zooms.
    pub fn poll_events(&mut self) -> Vec<PointerEvent> {
        let sample = PointerSample {
            position: self.window.get_mouse_pos(MouseMode::Pass).map(|(x, y)| Point::new(x, y)),
            primary: self.window.get_mouse_down(MouseButton::Left),
            secondary: self.window.get_mouse_down(MouseButton::Right),
            scroll: self.window.get_scroll_wheel().map_or(0.0, |(_, dy)| dy),
        };
        self.tracker.update(sample)
    }
}

/// One frame's worth of polled mouse state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    pub position: Option<Point>,
    pub primary: bool,
    pub secondary: bool,
    pub scroll: f32,
}

/// Edge detector turning successive `PointerSample`s into discrete events.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last_position: Option<Point>,
    primary: bool,
    secondary: bool,
}

impl PointerTracker {
    /// Compare `sample` with the previous frame. Moves come first, then releases, then
    /// presses, then the wheel, so a release and re-press within one frame end the old gesture
    /// before starting the new one.
    pub fn update(&mut self, sample: PointerSample) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let Some(position) = sample.position.or(self.last_position) else {
            // Never seen the pointer; nothing can be placed.
            return events;
        };

        let held = self.primary || self.secondary;
        if held && self.last_position != Some(position) {
            events.push(PointerEvent::Move { position });
        }

        if self.primary && !sample.primary {
            events.push(PointerEvent::Up { position, button: PointerButton::Primary });
        }
        if self.secondary && !sample.secondary {
            events.push(PointerEvent::Up { position, button: PointerButton::Secondary });
        }
        if sample.primary && !self.primary {
            events.push(PointerEvent::Down { position, button: PointerButton::Primary });
        }
        if sample.secondary && !self.secondary {
            events.push(PointerEvent::Down { position, button: PointerButton::Secondary });
        }

        if sample.scroll != 0.0 {
            events.push(PointerEvent::Scroll { position, delta: sample.scroll });
        }

        self.last_position = Some(position);
        self.primary = sample.primary;
        self.secondary = sample.secondary;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32, primary: bool, secondary: bool) -> PointerSample {
        PointerSample { position: Some(Point::new(x, y)), primary, secondary, scroll: 0.0 }
    }

    #[test]
    fn press_drag_release_produces_down_moves_up() {
        let mut t = PointerTracker::default();
        assert!(t.update(at(1.0, 1.0, false, false)).is_empty());
        assert_eq!(
            t.update(at(1.0, 1.0, true, false)),
            vec![PointerEvent::Down { position: Point::new(1.0, 1.0), button: PointerButton::Primary }]
        );
        assert_eq!(t.update(at(4.0, 2.0, true, false)), vec![PointerEvent::Move { position: Point::new(4.0, 2.0) }]);
        assert!(t.update(at(4.0, 2.0, true, false)).is_empty());
        assert_eq!(
            t.update(at(6.0, 2.0, false, false)),
            vec![
                PointerEvent::Move { position: Point::new(6.0, 2.0) },
                PointerEvent::Up { position: Point::new(6.0, 2.0), button: PointerButton::Primary },
            ]
        );
    }

    #[test]
    fn hover_without_buttons_is_silent() {
        let mut t = PointerTracker::default();
        t.update(at(0.0, 0.0, false, false));
        assert!(t.update(at(30.0, 40.0, false, false)).is_empty());
    }

    #[test]
    fn secondary_button_is_reported_separately() {
        let mut t = PointerTracker::default();
        let events = t.update(at(3.0, 3.0, false, true));
        assert_eq!(events, vec![PointerEvent::Down { position: Point::new(3.0, 3.0), button: PointerButton::Secondary }]);
        let events = t.update(at(3.0, 3.0, false, false));
        assert_eq!(events, vec![PointerEvent::Up { position: Point::new(3.0, 3.0), button: PointerButton::Secondary }]);
    }

    #[test]
    fn scroll_uses_last_known_position_when_pointer_is_lost() {
        let mut t = PointerTracker::default();
        t.update(at(8.0, 9.0, false, false));
        let events = t.update(PointerSample { position: None, scroll: -1.0, ..PointerSample::default() });
        assert_eq!(events, vec![PointerEvent::Scroll { position: Point::new(8.0, 9.0), delta: -1.0 }]);
    }

    #[test]
    fn nothing_without_any_position() {
        let mut t = PointerTracker::default();
        let events = t.update(PointerSample { position: None, primary: true, ..PointerSample::default() });
        assert!(events.is_empty());
    }
}
