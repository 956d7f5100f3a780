// What you SEE:
// • A white canvas in a window.
// • Hold Left Mouse and drag: soft random-colored strokes build up where you paint.
// • Hold Right Mouse and drag: the canvas pans.
// • Mouse wheel: zoom in/out around the pointer. ESC quits.

use std::time::{Duration, Instant};

use dab_canvas::error::Error;
use dab_canvas::logging;
use dab_canvas::session::CanvasSession;
use dab_canvas::settings::Settings;
use dab_canvas::types::FrameBuffer;
use dab_canvas::window::Drawer;
use tracing::{debug, info};

fn main() -> Result<(), Error> {
    let settings = Settings::load_default()?;
    logging::init(settings.debug);
    info!(
        canvas = %format!("{}x{}", settings.canvas_width, settings.canvas_height),
        dab = settings.dab_diameter,
        parallel = settings.parallel_dabs,
        "starting"
    );

    let mut session = CanvasSession::from_settings(&settings);
    let mut drawer = Drawer::new(
        "Dab Canvas",
        settings.window_width,
        settings.window_height,
        settings.target_fps,
    )?;

    let (w, h) = drawer.size();
    let mut screen = FrameBuffer::new(w, h);

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    while drawer.is_open() && !drawer.esc_pressed() {
        // 1) Input: every event is handled (and its write lock released) before drawing.
        for event in drawer.poll_events() {
            session.handle(event)?;
        }

        // 2) Follow window resizes.
        let (w, h) = drawer.size();
        if (w, h) != (screen.width, screen.height) {
            screen.resize(w, h);
            session.request_repaint();
        }

        // 3) Redraw only when something changed.
        // (A minimized window reports 0x0; keep the request pending until it comes back.)
        if screen.width == 0 || screen.height == 0 {
            drawer.idle();
        } else if session.take_repaint() {
            session.render_into(&mut screen)?;
            drawer.present(&screen)?;
            frames_this_second += 1;
        } else {
            drawer.idle();
        }

        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            debug!(fps = frames_this_second as f32 / secs, zoom = session.view().zoom(), "redraw rate");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("window closed");
    Ok(())
}
