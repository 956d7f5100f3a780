//! Dab painting core: a fixed-size RGBA canvas painted with semi-transparent square dabs,
//! viewed through a pannable, zoomable transform.
//!
//! Pointer events go into a [`session::CanvasSession`]; it pans/zooms the
//! [`view::ViewTransform`] or feeds canvas-space samples to the [`stroke::StrokeController`],
//! which spaces dabs evenly and stamps them with the [`brush::BrushEngine`] under the canvas
//! write lock ([`canvas::PixelBuffer::lock`]). [`render::render_into`] then shows the result.

pub mod brush;
pub mod canvas;
pub mod compositor;
pub mod error;
pub mod logging;
pub mod palette;
pub mod render;
pub mod session;
pub mod settings;
pub mod stroke;
pub mod types;
pub mod view;
pub mod window;
