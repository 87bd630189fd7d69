//! Drawing surfaces.
//!
//! A [`Surface`] is an immediate-mode 2D canvas with a small piece of mutable
//! paint state (fill colour, stroke colour, line width, font, global alpha).
//! Paint state persists between calls exactly like a browser canvas context,
//! so callers that change it are responsible for putting it back. Alpha is the
//! one property draw routines scope automatically, through [`AlphaScope`].

mod painter;
mod recording;

pub use painter::PainterSurface;
pub use recording::{DrawOp, RecordingSurface};

use egui::{Color32, FontId, Pos2, Rect, Vec2};
use std::ops::{Deref, DerefMut};

/// Mutable paint state shared by every drawing call on a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintState {
    pub fill: Color32,
    pub stroke: Color32,
    pub line_width: f32,
    pub font: FontId,
    /// Global opacity in `0.0..=1.0`, applied on top of fill and stroke.
    pub alpha: f32,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            fill: Color32::BLACK,
            stroke: Color32::BLACK,
            line_width: 1.0,
            font: FontId::proportional(10.0),
            alpha: 1.0,
        }
    }
}

impl PaintState {
    pub fn fill_color(&self) -> Color32 {
        self.fill.gamma_multiply(self.alpha)
    }

    pub fn stroke_color(&self) -> Color32 {
        self.stroke.gamma_multiply(self.alpha)
    }
}

/// Abstraction over a 2D drawing target so that rendering can run against a
/// real `egui` painter or an in-memory recorder in tests.
pub trait Surface {
    /// Size of the drawable area. Coordinates run from `(0, 0)` to `size()`.
    fn size(&self) -> Vec2;

    fn paint_state(&self) -> &PaintState;

    fn paint_state_mut(&mut self) -> &mut PaintState;

    /// Fill `rect` with the current fill colour.
    fn fill_rect(&mut self, rect: Rect);

    /// Outline `rect` with the current stroke colour and line width.
    fn stroke_rect(&mut self, rect: Rect);

    /// Stroke an open polyline through `points`.
    fn stroke_path(&mut self, points: &[Pos2]);

    /// Draw `text` with its baseline-left corner at `pos`, using the fill colour.
    fn fill_text(&mut self, text: &str, pos: Pos2);

    fn set_fill(&mut self, color: Color32) {
        self.paint_state_mut().fill = color;
    }

    fn set_stroke(&mut self, color: Color32) {
        self.paint_state_mut().stroke = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.paint_state_mut().line_width = width;
    }

    fn set_font(&mut self, font: FontId) {
        self.paint_state_mut().font = font;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.paint_state_mut().alpha = alpha.clamp(0.0, 1.0);
    }
}

/// Guard that sets the surface's global alpha and restores the previous value
/// when dropped.
pub struct AlphaScope<'s, S: Surface + ?Sized> {
    surface: &'s mut S,
    previous: f32,
}

impl<'s, S: Surface + ?Sized> AlphaScope<'s, S> {
    pub fn new(surface: &'s mut S, alpha: f32) -> Self {
        let previous = surface.paint_state().alpha;
        surface.set_alpha(alpha);
        Self { surface, previous }
    }
}

impl<S: Surface + ?Sized> Drop for AlphaScope<'_, S> {
    fn drop(&mut self) {
        self.surface.paint_state_mut().alpha = self.previous;
    }
}

impl<S: Surface + ?Sized> Deref for AlphaScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for AlphaScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.surface
    }
}
