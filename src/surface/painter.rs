use super::{PaintState, Surface};
use egui::{Align2, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2};

/// [`Surface`] backed by an `egui` [`Painter`].
///
/// Surface coordinates are relative to the top-left of the painter's clip
/// rect, so `(0, 0)` is the corner of the map area rather than the window.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    origin: Pos2,
    size: Vec2,
    state: PaintState,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter) -> Self {
        let clip = painter.clip_rect();
        Self {
            painter,
            origin: clip.min,
            size: clip.size(),
            state: PaintState::default(),
        }
    }

    /// Convert a screen position (e.g. the pointer) into surface coordinates.
    pub fn to_surface(&self, screen: Pos2) -> Pos2 {
        (screen - self.origin).to_pos2()
    }

    fn to_screen(&self, pos: Pos2) -> Pos2 {
        pos + self.origin.to_vec2()
    }

    fn to_screen_rect(&self, rect: Rect) -> Rect {
        rect.translate(self.origin.to_vec2())
    }

    fn stroke(&self) -> Stroke {
        Stroke::new(self.state.line_width, self.state.stroke_color())
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn paint_state(&self) -> &PaintState {
        &self.state
    }

    fn paint_state_mut(&mut self) -> &mut PaintState {
        &mut self.state
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.painter
            .rect_filled(self.to_screen_rect(rect), 0.0, self.state.fill_color());
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.painter.rect_stroke(
            self.to_screen_rect(rect),
            0.0,
            self.stroke(),
            StrokeKind::Middle,
        );
    }

    fn stroke_path(&mut self, points: &[Pos2]) {
        if points.len() < 2 {
            return;
        }
        let screen: Vec<Pos2> = points.iter().map(|p| self.to_screen(*p)).collect();
        self.painter.add(Shape::line(screen, self.stroke()));
    }

    fn fill_text(&mut self, text: &str, pos: Pos2) {
        self.painter.text(
            self.to_screen(pos),
            Align2::LEFT_BOTTOM,
            text,
            self.state.font.clone(),
            self.state.fill_color(),
        );
    }
}
