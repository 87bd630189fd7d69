use super::{PaintState, Surface};
use egui::{Color32, FontId, Pos2, Rect, Vec2};

/// One drawing call as seen by a [`RecordingSurface`], with the paint state
/// that was in effect when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Color32,
        alpha: f32,
    },
    StrokeRect {
        rect: Rect,
        color: Color32,
        width: f32,
        alpha: f32,
    },
    StrokePath {
        points: Vec<Pos2>,
        color: Color32,
        width: f32,
        alpha: f32,
    },
    FillText {
        text: String,
        pos: Pos2,
        color: Color32,
        font: FontId,
        alpha: f32,
    },
}

impl DrawOp {
    pub fn is_fill(&self) -> bool {
        matches!(self, Self::FillRect { .. })
    }
}

/// In-memory surface for testing: remembers every call instead of painting.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Vec2,
    state: PaintState,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            state: PaintState::default(),
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Rectangles passed to `fill_rect`, in call order.
    pub fn filled_rects(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn fill_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_fill()).count()
    }
}

impl Surface for RecordingSurface {
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
        self.ops.push(DrawOp::FillRect {
            rect,
            color: self.state.fill,
            alpha: self.state.alpha,
        });
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color: self.state.stroke,
            width: self.state.line_width,
            alpha: self.state.alpha,
        });
    }

    fn stroke_path(&mut self, points: &[Pos2]) {
        self.ops.push(DrawOp::StrokePath {
            points: points.to_vec(),
            color: self.state.stroke,
            width: self.state.line_width,
            alpha: self.state.alpha,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Pos2) {
        self.ops.push(DrawOp::FillText {
            text: text.to_owned(),
            pos,
            color: self.state.fill,
            font: self.state.font.clone(),
            alpha: self.state.alpha,
        });
    }
}
