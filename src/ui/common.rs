use eframe::egui::{self, Color32, FontId, Frame, Painter, Pos2, Stroke, Vec2};

use crate::canvas::surface::Surface;
use crate::geometry::Point;

pub fn create_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(4)
        .outer_margin(2)
}

pub struct UiColors;

impl UiColors {
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);

    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    pub const HARDWARE: Color32 = Color32::from_rgb(20, 140, 220);
}

/// [`Surface`] over an egui painter; logical coordinates are offset by the
/// top-left corner of the painter's rect.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    origin: Vec2,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, origin: Pos2) -> Self {
        Self {
            painter,
            origin: origin.to_vec2(),
        }
    }

    fn pos(&self, p: Point) -> Pos2 {
        Pos2::new(p.x as f32, p.y as f32) + self.origin
    }
}

impl Surface for PainterSurface<'_> {
    fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, color: Color32) {
        self.painter.circle_stroke(
            self.pos(center),
            radius as f32,
            Stroke::new(width as f32, color),
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color32) {
        self.painter.circle_filled(self.pos(center), radius as f32, color);
    }

    fn line(&mut self, from: Point, to: Point, width: f64, color: Color32) {
        self.painter.line_segment(
            [self.pos(from), self.pos(to)],
            Stroke::new(width as f32, color),
        );
    }

    fn text(&mut self, at: Point, text: &str, color: Color32) {
        self.painter.text(
            self.pos(at),
            egui::Align2::LEFT_TOP,
            text,
            FontId::proportional(12.0),
            color,
        );
    }
}
