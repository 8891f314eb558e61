//! Drawing capability handed to controls.
//!
//! Controls draw in logical canvas coordinates; the implementation maps them
//! onto whatever is actually rendering (egui in the application, a recorder
//! in tests).

use egui::Color32;

use crate::geometry::Point;

pub trait Surface {
    fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, color: Color32);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color32);

    fn line(&mut self, from: Point, to: Point, width: f64, color: Color32);

    fn text(&mut self, at: Point, text: &str, color: Color32);

    /// Outline of an axis-aligned rectangle, built from lines.
    fn stroke_rect(&mut self, min: Point, max: Point, width: f64, color: Color32) {
        let tr = Point::new(max.x, min.y);
        let bl = Point::new(min.x, max.y);
        self.line(min, tr, width, color);
        self.line(tr, max, width, color);
        self.line(max, bl, width, color);
        self.line(bl, min, width, color);
    }
}

/// Colors used when drawing controls.
pub struct ControlColors;

impl ControlColors {
    pub const OUTLINE: Color32 = Color32::from_rgb(120, 120, 120);
    pub const TRACK: Color32 = Color32::from_rgb(70, 70, 70);
    pub const IDLE: Color32 = Color32::from_rgb(45, 45, 45);
    pub const MOMENTARY: Color32 = Color32::from_rgb(50, 200, 20);
    pub const TOGGLED: Color32 = Color32::from_rgb(230, 160, 20);
    pub const LABEL: Color32 = Color32::from_rgb(200, 200, 200);
}
