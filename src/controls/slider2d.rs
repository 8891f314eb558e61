use tracing::debug;

use super::{require, Control};
use crate::canvas::input::{ButtonAction, ButtonInput, PressMode};
use crate::canvas::surface::{ControlColors, Surface};
use crate::device::event::{DeviceEvent, EventStamp};
use crate::device::queue::EventQueue;
use crate::geometry::{checks, Point};

/// Two-axis slider over a rectangle, the on-screen version of a stick.
///
/// Interaction is that of [`super::Slider`] on both channels at once. The
/// corner `start` reads (-1, -1), the corner `end` reads (+1, +1); each
/// channel is sent as its own axis event.
#[derive(Debug)]
pub struct Slider2D {
    start: Point,
    end: Point,
    /// Knob size, and the margin around the rectangle a drag may stray into.
    radius: f64,
    sticky: bool,
    grabbed: bool,
    held: bool,
    current: (f64, f64),
    /// Last values passed on to the queue.
    value: (f64, f64),
    stamps: Option<(EventStamp, EventStamp)>,
}

impl Slider2D {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, radius: f64, sticky: bool) -> Self {
        let start = Point::new(x0, y0);
        let end = Point::new(x1, y1);
        require("2D slider", checks::rect(start, end));
        require("2D slider", checks::radius(radius));
        Self {
            start,
            end,
            radius,
            sticky,
            grabbed: false,
            held: false,
            current: (0.0, 0.0),
            value: (0.0, 0.0),
            stamps: None,
        }
    }

    pub(crate) fn bind(&mut self, x: EventStamp, y: EventStamp) {
        self.stamps = Some((x, y));
    }

    pub fn value(&self) -> (f64, f64) {
        self.value
    }

    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn indices(&self) -> Option<(u8, u8)> {
        self.stamps.map(|(x, y)| (x.index, y.index))
    }

    pub fn value_at(&self, p: Point) -> (f64, f64) {
        let span = self.end - self.start;
        let rel = p - self.start;
        (
            (2.0 * rel.x / span.x - 1.0).clamp(-1.0, 1.0),
            (2.0 * rel.y / span.y - 1.0).clamp(-1.0, 1.0),
        )
    }

    fn bounds(&self) -> (Point, Point) {
        (
            Point::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y)),
            Point::new(self.start.x.max(self.end.x), self.start.y.max(self.end.y)),
        )
    }

    fn inside(&self, p: Point, margin: f64) -> bool {
        let (min, max) = self.bounds();
        p.x >= min.x - margin
            && p.x <= max.x + margin
            && p.y >= min.y - margin
            && p.y <= max.y + margin
    }

    fn release(&mut self) {
        self.grabbed = false;
        self.held = false;
        self.current = (0.0, 0.0);
    }

    fn pass_change(&mut self, queue: &EventQueue) -> bool {
        let (cx, cy) = self.current;
        let (vx, vy) = self.value;
        let changed = (cx != vx, cy != vy);
        self.value = self.current;
        match self.stamps {
            Some((sx, sy)) => {
                if changed.0 {
                    debug!("Axis {} -> {:.3}", sx.index, cx);
                    queue.push_event(DeviceEvent::axis(sx, cx));
                }
                if changed.1 {
                    debug!("Axis {} -> {:.3}", sy.index, cy);
                    queue.push_event(DeviceEvent::axis(sy, cy));
                }
            }
            None if changed.0 || changed.1 => {
                debug!("Unregistered 2D slider changed to ({:.3}, {:.3})", cx, cy)
            }
            None => {}
        }
        changed.0 || changed.1
    }
}

impl Control for Slider2D {
    fn describe(&self) -> String {
        format!(
            "2d slider {:?} ({:.0}, {:.0})-({:.0}, {:.0}) r={:.0}{}",
            self.indices(),
            self.start.x,
            self.start.y,
            self.end.x,
            self.end.y,
            self.radius,
            if self.sticky { " sticky" } else { "" }
        )
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let (min, max) = self.bounds();
        surface.stroke_rect(min, max, 1.5, ControlColors::OUTLINE);
        let mid = (self.start + self.end) * 0.5;
        surface.line(
            Point::new(min.x, mid.y),
            Point::new(max.x, mid.y),
            1.0,
            ControlColors::TRACK,
        );
        surface.line(
            Point::new(mid.x, min.y),
            Point::new(mid.x, max.y),
            1.0,
            ControlColors::TRACK,
        );
        let (vx, vy) = self.value;
        let span = self.end - self.start;
        let knob = self.start + Point::new(span.x * 0.5 * (vx + 1.0), span.y * 0.5 * (vy + 1.0));
        let color = if self.held {
            ControlColors::TOGGLED
        } else if self.grabbed {
            ControlColors::MOMENTARY
        } else {
            ControlColors::OUTLINE
        };
        surface.fill_circle(knob, self.radius, color);
        if let Some((ix, iy)) = self.indices() {
            surface.text(
                Point::new(max.x, min.y),
                &format!("A{}/A{}", ix, iy),
                ControlColors::LABEL,
            );
        }
    }

    fn on_button(&mut self, input: &ButtonInput, queue: &EventQueue) -> bool {
        let Some(mode) = input.button.press_mode(self.sticky) else {
            return false;
        };
        let previous = (self.grabbed, self.held);
        match input.action {
            ButtonAction::Press if self.inside(input.at, 0.0) => {
                if self.held {
                    self.release();
                } else if mode == PressMode::Toggle {
                    self.grabbed = false;
                    self.held = true;
                    self.current = self.value_at(input.at);
                } else {
                    self.grabbed = true;
                    self.current = self.value_at(input.at);
                }
            }
            ButtonAction::Press => {}
            ButtonAction::Release => {
                if mode == PressMode::Momentary && self.grabbed && !self.held {
                    self.release();
                }
            }
        }
        self.pass_change(queue) || previous != (self.grabbed, self.held)
    }

    fn on_motion(&mut self, at: Point, queue: &EventQueue) -> bool {
        if self.grabbed && !self.held {
            if self.inside(at, self.radius) {
                self.current = self.value_at(at);
            } else {
                self.release();
            }
        }
        self.pass_change(queue)
    }

    fn on_leave(&mut self, queue: &EventQueue) -> bool {
        if self.grabbed && !self.held {
            self.release();
        }
        self.pass_change(queue)
    }
}
