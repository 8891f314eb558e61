use tracing::debug;

use super::{require, Control};
use crate::canvas::input::{ButtonAction, ButtonInput, PressMode};
use crate::canvas::surface::{ControlColors, Surface};
use crate::device::event::{DeviceEvent, EventStamp};
use crate::device::queue::EventQueue;
use crate::geometry::{checks, point_to_segment, Point};

/// Default fraction of the half-length over which the value sweeps -1..1.
pub const DEFAULT_SLIDER_RATIO: f64 = 0.9;

pub fn check_ratio(ratio: f64) -> Result<(), String> {
    if ratio > 0.0 && ratio <= 1.0 {
        Ok(())
    } else {
        Err(format!("ratio must be in (0, 1], got {}", ratio))
    }
}

/// Single-axis slider along a line segment.
///
/// Left press in the capture region grabs the slider and the value follows
/// the pointer; left release, moving out of the band around the track, or
/// leaving the canvas drops it back to zero. Middle press (or left when
/// sticky) holds the value at the pointer position until the next middle or
/// left press in the region.
///
/// `start` maps to -1, `end` to +1.
#[derive(Debug)]
pub struct Slider {
    start: Point,
    end: Point,
    radius: f64,
    /// Fraction of the half-length used for the full -1..1 range; past it
    /// the value clips.
    ratio: f64,
    sticky: bool,
    grabbed: bool,
    held: bool,
    current: f64,
    /// Last value passed on to the queue.
    value: f64,
    stamp: Option<EventStamp>,
}

impl Slider {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, radius: f64, sticky: bool) -> Self {
        let start = Point::new(x0, y0);
        let end = Point::new(x1, y1);
        require("slider", checks::segment(start, end));
        require("slider", checks::radius(radius));
        Self {
            start,
            end,
            radius,
            ratio: DEFAULT_SLIDER_RATIO,
            sticky,
            grabbed: false,
            held: false,
            current: 0.0,
            value: 0.0,
            stamp: None,
        }
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        require("slider", check_ratio(ratio));
        self.ratio = ratio;
        self
    }

    pub(crate) fn bind(&mut self, stamp: EventStamp) {
        self.stamp = Some(stamp);
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn index(&self) -> Option<u8> {
        self.stamp.map(|s| s.index)
    }

    /// Value the slider takes with the pointer at `p`.
    pub fn value_at(&self, p: Point) -> f64 {
        let along = point_to_segment(p, self.start, self.end).along;
        ((2.0 * along - 1.0) / self.ratio).clamp(-1.0, 1.0)
    }

    fn track_length(&self) -> f64 {
        (self.end - self.start).norm2().sqrt()
    }

    /// Within `radius` of the track, including round-ish end caps.
    fn in_capture(&self, p: Point) -> bool {
        let proj = point_to_segment(p, self.start, self.end);
        let slack = self.radius / self.track_length();
        proj.lateral.abs() <= self.radius && proj.along >= -slack && proj.along <= 1.0 + slack
    }

    fn in_band(&self, p: Point) -> bool {
        point_to_segment(p, self.start, self.end).lateral.abs() <= self.radius
    }

    fn release(&mut self) {
        self.grabbed = false;
        self.held = false;
        self.current = 0.0;
    }

    fn knob(&self) -> Point {
        let along = 0.5 * (self.value * self.ratio + 1.0);
        self.start + (self.end - self.start) * along
    }

    fn pass_change(&mut self, queue: &EventQueue) -> bool {
        if self.current == self.value {
            return false;
        }
        self.value = self.current;
        match self.stamp {
            Some(stamp) => {
                debug!("Axis {} -> {:.3}", stamp.index, self.value);
                queue.push_event(DeviceEvent::axis(stamp, self.value));
            }
            None => debug!("Unregistered slider changed to {:.3}", self.value),
        }
        true
    }
}

impl Control for Slider {
    fn describe(&self) -> String {
        format!(
            "slider {:?} ({:.0}, {:.0})-({:.0}, {:.0}) r={:.0} ratio={:.2}{}",
            self.index(),
            self.start.x,
            self.start.y,
            self.end.x,
            self.end.y,
            self.radius,
            self.ratio,
            if self.sticky { " sticky" } else { "" }
        )
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.line(self.start, self.end, 2.0 * self.radius, ControlColors::IDLE);
        surface.line(self.start, self.end, 2.0, ControlColors::TRACK);
        let mid = (self.start + self.end) * 0.5;
        surface.stroke_circle(mid, 0.3 * self.radius, 1.0, ControlColors::TRACK);
        let color = if self.held {
            ControlColors::TOGGLED
        } else if self.grabbed {
            ControlColors::MOMENTARY
        } else {
            ControlColors::OUTLINE
        };
        surface.fill_circle(self.knob(), 0.8 * self.radius, color);
        if let Some(index) = self.index() {
            surface.text(self.end, &format!("A{}", index), ControlColors::LABEL);
        }
    }

    fn on_button(&mut self, input: &ButtonInput, queue: &EventQueue) -> bool {
        let Some(mode) = input.button.press_mode(self.sticky) else {
            return false;
        };
        let previous = (self.grabbed, self.held);
        match input.action {
            ButtonAction::Press if self.in_capture(input.at) => {
                if self.held {
                    // any press in the region lets go of a held value
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
            if self.in_band(at) {
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
