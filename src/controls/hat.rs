use std::f64::consts::FRAC_PI_4;

use tracing::debug;

use super::{require, Control, InputState};
use crate::canvas::input::{ButtonAction, ButtonInput, KeyInput, PressMode};
use crate::canvas::surface::{ControlColors, Surface};
use crate::device::event::{DeviceEvent, EventStamp, HatDirection};
use crate::device::queue::EventQueue;
use crate::geometry::{checks, distance2, inside_circle, Point};

/// Direction per octant, counter-clockwise starting east.
const OCTANT_DIRECTIONS: [HatDirection; 8] = [
    HatDirection::RIGHT,
    HatDirection::RIGHT_UP,
    HatDirection::UP,
    HatDirection::LEFT_UP,
    HatDirection::LEFT,
    HatDirection::LEFT_DOWN,
    HatDirection::DOWN,
    HatDirection::RIGHT_DOWN,
];

pub const DEFAULT_HAT_DEAD_ZONE: f64 = 0.25;

pub fn check_dead_zone(dead_zone: f64) -> Result<(), String> {
    if (0.0..1.0).contains(&dead_zone) {
        Ok(())
    } else {
        Err(format!("dead_zone must be in [0, 1), got {}", dead_zone))
    }
}

/// Eight-way hat on a disk.
///
/// Same button semantics as [`super::Button`]; the value is the direction of
/// the pointer as seen from the center. A momentary press follows the pointer,
/// a toggle keeps the direction picked at the press.
#[derive(Debug)]
pub struct Hat {
    center: Point,
    radius: f64,
    /// Fraction of the radius around the center that reads as centered.
    dead_zone: f64,
    sticky: bool,
    state: InputState,
    /// Direction selected by the current interaction.
    current: HatDirection,
    /// Last value passed on to the queue.
    value: HatDirection,
    stamp: Option<EventStamp>,
}

impl Hat {
    pub fn new(x: f64, y: f64, radius: f64, sticky: bool) -> Self {
        let center = Point::new(x, y);
        require("hat", checks::point("center", center));
        require("hat", checks::radius(radius));
        Self {
            center,
            radius,
            dead_zone: DEFAULT_HAT_DEAD_ZONE,
            sticky,
            state: InputState::NoInput,
            current: HatDirection::CENTERED,
            value: HatDirection::CENTERED,
            stamp: None,
        }
    }

    pub fn with_dead_zone(mut self, dead_zone: f64) -> Self {
        require("hat", check_dead_zone(dead_zone));
        self.dead_zone = dead_zone;
        self
    }

    pub(crate) fn bind(&mut self, stamp: EventStamp) {
        self.stamp = Some(stamp);
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn value(&self) -> HatDirection {
        self.value
    }

    pub fn index(&self) -> Option<u8> {
        self.stamp.map(|s| s.index)
    }

    /// Direction of `p` relative to the center, ignoring the outer radius.
    pub fn direction_at(&self, p: Point) -> HatDirection {
        let dead = self.dead_zone * self.radius;
        if distance2(p, self.center) < dead * dead {
            return HatDirection::CENTERED;
        }
        let d = p - self.center;
        // screen y grows downward; flip it so that "above" is north
        let angle = (-d.y).atan2(d.x);
        let octant = (angle / FRAC_PI_4).round() as i64;
        OCTANT_DIRECTIONS[octant.rem_euclid(8) as usize]
    }

    fn contains(&self, p: Point) -> bool {
        inside_circle(p, self.center, self.radius)
    }

    fn release(&mut self) {
        self.state = InputState::NoInput;
        self.current = HatDirection::CENTERED;
    }

    fn pass_change(&mut self, queue: &EventQueue) -> bool {
        if self.current == self.value {
            return false;
        }
        self.value = self.current;
        match self.stamp {
            Some(stamp) => {
                debug!("Hat {} -> {:#04x}", stamp.index, self.value.0);
                queue.push_event(DeviceEvent::hat(stamp, self.value));
            }
            None => debug!("Unregistered hat changed to {:#04x}", self.value.0),
        }
        true
    }
}

impl Control for Hat {
    fn describe(&self) -> String {
        format!(
            "hat {:?} at ({:.0}, {:.0}) r={:.0}{}",
            self.index(),
            self.center.x,
            self.center.y,
            self.radius,
            if self.sticky { " sticky" } else { "" }
        )
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_circle(self.center, self.radius, ControlColors::IDLE);
        surface.stroke_circle(self.center, self.radius, 1.5, ControlColors::OUTLINE);
        surface.stroke_circle(
            self.center,
            self.dead_zone * self.radius,
            1.0,
            ControlColors::TRACK,
        );
        for k in 0..8 {
            let angle = (k as f64 + 0.5) * FRAC_PI_4;
            let tip = self.center + Point::new(angle.cos(), -angle.sin()) * self.radius;
            let base = self.center
                + Point::new(angle.cos(), -angle.sin()) * (self.dead_zone * self.radius);
            surface.line(base, tip, 1.0, ControlColors::TRACK);
        }
        if !self.value.is_centered() {
            let (dx, dy) = self.value.offset();
            let dir = Point::new(dx, dy) * (1.0 / (dx * dx + dy * dy).sqrt());
            let knob = self.center + dir * (0.65 * self.radius);
            let color = match self.state {
                InputState::ToggleOn => ControlColors::TOGGLED,
                _ => ControlColors::MOMENTARY,
            };
            surface.fill_circle(knob, 0.2 * self.radius, color);
        }
        if let Some(index) = self.index() {
            surface.text(self.center, &format!("H{}", index), ControlColors::LABEL);
        }
    }

    fn on_button(&mut self, input: &ButtonInput, queue: &EventQueue) -> bool {
        let Some(mode) = input.button.press_mode(self.sticky) else {
            return false;
        };
        let previous = self.state;
        match (input.action, mode) {
            (ButtonAction::Press, PressMode::Momentary) => {
                if self.contains(input.at) && self.state == InputState::NoInput {
                    self.state = InputState::Momentary;
                    self.current = self.direction_at(input.at);
                }
            }
            (ButtonAction::Press, PressMode::Toggle) => {
                if self.contains(input.at) {
                    if self.state == InputState::ToggleOn {
                        self.release();
                    } else {
                        self.state = InputState::ToggleOn;
                        self.current = self.direction_at(input.at);
                    }
                }
            }
            (ButtonAction::Release, PressMode::Momentary) => {
                if self.state == InputState::Momentary {
                    self.release();
                }
            }
            (ButtonAction::Release, PressMode::Toggle) => {}
        }
        self.pass_change(queue) || previous != self.state
    }

    fn on_motion(&mut self, at: Point, queue: &EventQueue) -> bool {
        if self.state == InputState::Momentary {
            if self.contains(at) {
                self.current = self.direction_at(at);
            } else {
                self.release();
            }
        }
        self.pass_change(queue)
    }

    fn on_leave(&mut self, queue: &EventQueue) -> bool {
        if self.state == InputState::Momentary {
            self.release();
        }
        self.pass_change(queue)
    }

    fn on_key(&mut self, _key: &KeyInput, queue: &EventQueue) -> bool {
        let previous = self.state;
        if self.state == InputState::ToggleOn {
            self.release();
        }
        self.pass_change(queue) || previous != self.state
    }
}
