use tracing::debug;

use super::{require, Control, InputState};
use crate::canvas::input::{ButtonAction, ButtonInput, KeyInput, PressMode};
use crate::canvas::surface::{ControlColors, Surface};
use crate::device::event::{DeviceEvent, EventStamp};
use crate::device::queue::EventQueue;
use crate::geometry::{checks, inside_circle, Point};

/// Round push button.
///
/// Left press inside the circle holds it down until the left button is
/// released, the pointer moves out of the circle, or the pointer leaves the
/// canvas. Middle press toggles it; it is switched off again by another
/// middle press inside the circle or by any key press.
#[derive(Debug)]
pub struct Button {
    center: Point,
    radius: f64,
    sticky: bool,
    state: InputState,
    /// Last value passed on to the queue.
    pressed: bool,
    stamp: Option<EventStamp>,
}

impl Button {
    pub fn new(x: f64, y: f64, radius: f64, sticky: bool) -> Self {
        let center = Point::new(x, y);
        require("button", checks::point("center", center));
        require("button", checks::radius(radius));
        Self {
            center,
            radius,
            sticky,
            state: InputState::NoInput,
            pressed: false,
            stamp: None,
        }
    }

    pub(crate) fn bind(&mut self, stamp: EventStamp) {
        self.stamp = Some(stamp);
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn index(&self) -> Option<u8> {
        self.stamp.map(|s| s.index)
    }

    fn contains(&self, p: Point) -> bool {
        inside_circle(p, self.center, self.radius)
    }

    /// Passes the value on if the state changed it. Returns true on change.
    fn pass_change(&mut self, queue: &EventQueue) -> bool {
        let pressed = self.state.is_active();
        if pressed == self.pressed {
            return false;
        }
        self.pressed = pressed;
        match self.stamp {
            Some(stamp) => {
                debug!("Button {} -> {}", stamp.index, pressed);
                queue.push_event(DeviceEvent::button(stamp, pressed));
            }
            None => debug!("Unregistered button changed to {}", pressed),
        }
        true
    }
}

impl Control for Button {
    fn describe(&self) -> String {
        format!(
            "button {:?} at ({:.0}, {:.0}) r={:.0}{}",
            self.index(),
            self.center.x,
            self.center.y,
            self.radius,
            if self.sticky { " sticky" } else { "" }
        )
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let fill = match self.state {
            InputState::NoInput => ControlColors::IDLE,
            InputState::Momentary => ControlColors::MOMENTARY,
            InputState::ToggleOn => ControlColors::TOGGLED,
        };
        surface.fill_circle(self.center, self.radius, fill);
        surface.stroke_circle(self.center, self.radius, 1.5, ControlColors::OUTLINE);
        if let Some(index) = self.index() {
            surface.text(self.center, &format!("B{}", index), ControlColors::LABEL);
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
                }
            }
            (ButtonAction::Press, PressMode::Toggle) => {
                if self.contains(input.at) {
                    self.state = match self.state {
                        InputState::ToggleOn => InputState::NoInput,
                        _ => InputState::ToggleOn,
                    };
                }
            }
            (ButtonAction::Release, PressMode::Momentary) => {
                if self.state == InputState::Momentary {
                    self.state = InputState::NoInput;
                }
            }
            (ButtonAction::Release, PressMode::Toggle) => {}
        }
        // Momentary -> ToggleOn keeps the value but changes the color.
        self.pass_change(queue) || previous != self.state
    }

    fn on_motion(&mut self, at: Point, queue: &EventQueue) -> bool {
        if self.state == InputState::Momentary && !self.contains(at) {
            self.state = InputState::NoInput;
        }
        self.pass_change(queue)
    }

    fn on_leave(&mut self, queue: &EventQueue) -> bool {
        if self.state == InputState::Momentary {
            self.state = InputState::NoInput;
        }
        self.pass_change(queue)
    }

    fn on_key(&mut self, _key: &KeyInput, queue: &EventQueue) -> bool {
        if self.state == InputState::ToggleOn {
            self.state = InputState::NoInput;
        }
        self.pass_change(queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::input::PointerButton;
    use crate::controls::test_util::{kinds, stamp};
    use crate::device::event::DeviceEventKind;

    fn bound(sticky: bool) -> Button {
        let mut b = Button::new(50.0, 50.0, 10.0, sticky);
        b.bind(stamp(4));
        b
    }

    const INSIDE: Point = Point::new(52.0, 48.0);
    const OUTSIDE: Point = Point::new(80.0, 50.0);

    #[test]
    fn test_left_press_release_emits_two_events() {
        let queue = EventQueue::new();
        let mut b = bound(false);
        assert!(b.on_button(&ButtonInput::press(PointerButton::Left, INSIDE), &queue));
        assert!(!b.on_motion(Point::new(51.0, 51.0), &queue));
        assert!(b.on_button(&ButtonInput::release(PointerButton::Left, INSIDE), &queue));
        assert_eq!(
            kinds(&queue),
            vec![
                DeviceEventKind::ButtonDown { button: 4 },
                DeviceEventKind::ButtonUp { button: 4 },
            ]
        );
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let queue = EventQueue::new();
        let mut b = bound(false);
        assert!(!b.on_button(&ButtonInput::press(PointerButton::Left, OUTSIDE), &queue));
        assert!(!b.on_button(&ButtonInput::release(PointerButton::Left, OUTSIDE), &queue));
        assert!(kinds(&queue).is_empty());
        assert_eq!(b.state(), InputState::NoInput);
    }

    #[test]
    fn test_momentary_released_by_moving_out_or_leaving() {
        let queue = EventQueue::new();
        let mut b = bound(false);
        b.on_button(&ButtonInput::press(PointerButton::Left, INSIDE), &queue);
        assert!(b.on_motion(OUTSIDE, &queue));
        assert!(!b.is_pressed());

        b.on_button(&ButtonInput::press(PointerButton::Left, INSIDE), &queue);
        assert!(b.on_leave(&queue));
        assert!(!b.on_leave(&queue));
        assert_eq!(kinds(&queue).len(), 4);
    }

    #[test]
    fn test_middle_toggle_survives_motion_and_leave() {
        let queue = EventQueue::new();
        let mut b = bound(false);
        b.on_button(&ButtonInput::press(PointerButton::Middle, INSIDE), &queue);
        b.on_button(&ButtonInput::release(PointerButton::Middle, INSIDE), &queue);
        b.on_motion(OUTSIDE, &queue);
        b.on_leave(&queue);
        assert_eq!(b.state(), InputState::ToggleOn);
        assert!(b.is_pressed());

        b.on_button(&ButtonInput::press(PointerButton::Middle, INSIDE), &queue);
        assert_eq!(b.state(), InputState::NoInput);
        assert_eq!(
            kinds(&queue),
            vec![
                DeviceEventKind::ButtonDown { button: 4 },
                DeviceEventKind::ButtonUp { button: 4 },
            ]
        );
    }

    #[test]
    fn test_key_press_clears_toggle() {
        let queue = EventQueue::new();
        let mut b = bound(false);
        b.on_button(&ButtonInput::press(PointerButton::Middle, INSIDE), &queue);
        assert!(b.on_key(&KeyInput::new("Space"), &queue));
        assert!(!b.on_key(&KeyInput::new("Space"), &queue));
        assert_eq!(kinds(&queue).len(), 2);
    }

    #[test]
    fn test_key_press_does_not_clear_momentary() {
        let queue = EventQueue::new();
        let mut b = bound(false);
        b.on_button(&ButtonInput::press(PointerButton::Left, INSIDE), &queue);
        assert!(!b.on_key(&KeyInput::new("A"), &queue));
        assert_eq!(b.state(), InputState::Momentary);
    }

    #[test]
    fn test_sticky_left_matches_middle() {
        let sticky_queue = EventQueue::new();
        let mut sticky = bound(true);
        sticky.on_button(&ButtonInput::press(PointerButton::Left, INSIDE), &sticky_queue);
        sticky.on_button(&ButtonInput::release(PointerButton::Left, INSIDE), &sticky_queue);
        let mid_state = sticky.state();
        sticky.on_button(&ButtonInput::press(PointerButton::Left, INSIDE), &sticky_queue);

        let middle_queue = EventQueue::new();
        let mut plain = bound(false);
        plain.on_button(&ButtonInput::press(PointerButton::Middle, INSIDE), &middle_queue);
        plain.on_button(&ButtonInput::release(PointerButton::Middle, INSIDE), &middle_queue);
        assert_eq!(mid_state, plain.state());
        plain.on_button(&ButtonInput::press(PointerButton::Middle, INSIDE), &middle_queue);

        assert_eq!(kinds(&sticky_queue), kinds(&middle_queue));
        assert_eq!(sticky.state(), InputState::NoInput);
    }

    #[test]
    fn test_middle_press_latches_momentary() {
        let queue = EventQueue::new();
        let mut b = bound(false);
        b.on_button(&ButtonInput::press(PointerButton::Left, INSIDE), &queue);
        b.on_button(&ButtonInput::press(PointerButton::Middle, INSIDE), &queue);
        b.on_button(&ButtonInput::release(PointerButton::Left, INSIDE), &queue);
        assert_eq!(b.state(), InputState::ToggleOn);
        assert_eq!(kinds(&queue), vec![DeviceEventKind::ButtonDown { button: 4 }]);
    }

    #[test]
    fn test_unbound_button_changes_without_emitting() {
        let queue = EventQueue::new();
        let mut b = Button::new(0.0, 0.0, 5.0, false);
        assert!(b.on_button(&ButtonInput::press(PointerButton::Left, Point::default()), &queue));
        assert!(b.is_pressed());
        assert!(queue.poll_event().is_none());
    }

    #[test]
    #[should_panic]
    fn test_zero_radius_panics() {
        let _ = Button::new(0.0, 0.0, 0.0, false);
    }
}
