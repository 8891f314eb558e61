//! Canvas controls that behave like parts of a joystick.
//!
//! Every control decides from its own geometry whether a pointer event
//! concerns it, runs its interaction state machine, and pushes a device event
//! onto the queue when (and only when) its value changed.
//!
//! | control    | left button        | middle button      | value            |
//! |------------|--------------------|--------------------|------------------|
//! | [`Button`] | momentary press    | toggle             | pressed/released |
//! | [`Slider`] | drag, back to 0    | hold at position   | one axis         |
//! | [`Slider2D`] | drag, back to 0  | hold at position   | two axes         |
//! | [`Hat`]    | momentary direction | toggle direction  | hat code         |
//!
//! With `sticky` set, the left button behaves like the middle button.

pub mod button;
pub mod hat;
pub mod slider;
pub mod slider2d;

pub use button::Button;
pub use hat::Hat;
pub use slider::Slider;
pub use slider2d::Slider2D;

use crate::canvas::input::{ButtonInput, KeyInput};
use crate::canvas::surface::Surface;
use crate::device::queue::EventQueue;
use crate::geometry::Point;

/// Capability set of a canvas control.
///
/// The `on_*` handlers return true when the control's state changed and it
/// needs to be redrawn.
pub trait Control {
    /// Short description for logs.
    fn describe(&self) -> String;

    fn draw(&self, surface: &mut dyn Surface);

    fn on_button(&mut self, input: &ButtonInput, queue: &EventQueue) -> bool;

    fn on_motion(&mut self, at: Point, queue: &EventQueue) -> bool;

    /// The pointer left the canvas.
    fn on_leave(&mut self, queue: &EventQueue) -> bool;

    fn on_key(&mut self, _key: &KeyInput, _queue: &EventQueue) -> bool {
        false
    }
}

/// Panics with the reason when a construction check fails.
pub(crate) fn require(control: &str, check: Result<(), String>) {
    if let Err(reason) = check {
        panic!("invalid {}: {}", control, reason);
    }
}

/// Interaction state of the discrete controls (button and hat).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputState {
    /// No input currently active
    #[default]
    NoInput,
    /// Held with the left button
    Momentary,
    /// Toggled on with the middle button (or left when sticky)
    ToggleOn,
}

impl InputState {
    pub fn is_active(self) -> bool {
        self != InputState::NoInput
    }
}
