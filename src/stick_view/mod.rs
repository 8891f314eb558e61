//! Visualization of a joystick's current state.
//!
//! [`JoystickState`] is what a consumer knows about a device after folding
//! its events; [`StickView`] draws it. The simulated device reaches the view
//! through the [`tracker`], a real gamepad through the [`collector`].

pub mod collector;
pub mod tracker;

use chrono::{DateTime, Local};
use egui::Color32;

use crate::canvas::surface::{ControlColors, Surface};
use crate::device::event::{DeviceEvent, DeviceEventKind, HatDirection};
use crate::geometry::Point;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoystickState {
    /// Where the state comes from, shown as the view caption.
    pub source: Option<String>,
    pub axes: Vec<f64>,
    pub buttons: Vec<bool>,
    pub hats: Vec<HatDirection>,
    pub last_update: Option<DateTime<Local>>,
}

fn slot<T: Default + Clone>(values: &mut Vec<T>, index: u8) -> &mut T {
    let index = index as usize;
    if values.len() <= index {
        values.resize(index + 1, T::default());
    }
    &mut values[index]
}

impl JoystickState {
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Folds one event in. Channels seen for the first time are added, along
    /// with any lower indices not seen yet.
    pub fn apply(&mut self, event: &DeviceEvent) {
        match event.kind {
            DeviceEventKind::AxisMotion { axis, value } => {
                *slot(&mut self.axes, axis) = value.clamp(-1.0, 1.0)
            }
            DeviceEventKind::ButtonDown { button } => *slot(&mut self.buttons, button) = true,
            DeviceEventKind::ButtonUp { button } => *slot(&mut self.buttons, button) = false,
            DeviceEventKind::HatMotion { hat, value } => *slot(&mut self.hats, hat) = value,
        }
        self.last_update = Some(event.timestamp);
    }
}

const STICK_SIZE: f64 = 120.0;
const BAR_HEIGHT: f64 = 14.0;
const BUTTON_RADIUS: f64 = 7.0;
const BUTTON_SPACING: f64 = 20.0;
const BUTTONS_PER_ROW: usize = 8;
const HAT_RADIUS: f64 = 22.0;
const CAPTION_HEIGHT: f64 = 18.0;

/// Draws a [`JoystickState`] in logical coordinates starting at `origin`.
///
/// Layout from the top: caption, the first two axes as a dot in a square
/// (next to the hats), further axes as bars, then rows of buttons.
#[derive(Debug, Clone)]
pub struct StickView {
    caption: String,
    accent: Color32,
}

impl StickView {
    pub fn new(caption: impl Into<String>, accent: Color32) -> Self {
        Self {
            caption: caption.into(),
            accent,
        }
    }

    pub fn width(&self) -> f64 {
        STICK_SIZE + 2.0 * HAT_RADIUS + 30.0
    }

    pub fn height(&self, state: &JoystickState) -> f64 {
        let bars = state.axes.len().saturating_sub(2) as f64 * BAR_HEIGHT;
        let rows = state.buttons.len().div_ceil(BUTTONS_PER_ROW) as f64;
        CAPTION_HEIGHT + STICK_SIZE + 8.0 + bars + rows * BUTTON_SPACING
    }

    pub fn draw(&self, state: &JoystickState, origin: Point, surface: &mut dyn Surface) {
        let caption = match &state.source {
            Some(source) => format!("{}: {}", self.caption, source),
            None => format!("{}: not connected", self.caption),
        };
        surface.text(origin, &caption, ControlColors::LABEL);

        let top = origin.y + CAPTION_HEIGHT;
        self.draw_stick(state, Point::new(origin.x, top), surface);
        self.draw_hats(state, Point::new(origin.x + STICK_SIZE + 15.0, top), surface);

        let mut y = top + STICK_SIZE + 8.0;
        for value in state.axes.iter().skip(2) {
            self.draw_bar(*value, Point::new(origin.x, y + BAR_HEIGHT * 0.5), surface);
            y += BAR_HEIGHT;
        }
        for (i, pressed) in state.buttons.iter().enumerate() {
            let col = (i % BUTTONS_PER_ROW) as f64;
            let row = (i / BUTTONS_PER_ROW) as f64;
            let center = Point::new(
                origin.x + BUTTON_RADIUS + col * BUTTON_SPACING,
                y + BUTTON_RADIUS + row * BUTTON_SPACING,
            );
            let fill = if *pressed { self.accent } else { ControlColors::IDLE };
            surface.fill_circle(center, BUTTON_RADIUS, fill);
            surface.stroke_circle(center, BUTTON_RADIUS, 1.0, ControlColors::OUTLINE);
        }
    }

    fn draw_stick(&self, state: &JoystickState, min: Point, surface: &mut dyn Surface) {
        let max = min + Point::new(STICK_SIZE, STICK_SIZE);
        surface.stroke_rect(min, max, 1.0, ControlColors::OUTLINE);
        let center = (min + max) * 0.5;
        surface.line(
            Point::new(min.x, center.y),
            Point::new(max.x, center.y),
            1.0,
            ControlColors::TRACK,
        );
        surface.line(
            Point::new(center.x, min.y),
            Point::new(center.x, max.y),
            1.0,
            ControlColors::TRACK,
        );
        let x = state.axes.first().copied().unwrap_or(0.0);
        let y = state.axes.get(1).copied().unwrap_or(0.0);
        // positive y points up on screen
        let dot = center + Point::new(x, -y) * (STICK_SIZE * 0.5);
        surface.fill_circle(dot, 5.0, self.accent);
    }

    fn draw_hats(&self, state: &JoystickState, top_left: Point, surface: &mut dyn Surface) {
        for (i, hat) in state.hats.iter().enumerate() {
            let center = top_left
                + Point::new(HAT_RADIUS, HAT_RADIUS + i as f64 * (2.0 * HAT_RADIUS + 6.0));
            surface.stroke_circle(center, HAT_RADIUS, 1.0, ControlColors::OUTLINE);
            let (dx, dy) = hat.offset();
            let at = center + Point::new(dx, dy) * (HAT_RADIUS * 0.6);
            let fill = if hat.is_centered() {
                ControlColors::IDLE
            } else {
                self.accent
            };
            surface.fill_circle(at, 5.0, fill);
        }
    }

    fn draw_bar(&self, value: f64, left: Point, surface: &mut dyn Surface) {
        let right = left + Point::new(STICK_SIZE, 0.0);
        let mid = (left + right) * 0.5;
        surface.line(left, right, 2.0, ControlColors::TRACK);
        surface.line(
            mid,
            mid + Point::new(value * STICK_SIZE * 0.5, 0.0),
            BAR_HEIGHT - 4.0,
            self.accent,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::surface::recording::RecordingSurface;
    use crate::device::event::EventStamp;

    fn stamp(index: u8) -> EventStamp {
        EventStamp { which: 0, index }
    }

    #[test]
    fn test_apply_grows_channels() {
        let mut state = JoystickState::default();
        state.apply(&DeviceEvent::button(stamp(3), true));
        assert_eq!(state.buttons, vec![false, false, false, true]);
        state.apply(&DeviceEvent::axis(stamp(1), -0.5));
        assert_eq!(state.axes, vec![0.0, -0.5]);
        state.apply(&DeviceEvent::hat(stamp(0), HatDirection::LEFT_UP));
        assert_eq!(state.hats, vec![HatDirection::LEFT_UP]);
        assert!(state.last_update.is_some());
    }

    #[test]
    fn test_apply_updates_in_place() {
        let mut state = JoystickState::default();
        state.apply(&DeviceEvent::button(stamp(0), true));
        state.apply(&DeviceEvent::button(stamp(0), false));
        state.apply(&DeviceEvent::axis(stamp(0), 0.25));
        state.apply(&DeviceEvent::axis(stamp(0), 0.75));
        assert_eq!(state.buttons, vec![false]);
        assert_eq!(state.axes, vec![0.75]);
    }

    #[test]
    fn test_draw_highlights_pressed_buttons() {
        let accent = Color32::from_rgb(1, 2, 3);
        let view = StickView::new("Simulated", accent);
        let mut state = JoystickState::with_source("flexi");
        state.apply(&DeviceEvent::button(stamp(0), false));
        state.apply(&DeviceEvent::button(stamp(1), true));

        let mut surface = RecordingSurface::default();
        view.draw(&state, Point::new(0.0, 0.0), &mut surface);
        assert_eq!(surface.texts(), vec!["Simulated: flexi"]);

        let fills: Vec<_> = surface.filled_circles().into_iter().map(|(_, c)| c).collect();
        // stick dot, then the two buttons
        assert_eq!(fills, vec![accent, ControlColors::IDLE, accent]);
    }

    #[test]
    fn test_stick_dot_follows_axes() {
        let accent = Color32::from_rgb(9, 9, 9);
        let view = StickView::new("Hardware", accent);
        let mut state = JoystickState::default();
        state.apply(&DeviceEvent::axis(stamp(0), 1.0));
        state.apply(&DeviceEvent::axis(stamp(1), 1.0));

        let mut surface = RecordingSurface::default();
        view.draw(&state, Point::new(10.0, 0.0), &mut surface);
        assert_eq!(surface.texts(), vec!["Hardware: not connected"]);
        let (dot, _) = surface.filled_circles()[0];
        assert_eq!(dot, Point::new(10.0 + STICK_SIZE, CAPTION_HEIGHT));
    }

    #[test]
    fn test_height_grows_with_channels() {
        let view = StickView::new("v", Color32::WHITE);
        let mut state = JoystickState::default();
        let base = view.height(&state);
        state.apply(&DeviceEvent::axis(stamp(3), 0.0));
        state.apply(&DeviceEvent::button(stamp(8), true));
        assert_eq!(view.height(&state), base + 2.0 * BAR_HEIGHT + 2.0 * BUTTON_SPACING);
    }
}
