//! Canvas dispatch.
//!
//! The canvas hands every raw event to every registered control. Controls
//! decide from their own geometry whether the event concerns them, which also
//! lets overlapping controls all see motion and leave events. Control counts
//! are small, so there is no spatial index.

pub mod input;
pub mod surface;

use tracing::debug;

use self::input::{ButtonInput, KeyInput, UiEvent};
use self::surface::Surface;
use crate::device::queue::EventQueue;
use crate::device::registry::ControlRegistry;
use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    width: f64,
    height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Stores the new size. Control geometry is not rescaled.
    pub fn resize(&mut self, width: f64, height: f64) {
        if (width, height) != (self.width, self.height) {
            debug!("Canvas resized to {:.0}x{:.0}", width, height);
        }
        self.width = width;
        self.height = height;
    }

    pub fn draw(&self, registry: &ControlRegistry, surface: &mut dyn Surface) {
        for control in registry.iter() {
            control.draw(surface);
        }
    }

    /// Handlers below return true if any control changed and a redraw is due.
    pub fn button_event(
        &self,
        registry: &mut ControlRegistry,
        input: &ButtonInput,
        queue: &EventQueue,
    ) -> bool {
        registry
            .iter_mut()
            .fold(false, |changed, c| c.on_button(input, queue) | changed)
    }

    pub fn motion_event(
        &self,
        registry: &mut ControlRegistry,
        at: Point,
        queue: &EventQueue,
    ) -> bool {
        registry
            .iter_mut()
            .fold(false, |changed, c| c.on_motion(at, queue) | changed)
    }

    pub fn leave_event(&self, registry: &mut ControlRegistry, queue: &EventQueue) -> bool {
        registry
            .iter_mut()
            .fold(false, |changed, c| c.on_leave(queue) | changed)
    }

    pub fn key_event(
        &self,
        registry: &mut ControlRegistry,
        key: &KeyInput,
        queue: &EventQueue,
    ) -> bool {
        registry
            .iter_mut()
            .fold(false, |changed, c| c.on_key(key, queue) | changed)
    }

    pub fn dispatch(
        &mut self,
        registry: &mut ControlRegistry,
        event: &UiEvent,
        queue: &EventQueue,
    ) -> bool {
        match event {
            UiEvent::Button(input) => self.button_event(registry, input, queue),
            UiEvent::Motion(at) => self.motion_event(registry, *at, queue),
            UiEvent::Leave => self.leave_event(registry, queue),
            UiEvent::Key(key) => self.key_event(registry, key, queue),
            UiEvent::Resize { width, height } => {
                self.resize(*width, *height);
                true
            }
        }
    }
}
