use std::sync::Arc;
use tracing::info;

use super::event::{DeviceEvent, DeviceId};
use super::queue::{EventPoller, EventQueue};
use super::registry::ControlRegistry;
use crate::canvas::input::{ButtonInput, KeyInput, UiEvent};
use crate::canvas::surface::Surface;
use crate::canvas::Canvas;
use crate::config::{AppConfig, ControlConfig};
use crate::controls::{Button, Hat, Slider, Slider2D};
use crate::geometry::Point;

/// A joystick driven by on-screen controls.
///
/// The GUI thread owns the device and feeds it canvas events; consumers read
/// the resulting [`DeviceEvent`]s through [`GuiDevice::poll_event`] or a
/// [`EventPoller`] handle from any thread.
pub struct GuiDevice {
    name: String,
    queue: Arc<EventQueue>,
    registry: ControlRegistry,
    canvas: Canvas,
}

impl GuiDevice {
    pub fn new(name: impl Into<String>, which: DeviceId, width: f64, height: f64) -> Self {
        let name = name.into();
        info!("Creating device '{}' (id {})", name, which);
        Self {
            name,
            queue: Arc::new(EventQueue::new()),
            registry: ControlRegistry::new(which),
            canvas: Canvas::new(width, height),
        }
    }

    /// Builds a device with every control of the layout registered in order.
    ///
    /// The config is expected to have passed [`AppConfig::validate`].
    pub fn from_config(config: &AppConfig) -> Self {
        let mut device = Self::new(
            config.device.name.clone(),
            config.device.which,
            config.canvas.width,
            config.canvas.height,
        );
        for control in &config.controls {
            match *control {
                ControlConfig::Button {
                    x,
                    y,
                    radius,
                    sticky,
                } => {
                    device.register_button(Button::new(x, y, radius, sticky));
                }
                ControlConfig::Slider {
                    x0,
                    y0,
                    x1,
                    y1,
                    radius,
                    sticky,
                    ratio,
                } => {
                    let slider = Slider::new(x0, y0, x1, y1, radius, sticky);
                    device.register_axis(slider.with_ratio(ratio));
                }
                ControlConfig::Slider2D {
                    x0,
                    y0,
                    x1,
                    y1,
                    radius,
                    sticky,
                } => {
                    device.register_axes(Slider2D::new(x0, y0, x1, y1, radius, sticky));
                }
                ControlConfig::Hat {
                    x,
                    y,
                    radius,
                    sticky,
                    dead_zone,
                } => {
                    let hat = Hat::new(x, y, radius, sticky);
                    device.register_hat(hat.with_dead_zone(dead_zone));
                }
            }
        }
        device
    }

    pub fn which(&self) -> DeviceId {
        self.registry.which()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    pub fn register_button(&mut self, button: Button) -> u8 {
        self.registry.register_button(button)
    }

    pub fn register_hat(&mut self, hat: Hat) -> u8 {
        self.registry.register_hat(hat)
    }

    pub fn register_axis(&mut self, slider: Slider) -> u8 {
        self.registry.register_axis(slider)
    }

    pub fn register_axes(&mut self, slider: Slider2D) -> (u8, u8) {
        self.registry.register_axes(slider)
    }

    /// Queues an event that did not come from a control.
    pub fn push_event(&self, event: DeviceEvent) {
        self.queue.push_event(event);
    }

    pub fn poll_event(&self) -> Option<DeviceEvent> {
        self.queue.poll_event()
    }

    pub fn poller(&self) -> EventPoller {
        EventPoller::new(Arc::clone(&self.queue))
    }

    pub fn size(&self) -> (f64, f64) {
        self.canvas.size()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas.resize(width, height);
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        self.canvas.draw(&self.registry, surface);
    }

    pub fn button_event(&mut self, input: &ButtonInput) -> bool {
        self.canvas.button_event(&mut self.registry, input, &self.queue)
    }

    pub fn motion_event(&mut self, at: Point) -> bool {
        self.canvas.motion_event(&mut self.registry, at, &self.queue)
    }

    pub fn leave_event(&mut self) -> bool {
        self.canvas.leave_event(&mut self.registry, &self.queue)
    }

    pub fn key_event(&mut self, key: &KeyInput) -> bool {
        self.canvas.key_event(&mut self.registry, key, &self.queue)
    }

    /// Routes a UI event to the canvas. Returns true when a redraw is due.
    pub fn dispatch(&mut self, event: &UiEvent) -> bool {
        self.canvas.dispatch(&mut self.registry, event, &self.queue)
    }
}
