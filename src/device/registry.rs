use tracing::info;

use super::event::{ChannelKind, DeviceId, EventStamp};
use crate::controls::{Button, Control, Hat, Slider, Slider2D};

/// Owns the controls of a device and hands out channel indices.
///
/// Indices are allocated per kind in registration order and never reused;
/// controls are never removed.
pub struct ControlRegistry {
    which: DeviceId,
    controls: Vec<Box<dyn Control>>,
    axes: u16,
    buttons: u16,
    hats: u16,
}

impl ControlRegistry {
    pub fn new(which: DeviceId) -> Self {
        Self {
            which,
            controls: Vec::new(),
            axes: 0,
            buttons: 0,
            hats: 0,
        }
    }

    fn allocate(&mut self, kind: ChannelKind) -> EventStamp {
        let counter = match kind {
            ChannelKind::Axis => &mut self.axes,
            ChannelKind::Button => &mut self.buttons,
            ChannelKind::Hat => &mut self.hats,
        };
        assert!(
            *counter <= u8::MAX as u16,
            "no free {:?} index left on device {}",
            kind,
            self.which
        );
        let index = *counter as u8;
        *counter += 1;
        EventStamp {
            which: self.which,
            index,
        }
    }

    fn insert(&mut self, control: Box<dyn Control>) {
        info!("Registered {}", control.describe());
        self.controls.push(control);
    }

    pub fn register_button(&mut self, mut button: Button) -> u8 {
        let stamp = self.allocate(ChannelKind::Button);
        button.bind(stamp);
        self.insert(Box::new(button));
        stamp.index
    }

    pub fn register_hat(&mut self, mut hat: Hat) -> u8 {
        let stamp = self.allocate(ChannelKind::Hat);
        hat.bind(stamp);
        self.insert(Box::new(hat));
        stamp.index
    }

    pub fn register_axis(&mut self, mut slider: Slider) -> u8 {
        let stamp = self.allocate(ChannelKind::Axis);
        slider.bind(stamp);
        self.insert(Box::new(slider));
        stamp.index
    }

    /// Registers a 2D slider on two consecutive axes, returned as (x, y).
    pub fn register_axes(&mut self, mut slider: Slider2D) -> (u8, u8) {
        let x = self.allocate(ChannelKind::Axis);
        let y = self.allocate(ChannelKind::Axis);
        slider.bind(x, y);
        self.insert(Box::new(slider));
        (x.index, y.index)
    }

    pub fn which(&self) -> DeviceId {
        self.which
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Number of allocated indices of a kind.
    pub fn count(&self, kind: ChannelKind) -> usize {
        match kind {
            ChannelKind::Axis => self.axes as usize,
            ChannelKind::Button => self.buttons as usize,
            ChannelKind::Hat => self.hats as usize,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Control> {
        self.controls.iter().map(|c| c.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Control>> {
        self.controls.iter_mut()
    }
}
