use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a (simulated or real) joystick device.
pub type DeviceId = u32;

/// Category of a device channel. Each kind has its own index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    Axis,
    Button,
    Hat,
}

/// Device id plus channel index, stamped onto every event a control emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventStamp {
    pub which: DeviceId,
    pub index: u8,
}

/// Hat position using the classic joystick bitmask codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HatDirection(pub u8);

impl HatDirection {
    pub const CENTERED: HatDirection = HatDirection(0x00);
    pub const UP: HatDirection = HatDirection(0x01);
    pub const RIGHT: HatDirection = HatDirection(0x02);
    pub const DOWN: HatDirection = HatDirection(0x04);
    pub const LEFT: HatDirection = HatDirection(0x08);
    pub const RIGHT_UP: HatDirection = HatDirection(0x02 | 0x01);
    pub const RIGHT_DOWN: HatDirection = HatDirection(0x02 | 0x04);
    pub const LEFT_UP: HatDirection = HatDirection(0x08 | 0x01);
    pub const LEFT_DOWN: HatDirection = HatDirection(0x08 | 0x04);

    pub fn is_centered(self) -> bool {
        self == Self::CENTERED
    }

    pub fn contains(self, other: HatDirection) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// Unit-ish offset for drawing, y pointing down.
    pub fn offset(self) -> (f64, f64) {
        let mut x = 0.0;
        let mut y = 0.0;
        if self.contains(Self::RIGHT) {
            x += 1.0;
        }
        if self.contains(Self::LEFT) {
            x -= 1.0;
        }
        if self.contains(Self::UP) {
            y -= 1.0;
        }
        if self.contains(Self::DOWN) {
            y += 1.0;
        }
        (x, y)
    }
}

/// Payload of a device event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeviceEventKind {
    /// Axis value normalized to `[-1.0, 1.0]`.
    AxisMotion { axis: u8, value: f64 },
    ButtonDown { button: u8 },
    ButtonUp { button: u8 },
    HatMotion { hat: u8, value: HatDirection },
}

impl DeviceEventKind {
    pub fn channel(&self) -> ChannelKind {
        match self {
            DeviceEventKind::AxisMotion { .. } => ChannelKind::Axis,
            DeviceEventKind::ButtonDown { .. } | DeviceEventKind::ButtonUp { .. } => {
                ChannelKind::Button
            }
            DeviceEventKind::HatMotion { .. } => ChannelKind::Hat,
        }
    }

    pub fn index(&self) -> u8 {
        match *self {
            DeviceEventKind::AxisMotion { axis, .. } => axis,
            DeviceEventKind::ButtonDown { button } | DeviceEventKind::ButtonUp { button } => button,
            DeviceEventKind::HatMotion { hat, .. } => hat,
        }
    }
}

/// Joystick event as produced by a device and handed to a polling consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceEvent {
    pub which: DeviceId,
    pub kind: DeviceEventKind,
    pub timestamp: DateTime<Local>,
}

impl DeviceEvent {
    pub fn new(which: DeviceId, kind: DeviceEventKind) -> Self {
        Self {
            which,
            kind,
            timestamp: Local::now(),
        }
    }

    pub fn axis(stamp: EventStamp, value: f64) -> Self {
        Self::new(
            stamp.which,
            DeviceEventKind::AxisMotion {
                axis: stamp.index,
                value,
            },
        )
    }

    pub fn button(stamp: EventStamp, pressed: bool) -> Self {
        let kind = if pressed {
            DeviceEventKind::ButtonDown {
                button: stamp.index,
            }
        } else {
            DeviceEventKind::ButtonUp {
                button: stamp.index,
            }
        };
        Self::new(stamp.which, kind)
    }

    pub fn hat(stamp: EventStamp, value: HatDirection) -> Self {
        Self::new(
            stamp.which,
            DeviceEventKind::HatMotion {
                hat: stamp.index,
                value,
            },
        )
    }

    /// Axis value in the signed 16-bit range used by joystick APIs, if this is
    /// an axis event.
    pub fn raw_axis_value(&self) -> Option<i16> {
        match self.kind {
            DeviceEventKind::AxisMotion { value, .. } => {
                Some((value.clamp(-1.0, 1.0) * i16::MAX as f64).round() as i16)
            }
            _ => None,
        }
    }
}

impl fmt::Display for DeviceEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let at = self.timestamp.format("%H:%M:%S.%3f");
        match self.kind {
            DeviceEventKind::AxisMotion { axis, value } => {
                write!(f, "[{}] dev {} axis {} = {:.3}", at, self.which, axis, value)
            }
            DeviceEventKind::ButtonDown { button } => {
                write!(f, "[{}] dev {} button {} down", at, self.which, button)
            }
            DeviceEventKind::ButtonUp { button } => {
                write!(f, "[{}] dev {} button {} up", at, self.which, button)
            }
            DeviceEventKind::HatMotion { hat, value } => {
                write!(f, "[{}] dev {} hat {} = {:#04x}", at, self.which, hat, value.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_axis_value_range() {
        let stamp = EventStamp { which: 0, index: 2 };
        assert_eq!(DeviceEvent::axis(stamp, 1.0).raw_axis_value(), Some(32767));
        assert_eq!(DeviceEvent::axis(stamp, -1.0).raw_axis_value(), Some(-32767));
        assert_eq!(DeviceEvent::axis(stamp, 0.0).raw_axis_value(), Some(0));
        assert_eq!(DeviceEvent::button(stamp, true).raw_axis_value(), None);
    }

    #[test]
    fn test_kind_channel_and_index() {
        let stamp = EventStamp { which: 7, index: 3 };
        let ev = DeviceEvent::hat(stamp, HatDirection::LEFT_UP);
        assert_eq!(ev.which, 7);
        assert_eq!(ev.kind.channel(), ChannelKind::Hat);
        assert_eq!(ev.kind.index(), 3);
        assert_eq!(
            DeviceEvent::button(stamp, false).kind,
            DeviceEventKind::ButtonUp { button: 3 }
        );
    }

    #[test]
    fn test_hat_diagonals_are_bit_unions() {
        assert!(HatDirection::RIGHT_DOWN.contains(HatDirection::RIGHT));
        assert!(HatDirection::RIGHT_DOWN.contains(HatDirection::DOWN));
        assert!(!HatDirection::RIGHT_DOWN.contains(HatDirection::UP));
        assert!(!HatDirection::CENTERED.contains(HatDirection::CENTERED));
        assert_eq!(HatDirection::LEFT_UP.offset(), (-1.0, -1.0));
    }
}
