//! The simulated joystick device: its events, the queue they travel through,
//! the control registry, and the facade tying them to a canvas.

pub mod event;
pub mod gui_device;
pub mod pump;
pub mod queue;
pub mod registry;

pub use event::{DeviceEvent, DeviceEventKind, DeviceId, HatDirection};
pub use gui_device::GuiDevice;
pub use pump::EventPump;
pub use queue::{EventPoller, EventQueue};
