use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use statum::{machine, state};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::JoystickState;
use crate::device::event::HatDirection;

/// Channel layout reported for any gamepad, so the view looks the same
/// whatever the driver exposes.
const AXIS_COUNT: usize = 6;
const BUTTON_COUNT: usize = 13;

#[derive(Clone, Debug)]
pub struct CollectorSettings {
    pub joystick_deadzone: f32,
    /// Pause between polls of the gilrs event queue
    pub idle_sleep: Duration,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            joystick_deadzone: 0.05,
            idle_sleep: Duration::from_millis(1),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Failed to initialize gilrs: {0}")]
    InitializationError(String),

    #[error("Failed to start collector thread: {0}")]
    SpawnError(#[from] std::io::Error),
}

#[state]
#[derive(Debug, Clone)]
pub enum CollectionState {
    Initializing,
    Collecting,
}

/// Reads a real gamepad through gilrs and publishes it as a [`JoystickState`].
#[machine]
#[derive(Debug)]
pub struct HardwareCollector<S: CollectionState> {
    gilrs: Gilrs,
    active_gamepad: Option<GamepadId>,
    settings: CollectorSettings,
    state: JoystickState,
    state_sender: watch::Sender<JoystickState>,
}

impl<S: CollectionState> HardwareCollector<S> {
    fn publish(&self) {
        // Nobody listening is fine, the UI may not have subscribed yet.
        self.state_sender.send_replace(self.state.clone());
    }
}

impl HardwareCollector<Initializing> {
    pub fn create(
        settings: CollectorSettings,
        state_sender: watch::Sender<JoystickState>,
    ) -> Result<Self, CollectorError> {
        debug!("Creating hardware collector with settings: {:?}", settings);
        let gilrs = Gilrs::new().map_err(|e| {
            error!("Failed to initialize gilrs: {}", e);
            CollectorError::InitializationError(e.to_string())
        })?;
        info!("Successfully initialized gilrs");
        Ok(Self::new(
            gilrs,
            None,
            settings,
            JoystickState::default(),
            state_sender,
        ))
    }

    /// Picks the first connected gamepad, if any, and starts collecting.
    pub fn initialize(mut self) -> HardwareCollector<Collecting> {
        let first = self
            .gilrs
            .gamepads()
            .map(|(id, gamepad)| {
                info!("Found gamepad {}: {} ({:?})", id, gamepad.name(), gamepad.uuid());
                id
            })
            .collect::<Vec<_>>()
            .first()
            .copied();
        match first {
            Some(id) => self.select(id),
            None => warn!("No gamepad connected, waiting for one"),
        }
        info!("Hardware collector initialized, transitioning to Collecting state");
        self.transition()
    }

    fn select(&mut self, id: GamepadId) {
        select_gamepad(&self.gilrs, &mut self.active_gamepad, &mut self.state, id);
        self.publish();
    }
}

fn select_gamepad(
    gilrs: &Gilrs,
    active: &mut Option<GamepadId>,
    state: &mut JoystickState,
    id: GamepadId,
) {
    let name = gilrs.gamepad(id).name().to_string();
    info!("Selected gamepad: {} ({})", name, id);
    *active = Some(id);
    *state = JoystickState {
        source: Some(name),
        axes: vec![0.0; AXIS_COUNT],
        buttons: vec![false; BUTTON_COUNT],
        hats: vec![HatDirection::CENTERED],
        last_update: None,
    };
}

impl HardwareCollector<Collecting> {
    /// Polls gilrs until `cancel` fires.
    pub fn run(mut self, cancel: CancellationToken) {
        info!("Starting hardware collector loop");
        while !cancel.is_cancelled() {
            let mut changed = false;
            while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
                changed |= self.handle(id, event);
            }
            if changed {
                self.publish();
            }
            std::thread::sleep(self.settings.idle_sleep);
        }
        info!("Hardware collector stopped");
    }

    /// Returns true when the published state needs an update.
    fn handle(&mut self, id: GamepadId, event: EventType) -> bool {
        match (self.active_gamepad, event) {
            (None, EventType::Connected) => {
                select_gamepad(&self.gilrs, &mut self.active_gamepad, &mut self.state, id);
                true
            }
            (Some(active), EventType::Disconnected) if active == id => {
                warn!("Active gamepad {} disconnected", id);
                self.active_gamepad = None;
                self.state = JoystickState::default();
                true
            }
            (Some(active), event) if active == id => self.apply(event),
            (_, event) => {
                debug!("Skipping event from inactive gamepad {}: {:?}", id, event);
                false
            }
        }
    }

    fn apply(&mut self, event: EventType) -> bool {
        self.state.last_update = Some(chrono::Local::now());
        match event {
            EventType::AxisChanged(axis, value, _) => {
                let Some(index) = axis_index(axis) else {
                    debug!("Ignoring unmapped axis {:?}", axis);
                    return false;
                };
                self.state.axes[index] =
                    apply_deadzone(value, self.settings.joystick_deadzone) as f64;
                true
            }
            EventType::ButtonPressed(button, _) => self.set_button(button, true),
            EventType::ButtonReleased(button, _) => self.set_button(button, false),
            _ => false,
        }
    }

    fn set_button(&mut self, button: Button, pressed: bool) -> bool {
        if let Some(direction) = dpad_direction(button) {
            let hat = &mut self.state.hats[0];
            hat.0 = if pressed {
                hat.0 | direction.0
            } else {
                hat.0 & !direction.0
            };
            debug!("D-pad {:?} -> hat {:#04x}", button, hat.0);
            return true;
        }
        match button_index(button) {
            Some(index) => {
                debug!("Button {:?} ({}) pressed={}", button, index, pressed);
                self.state.buttons[index] = pressed;
                true
            }
            None => {
                debug!("Ignoring unmapped button {:?}", button);
                false
            }
        }
    }
}

/// Handle on the collector thread's output.
pub struct CollectorHandle {
    state_receiver: watch::Receiver<JoystickState>,
}

impl CollectorHandle {
    /// Starts the collector on its own thread. gilrs is created on that
    /// thread; if it cannot be initialized the state stays disconnected.
    pub fn spawn(
        settings: CollectorSettings,
        cancel: CancellationToken,
    ) -> Result<Self, CollectorError> {
        info!("Spawning hardware collector with settings: {:?}", settings);
        let (state_sender, state_receiver) = watch::channel(JoystickState::default());
        std::thread::Builder::new()
            .name("gamepad-collector".to_string())
            .spawn(move || match HardwareCollector::create(settings, state_sender) {
                Ok(collector) => collector.initialize().run(cancel),
                Err(e) => error!("Hardware collector not started: {}", e),
            })?;
        Ok(Self { state_receiver })
    }

    pub fn subscribe(&self) -> watch::Receiver<JoystickState> {
        self.state_receiver.clone()
    }
}

fn axis_index(axis: Axis) -> Option<usize> {
    match axis {
        Axis::LeftStickX => Some(0),
        Axis::LeftStickY => Some(1),
        Axis::RightStickX => Some(2),
        Axis::RightStickY => Some(3),
        Axis::LeftZ => Some(4),
        Axis::RightZ => Some(5),
        _ => None,
    }
}

fn button_index(button: Button) -> Option<usize> {
    match button {
        Button::South => Some(0),
        Button::East => Some(1),
        Button::West => Some(2),
        Button::North => Some(3),
        Button::LeftTrigger => Some(4),
        Button::RightTrigger => Some(5),
        Button::LeftTrigger2 => Some(6),
        Button::RightTrigger2 => Some(7),
        Button::Select => Some(8),
        Button::Start => Some(9),
        Button::Mode => Some(10),
        Button::LeftThumb => Some(11),
        Button::RightThumb => Some(12),
        _ => None,
    }
}

fn dpad_direction(button: Button) -> Option<HatDirection> {
    match button {
        Button::DPadUp => Some(HatDirection::UP),
        Button::DPadDown => Some(HatDirection::DOWN),
        Button::DPadLeft => Some(HatDirection::LEFT),
        Button::DPadRight => Some(HatDirection::RIGHT),
        _ => None,
    }
}

/// Zeroes values inside the dead-zone and rescales the rest to the full range.
fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        value.signum() * (value.abs() - deadzone) / (1.0 - deadzone)
    }
}
