use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::JoystickState;
use crate::device::event::DeviceEvent;

/// Folds a stream of device events into a [`JoystickState`] for the UI.
pub struct StateTracker;

impl StateTracker {
    /// Spawns the tracking task and returns the receiving side of the state.
    ///
    /// The task ends when the event channel closes or `cancel` fires.
    pub fn spawn(
        initial: JoystickState,
        mut events: mpsc::Receiver<DeviceEvent>,
        cancel: CancellationToken,
    ) -> watch::Receiver<JoystickState> {
        let (state_sender, state_receiver) = watch::channel(initial);
        info!("Spawning state tracker");
        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("State tracker cancelled");
                        break;
                    }
                    event = events.recv() => event,
                };
                let Some(event) = event else {
                    info!("Event channel closed, state tracker finished");
                    break;
                };
                debug!("Tracking {}", event);
                state_sender.send_modify(|state| state.apply(&event));
            }
        });
        state_receiver
    }
}
