//! Event queue between the GUI thread and a polling consumer.
//!
//! Producers append through a tokio unbounded sender, so a push never waits on
//! the consumer. The receiving half sits behind a mutex that only the single
//! consumer takes; polling uses `try_recv` and never blocks on an empty queue.

use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{error, warn};

use super::event::DeviceEvent;

#[derive(Debug)]
pub struct EventQueue {
    sender: mpsc::UnboundedSender<DeviceEvent>,
    receiver: Mutex<mpsc::UnboundedReceiver<DeviceEvent>>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Appends an event. Safe to call from any thread.
    pub fn push_event(&self, event: DeviceEvent) {
        // The receiver lives in the same struct, so this only fails if it was
        // closed explicitly.
        if let Err(e) = self.sender.send(event) {
            warn!("Dropping device event, queue closed: {:?}", e.0);
        }
    }

    /// Takes the oldest pending event, or `None` when nothing is pending.
    pub fn poll_event(&self) -> Option<DeviceEvent> {
        let mut receiver = self
            .receiver
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                error!("Event queue disconnected");
                None
            }
        }
    }

    /// Takes every pending event in FIFO order.
    pub fn drain(&self) -> Vec<DeviceEvent> {
        std::iter::from_fn(|| self.poll_event()).collect()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer-side handle on a device's queue.
///
/// Cheap to clone; can be moved to another thread or task. It can only take
/// events out, never put them in.
#[derive(Debug, Clone)]
pub struct EventPoller {
    queue: Arc<EventQueue>,
}

impl EventPoller {
    pub(crate) fn new(queue: Arc<EventQueue>) -> Self {
        Self { queue }
    }

    pub fn poll_event(&self) -> Option<DeviceEvent> {
        self.queue.poll_event()
    }

    pub fn drain(&self) -> Vec<DeviceEvent> {
        self.queue.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::event::{DeviceEventKind, EventStamp};

    fn stamp(index: u8) -> EventStamp {
        EventStamp { which: 1, index }
    }

    #[test]
    fn test_fifo_then_empty() {
        let queue = EventQueue::new();
        queue.push_event(DeviceEvent::button(stamp(0), true));
        queue.push_event(DeviceEvent::axis(stamp(1), 0.5));
        queue.push_event(DeviceEvent::button(stamp(2), false));

        let kinds: Vec<_> = (0..3)
            .map(|_| queue.poll_event().map(|e| e.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some(DeviceEventKind::ButtonDown { button: 0 }),
                Some(DeviceEventKind::AxisMotion {
                    axis: 1,
                    value: 0.5
                }),
                Some(DeviceEventKind::ButtonUp { button: 2 }),
            ]
        );
        assert!(queue.poll_event().is_none());
    }

    #[test]
    fn test_poll_on_empty_queue_returns_none() {
        let queue = EventQueue::new();
        assert!(queue.poll_event().is_none());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_concurrent_producers_and_poller() {
        let queue = Arc::new(EventQueue::new());
        let poller = EventPoller::new(queue.clone());

        let producers: Vec<_> = (0..4u8)
            .map(|t| {
                let queue = queue.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        queue.push_event(DeviceEvent::button(stamp(t), true));
                    }
                })
            })
            .collect();

        let mut received = 0;
        while received < 1000 {
            match poller.poll_event() {
                Some(_) => received += 1,
                None => std::thread::yield_now(),
            }
        }
        for p in producers {
            p.join().expect("producer thread panicked");
        }
        assert_eq!(received, 1000);
        assert!(poller.poll_event().is_none());
    }

    #[test]
    fn test_per_producer_order_is_preserved() {
        let queue = EventQueue::new();
        for i in 0..10u8 {
            queue.push_event(DeviceEvent::button(stamp(i), true));
        }
        let indices: Vec<u8> = queue.drain().iter().map(|e| e.kind.index()).collect();
        assert_eq!(indices, (0..10).collect::<Vec<u8>>());
    }
}
