use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::event::DeviceEvent;
use super::queue::EventPoller;

/// Moves device events from the polled queue onto an async channel.
pub struct EventPump;

impl EventPump {
    /// Every `interval`, drains the queue and forwards the events in order.
    ///
    /// The task ends when `cancel` fires or the receiving side is dropped.
    pub fn spawn(
        poller: EventPoller,
        interval: Duration,
        sender: mpsc::Sender<DeviceEvent>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        info!("Spawning event pump with {}ms interval", interval.as_millis());
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut forwarded: u64 = 0;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("Event pump cancelled after forwarding {} events", forwarded);
                        break;
                    }
                    _ = timer.tick() => {}
                }

                let batch = poller.drain();
                if batch.is_empty() {
                    continue;
                }
                debug!("Pumping batch of {} events", batch.len());
                for event in batch {
                    if sender.send(event).await.is_err() {
                        warn!("Event receiver dropped, stopping pump");
                        return;
                    }
                    forwarded += 1;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::event::{DeviceEventKind, EventStamp};
    use crate::device::queue::EventQueue;
    use std::sync::Arc;

    fn stamp(index: u8) -> EventStamp {
        EventStamp { which: 2, index }
    }

    #[tokio::test]
    async fn test_forwards_in_order() {
        let queue = Arc::new(EventQueue::new());
        let (tx, mut rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        let handle = EventPump::spawn(
            EventPoller::new(Arc::clone(&queue)),
            Duration::from_millis(1),
            tx,
            cancel.clone(),
        );

        for i in 0..5 {
            queue.push_event(DeviceEvent::button(stamp(i), true));
        }
        for i in 0..5 {
            let event = rx.recv().await.expect("forwarded event");
            assert_eq!(event.kind, DeviceEventKind::ButtonDown { button: i });
        }

        cancel.cancel();
        handle.await.expect("pump task");
    }

    #[tokio::test]
    async fn test_stops_on_cancel() {
        let queue = Arc::new(EventQueue::new());
        let (tx, mut rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        let handle = EventPump::spawn(
            EventPoller::new(queue),
            Duration::from_millis(5),
            tx,
            cancel.clone(),
        );
        cancel.cancel();
        handle.await.expect("pump task");
        // the sender went away with the task
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_stops_when_receiver_dropped() {
        let queue = Arc::new(EventQueue::new());
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = EventPump::spawn(
            EventPoller::new(Arc::clone(&queue)),
            Duration::from_millis(1),
            tx,
            CancellationToken::new(),
        );
        queue.push_event(DeviceEvent::axis(stamp(0), 0.5));
        handle.await.expect("pump task");
    }
}
