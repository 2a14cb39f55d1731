//! Typed app-wide signals.
//!
//! Producers publish through [`EventBus::publish`]; every subscriber gets its
//! own receiver and sees each event published after it subscribed.

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Bring the home screen to the front
    SwitchToHome,
    /// Today's photo and quote should be fetched again
    RefreshToday,
    /// The photo collection changed (import, repair or delete)
    PhotosChanged { count: usize },
    ImportProgress { fraction: f32, message: String },
    ImportFinished { success_count: usize, failed: usize },
    IntegrityChecked { removed: usize },
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Sends `event` to all current subscribers and returns how many got it
    pub fn publish(&self, event: AppEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                log::debug!("No subscribers for {:?}", event);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let bus = EventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(AppEvent::SwitchToHome), 2);
        assert_eq!(bus.publish(AppEvent::RefreshToday), 2);

        assert_eq!(first.recv().await.unwrap(), AppEvent::SwitchToHome);
        assert_eq!(first.recv().await.unwrap(), AppEvent::RefreshToday);
        assert_eq!(second.recv().await.unwrap(), AppEvent::SwitchToHome);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        assert_eq!(bus.publish(AppEvent::PhotosChanged { count: 3 }), 0);
    }
}
