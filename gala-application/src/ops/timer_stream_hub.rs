use std::collections::HashMap;

use gala_domain::{EventId, TimerSettings};
use tokio::sync::{broadcast, RwLock};

const CHANNEL_BUFFER: usize = 64;

/// Fan-out of timer settings updates to live countdown displays.
#[derive(Default)]
pub struct TimerStreamHub {
    channels: RwLock<HashMap<EventId, broadcast::Sender<TimerSettings>>>,
}

impl TimerStreamHub {
    pub async fn subscribe(&self, event_id: EventId) -> broadcast::Receiver<TimerSettings> {
        let mut channels = self.channels.write().await;
        channels
            .entry(event_id)
            .or_insert_with(|| {
                let (tx, _rx) = broadcast::channel(CHANNEL_BUFFER);
                tx
            })
            .subscribe()
    }

    /// Returns the number of live subscribers that received the update.
    pub async fn publish(&self, settings: &TimerSettings) -> usize {
        let channels = self.channels.read().await;
        let Some(tx) = channels.get(&settings.event_id) else {
            return 0;
        };
        tx.send(settings.clone()).unwrap_or(0)
    }

    /// Drops channels nobody listens to anymore.
    pub async fn prune(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
    }

    pub async fn forget(&self, event_id: EventId) {
        self.channels.write().await.remove(&event_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_settings() {
        let hub = TimerStreamHub::default();
        let event_id = EventId::new();
        let mut rx = hub.subscribe(event_id).await;

        let mut settings = TimerSettings::default_for(event_id);
        settings.title = "Launch".to_string();
        assert_eq!(hub.publish(&settings).await, 1);

        let received = rx.recv().await.expect("recv");
        assert_eq!(received.title, "Launch");
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let hub = TimerStreamHub::default();
        let settings = TimerSettings::default_for(EventId::new());
        assert_eq!(hub.publish(&settings).await, 0);

        let event_id = EventId::new();
        drop(hub.subscribe(event_id).await);
        hub.prune().await;
        assert_eq!(hub.publish(&TimerSettings::default_for(event_id)).await, 0);
    }
}
