use tokio::sync::broadcast;
use tracing::debug;

use crate::models::job::Job;
use crate::realtime::events::{ChangeEvent, EventType};

/// Fan-out of row-level changes to every connected subscriber.
///
/// Publishing never blocks: subscribers that fall more than `capacity`
/// events behind skip ahead and are expected to refetch.
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ChangeEvent) {
        // Err only means nobody is listening right now.
        match self.sender.send(event) {
            Ok(n) => debug!("Change event delivered to {n} subscriber(s)"),
            Err(_) => debug!("Change event dropped: no subscribers"),
        }
    }

    pub fn job_inserted(&self, job: &Job) {
        self.publish(ChangeEvent::jobs(EventType::Insert, job.clone()));
    }

    pub fn job_updated(&self, job: &Job) {
        self.publish(ChangeEvent::jobs(EventType::Update, job.clone()));
    }

    pub fn job_deleted(&self, job: &Job) {
        self.publish(ChangeEvent::jobs(EventType::Delete, job.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::job;
    use crate::models::job::JobStatus;

    #[tokio::test]
    async fn test_subscriber_receives_published_events_in_order() {
        let feed = ChangeFeed::new(8);
        let mut rx = feed.subscribe();
        let j = job("j1", JobStatus::Applied);

        feed.job_inserted(&j);
        feed.job_deleted(&j);

        assert_eq!(rx.recv().await.unwrap().event_type, EventType::Insert);
        assert_eq!(rx.recv().await.unwrap().event_type, EventType::Delete);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_does_not_fail() {
        let feed = ChangeFeed::new(8);
        feed.job_updated(&job("j1", JobStatus::Offer));
    }

    #[tokio::test]
    async fn test_lagging_subscriber_is_told_how_much_it_missed() {
        let feed = ChangeFeed::new(2);
        let mut rx = feed.subscribe();
        for _ in 0..5 {
            feed.job_updated(&job("j1", JobStatus::Offer));
        }
        match rx.recv().await {
            Err(broadcast::error::RecvError::Lagged(n)) => assert_eq!(n, 3),
            other => panic!("expected lag, got {other:?}"),
        }
    }
}
