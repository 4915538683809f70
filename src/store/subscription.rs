use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::store::{Document, DocumentStore, Query};

/// Latest state of a live query
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// First result not yet received
    Loading,
    Ready(Vec<Document>),
    Failed(String),
}

/// Live query result kept current by a background task.
///
/// Push-capable stores wake the task on every commit; others are polled.
/// Dropping the subscription stops the task.
pub struct Subscription {
    rx: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Start following `query`; must be called inside a tokio runtime
    pub fn spawn(store: Arc<dyn DocumentStore>, query: Query, poll_interval: Duration) -> Self {
        let (tx, rx) = watch::channel(Snapshot::Loading);

        let task = tokio::spawn(async move {
            let mut changes = store.changes();

            loop {
                let next = match store.run_query(&query).await {
                    Ok(docs) => Snapshot::Ready(docs),
                    Err(e) => {
                        warn!("Query on {} failed: {}", query.collection, e);
                        Snapshot::Failed(e.to_string())
                    }
                };

                let modified = tx.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });
                if modified {
                    debug!("New snapshot for {}", query.collection);
                }

                if tx.is_closed() {
                    break;
                }

                match changes.as_mut() {
                    Some(changes) => {
                        if changes.changed().await.is_err() {
                            break;
                        }
                    }
                    None => tokio::time::sleep(poll_interval).await,
                }
            }
        });

        Self { rx, task }
    }

    /// Copy of the latest snapshot
    pub fn current(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot. Returns `false` once the feed has ended.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Wait until the first result (or failure) has arrived
    pub async fn ready(&mut self) -> Snapshot {
        loop {
            let current = self.rx.borrow_and_update().clone();
            if current != Snapshot::Loading || !self.changed().await {
                return current;
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Write};
    use serde_json::json;

    fn fields(value: serde_json::Value) -> crate::store::Fields {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_subscription_follows_commits() {
        let store = Arc::new(MemoryStore::new());
        let mut sub = Subscription::spawn(
            store.clone(),
            Query::collection("leads"),
            Duration::from_secs(60),
        );

        assert_eq!(sub.ready().await, Snapshot::Ready(vec![]));

        store
            .commit(vec![Write::create("leads", "l1", fields(json!({"name": "Anna"})))])
            .await
            .unwrap();

        assert!(sub.changed().await);
        match sub.current() {
            Snapshot::Ready(docs) => assert_eq!(docs.len(), 1),
            other => panic!("unexpected snapshot: {:?}", other),
        }
    }
}
