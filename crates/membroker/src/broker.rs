// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of anymq.
//
// anymq is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// anymq is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with anymq. If not, see <https://www.gnu.org/licenses/>.

//! A single in-process broker instance

use crate::error::BrokerError;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;
use tracing::debug;

/// One broker instance: named queues with per-subscriber byte buffers
///
/// Publishing appends the payload to every subscriber buffer of the queue
/// (fan-out); fetching drains one subscriber's buffer. A queue with no
/// subscribers accepts publishes and drops them.
///
/// All state lives behind one [`RwLock`]; instances are shared as
/// `Arc<Broker>` between producers and consumers of the same process.
pub struct Broker {
    name: String,
    queues: RwLock<HashMap<String, QueueState>>,
}

impl std::fmt::Debug for Broker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broker")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct QueueState {
    subscribers: HashMap<String, VecDeque<Vec<u8>>>,
}

impl Broker {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queues: RwLock::new(HashMap::new()),
        }
    }

    /// Name this instance is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a queue on this instance.
    ///
    /// ## Errors
    /// - [`BrokerError::DuplicateQueue`]: the queue already exists
    pub async fn register_queue(&self, queue: &str) -> Result<(), BrokerError> {
        let mut queues = self.queues.write().await;
        if queues.contains_key(queue) {
            return Err(BrokerError::DuplicateQueue(queue.to_string()));
        }
        queues.insert(queue.to_string(), QueueState::default());
        debug!(instance = %self.name, queue = %queue, "Queue registered");
        Ok(())
    }

    /// Queue names registered on this instance.
    pub async fn queue_names(&self) -> Vec<String> {
        self.queues.read().await.keys().cloned().collect()
    }

    /// Attach a subscriber to a queue, creating its buffer.
    ///
    /// Idempotent: re-attaching an existing subscriber keeps its buffer,
    /// pending payloads included.
    ///
    /// ## Errors
    /// - [`BrokerError::UnknownQueue`]: the queue does not exist
    pub async fn attach_subscriber(
        &self,
        queue: &str,
        subscriber_id: &str,
    ) -> Result<(), BrokerError> {
        let mut queues = self.queues.write().await;
        let state = queues
            .get_mut(queue)
            .ok_or_else(|| BrokerError::UnknownQueue(queue.to_string()))?;
        state
            .subscribers
            .entry(subscriber_id.to_string())
            .or_default();
        debug!(
            instance = %self.name,
            queue = %queue,
            subscriber_id = %subscriber_id,
            "Subscriber attached"
        );
        Ok(())
    }

    /// Publish one payload to a queue, appending it to every subscriber
    /// buffer.
    ///
    /// ## Errors
    /// - [`BrokerError::UnknownQueue`]: the queue does not exist
    pub async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), BrokerError> {
        let mut queues = self.queues.write().await;
        let state = queues
            .get_mut(queue)
            .ok_or_else(|| BrokerError::UnknownQueue(queue.to_string()))?;
        for buffer in state.subscribers.values_mut() {
            buffer.push_back(payload.clone());
        }
        metrics::counter!("anymq_broker_published_total").increment(1);
        Ok(())
    }

    /// Drain one subscriber's buffer, returning the pending payloads in
    /// publish order.
    ///
    /// ## Errors
    /// - [`BrokerError::UnknownQueue`]: the queue does not exist
    /// - [`BrokerError::UnknownSubscriber`]: the subscriber is not attached
    pub async fn fetch(
        &self,
        queue: &str,
        subscriber_id: &str,
    ) -> Result<Vec<Vec<u8>>, BrokerError> {
        let mut queues = self.queues.write().await;
        let state = queues
            .get_mut(queue)
            .ok_or_else(|| BrokerError::UnknownQueue(queue.to_string()))?;
        let buffer = state.subscribers.get_mut(subscriber_id).ok_or_else(|| {
            BrokerError::UnknownSubscriber {
                queue: queue.to_string(),
                subscriber: subscriber_id.to_string(),
            }
        })?;
        Ok(buffer.drain(..).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_fans_out_to_every_subscriber() {
        let broker = Broker::new("alpha");
        broker.register_queue("orders").await.unwrap();
        broker.attach_subscriber("orders", "sub-a").await.unwrap();
        broker.attach_subscriber("orders", "sub-b").await.unwrap();

        broker.publish("orders", b"one".to_vec()).await.unwrap();
        broker.publish("orders", b"two".to_vec()).await.unwrap();

        let for_a = broker.fetch("orders", "sub-a").await.unwrap();
        let for_b = broker.fetch("orders", "sub-b").await.unwrap();
        assert_eq!(for_a, vec![b"one".to_vec(), b"two".to_vec()]);
        assert_eq!(for_b, for_a);
    }

    #[tokio::test]
    async fn test_fetch_drains_the_buffer() {
        let broker = Broker::new("alpha");
        broker.register_queue("orders").await.unwrap();
        broker.attach_subscriber("orders", "sub-a").await.unwrap();
        broker.publish("orders", b"one".to_vec()).await.unwrap();

        assert_eq!(broker.fetch("orders", "sub-a").await.unwrap().len(), 1);
        assert!(broker.fetch("orders", "sub-a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_attach_is_idempotent_and_keeps_pending_payloads() {
        let broker = Broker::new("alpha");
        broker.register_queue("orders").await.unwrap();
        broker.attach_subscriber("orders", "sub-a").await.unwrap();
        broker.publish("orders", b"one".to_vec()).await.unwrap();

        broker.attach_subscriber("orders", "sub-a").await.unwrap();
        assert_eq!(broker.fetch("orders", "sub-a").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_queue_is_rejected() {
        let broker = Broker::new("alpha");
        let err = broker.publish("ghost", b"one".to_vec()).await.unwrap_err();
        assert!(matches!(err, BrokerError::UnknownQueue(queue) if queue == "ghost"));
    }

    #[tokio::test]
    async fn test_duplicate_queue_is_rejected() {
        let broker = Broker::new("alpha");
        broker.register_queue("orders").await.unwrap();
        let err = broker.register_queue("orders").await.unwrap_err();
        assert!(matches!(err, BrokerError::DuplicateQueue(_)));
    }

    #[tokio::test]
    async fn test_fetch_for_unattached_subscriber_is_rejected() {
        let broker = Broker::new("alpha");
        broker.register_queue("orders").await.unwrap();
        let err = broker.fetch("orders", "ghost").await.unwrap_err();
        assert!(matches!(err, BrokerError::UnknownSubscriber { .. }));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let broker = Broker::new("alpha");
        broker.register_queue("orders").await.unwrap();
        broker.publish("orders", b"one".to_vec()).await.unwrap();

        broker.attach_subscriber("orders", "late").await.unwrap();
        assert!(broker.fetch("orders", "late").await.unwrap().is_empty());
    }
}
