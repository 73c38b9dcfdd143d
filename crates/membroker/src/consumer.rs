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

//! Consuming-side connector for the in-process broker

use crate::broker::Broker;
use async_trait::async_trait;
use anymq_interface::{MessageCodec, MessageSink, TransportConsumer, TransportError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Consumer fetching from one subscriber buffer of an in-process broker
///
/// `start_polling` spawns a fetch loop that drains the buffer every fetch
/// interval, decodes each payload, and delivers into the sink.
/// `stop_polling` signals the loop and waits for it to finish, so an
/// in-flight fetch completes before the call returns. Both are idempotent.
pub struct MemBrokerConsumer {
    channel_id: String,
    broker: Arc<Broker>,
    queue: String,
    subscriber_id: String,
    fetch_interval: Duration,
    codec: Arc<dyn MessageCodec>,
    sink: Arc<dyn MessageSink>,
    fetch_loop: Option<FetchLoop>,
}

struct FetchLoop {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MemBrokerConsumer {
    pub(crate) fn new(
        channel_id: String,
        broker: Arc<Broker>,
        queue: String,
        subscriber_id: String,
        fetch_interval: Duration,
        codec: Arc<dyn MessageCodec>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            channel_id,
            broker,
            queue,
            subscriber_id,
            fetch_interval,
            codec,
            sink,
            fetch_loop: None,
        }
    }

    /// Subscriber id this consumer fetches under.
    pub fn subscriber_id(&self) -> &str {
        &self.subscriber_id
    }
}

#[async_trait]
impl TransportConsumer for MemBrokerConsumer {
    async fn start_polling(&mut self) -> Result<(), TransportError> {
        if self.fetch_loop.is_some() {
            return Ok(());
        }
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let broker = Arc::clone(&self.broker);
        let codec = Arc::clone(&self.codec);
        let sink = Arc::clone(&self.sink);
        let queue = self.queue.clone();
        let subscriber_id = self.subscriber_id.clone();
        let channel_id = self.channel_id.clone();
        let fetch_interval = self.fetch_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(fetch_interval);
            loop {
                tokio::select! {
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        fetch_once(
                            &broker,
                            &queue,
                            &subscriber_id,
                            codec.as_ref(),
                            sink.as_ref(),
                            &channel_id,
                        )
                        .await;
                    }
                }
            }
            debug!(channel_id = %channel_id, "Fetch loop stopped");
        });

        self.fetch_loop = Some(FetchLoop {
            stop: stop_tx,
            task,
        });
        debug!(
            channel_id = %self.channel_id,
            subscriber_id = %self.subscriber_id,
            "Fetch loop started"
        );
        Ok(())
    }

    async fn stop_polling(&mut self) -> Result<(), TransportError> {
        let Some(fetch_loop) = self.fetch_loop.take() else {
            return Ok(());
        };
        let _ = fetch_loop.stop.send(true);
        fetch_loop.task.await.map_err(|err| {
            TransportError::PollingFailed(format!("fetch loop did not stop cleanly: {err}"))
        })
    }
}

/// One pass of the fetch loop: drain the subscriber buffer and deliver
/// whatever decodes. A payload the codec rejects is logged and skipped;
/// it must not stall the loop.
async fn fetch_once(
    broker: &Broker,
    queue: &str,
    subscriber_id: &str,
    codec: &dyn MessageCodec,
    sink: &dyn MessageSink,
    channel_id: &str,
) {
    let payloads = match broker.fetch(queue, subscriber_id).await {
        Ok(payloads) => payloads,
        Err(err) => {
            warn!(error = %err, channel_id = %channel_id, "Broker fetch failed");
            return;
        }
    };
    for payload in payloads {
        match codec.decode(&payload) {
            Ok(message) => sink.deliver(message),
            Err(err) => {
                metrics::counter!("anymq_decode_failures_total").increment(1);
                warn!(error = %err, channel_id = %channel_id, "Dropping undecodable payload");
            }
        }
    }
}
