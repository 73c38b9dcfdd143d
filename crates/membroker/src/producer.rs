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

//! Producing-side connector for the in-process broker

use crate::broker::Broker;
use async_trait::async_trait;
use anymq_interface::{Message, TransportError, TransportProducer};
use std::sync::Arc;
use tracing::{debug, warn};

/// Producer publishing encoded messages to one queue of an in-process
/// broker
pub struct MemBrokerProducer {
    broker: Arc<Broker>,
    queue: String,
    closed: bool,
}

impl MemBrokerProducer {
    pub(crate) fn new(broker: Arc<Broker>, queue: String) -> Self {
        Self {
            broker,
            queue,
            closed: false,
        }
    }
}

#[async_trait]
impl TransportProducer for MemBrokerProducer {
    async fn send(&self, message: &dyn Message) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        let payload = message
            .encode()
            .map_err(|err| TransportError::SendFailed(format!("encoding failed: {err}")))?;
        self.broker
            .publish(&self.queue, payload)
            .await
            .map_err(|err| TransportError::SendFailed(err.to_string()))?;
        debug!(queue = %self.queue, message_id = %message.id(), "Message published");
        Ok(())
    }

    async fn send_keyed(&self, key: &str, message: &dyn Message) -> Result<(), TransportError> {
        // The broker has no partitions, so the key selects nothing.
        warn!(
            key = %key,
            queue = %self.queue,
            "In-process broker ignores the partitioning key"
        );
        self.send(message).await
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closed = true;
        debug!(queue = %self.queue, "Producer closed");
        Ok(())
    }
}
