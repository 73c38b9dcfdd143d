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

//! Producer client: finalize, then hand to the transport

use crate::config::MessagingConfig;
use crate::error::{ProduceError, SetupError};
use crate::transport::{ProducerSpec, TransportRegistry};
use anymq_interface::{Message, TransportProducer};
use tracing::debug;

/// Producer bound to one profile and queue
///
/// ## Purpose
/// The sending counterpart of the consumption pipeline. Every message
/// passes through its [`Message::finalize`] build hook immediately before
/// encoding and transport hand-off, so identifiers and timestamps are
/// stamped at send time, not at construction time.
///
/// A closed producer rejects further sends with [`ProduceError::Closed`].
pub struct MessageProducer {
    queue: String,
    transport: Option<Box<dyn TransportProducer>>,
}

impl std::fmt::Debug for MessageProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageProducer")
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

impl MessageProducer {
    /// Resolve `profile`, build its transport producer, and connect.
    ///
    /// ## Errors
    /// - [`SetupError::Config`]: the profile is unknown or has no
    ///   producer section
    /// - [`SetupError::UnknownSystem`]: no producer factory is registered
    ///   for the profile's system
    /// - [`SetupError::Transport`]: the connector could not be built
    pub async fn connect(
        config: &MessagingConfig,
        registry: &TransportRegistry,
        profile: &str,
        queue: &str,
    ) -> Result<Self, SetupError> {
        let resolved = config.profile(profile)?;
        let settings = resolved.producer_settings()?.clone();
        let system = resolved.system.clone();

        let factory = registry
            .producer_factory(&system)
            .ok_or_else(|| SetupError::UnknownSystem(system.clone()))?;
        let transport = factory
            .build_producer(ProducerSpec { queue: queue.to_string(), settings })
            .await?;

        debug!(system = %system, profile = %profile, queue = %queue, "Producer connected");
        Ok(Self { queue: queue.to_string(), transport: Some(transport) })
    }

    /// Finalize and send one message.
    pub async fn send(&self, mut message: Box<dyn Message>) -> Result<(), ProduceError> {
        message.finalize()?;
        let transport = self.transport.as_ref().ok_or(ProduceError::Closed)?;
        transport.send(message.as_ref()).await?;
        metrics::counter!("anymq_messages_sent_total").increment(1);
        debug!(queue = %self.queue, message_id = %message.id(), "Message sent");
        Ok(())
    }

    /// Finalize and send one message under an explicit partitioning key.
    pub async fn send_keyed(&self, key: &str, mut message: Box<dyn Message>) -> Result<(), ProduceError> {
        message.finalize()?;
        let transport = self.transport.as_ref().ok_or(ProduceError::Closed)?;
        transport.send_keyed(key, message.as_ref()).await?;
        metrics::counter!("anymq_messages_sent_total").increment(1);
        debug!(queue = %self.queue, message_id = %message.id(), key = %key, "Message sent");
        Ok(())
    }

    /// Release the transport. Idempotent; later sends fail with
    /// [`ProduceError::Closed`].
    pub async fn close(&mut self) -> Result<(), ProduceError> {
        if let Some(mut transport) = self.transport.take() {
            transport.close().await?;
            debug!(queue = %self.queue, "Producer closed");
        }
        Ok(())
    }
}
