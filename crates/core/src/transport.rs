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

//! Transport connector factories and their registry
//!
//! A profile names a `system`; the registry maps that name to the factory
//! that builds the actual connector. Connectors register explicitly;
//! there is no implicit discovery.

use crate::config::{ConsumerSettings, ProducerSettings};
use anymq_interface::{MessageCodec, MessageSink, TransportConsumer, TransportError, TransportProducer};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a factory needs to build the consuming side of one channel
pub struct ConsumerSpec {
    /// Channel identifier, for logs and error context
    pub channel_id: String,
    /// Queue (or topic) to consume from
    pub queue: String,
    /// Profile consumer settings, including connector properties
    pub settings: ConsumerSettings,
    /// Codec turning raw payloads into messages
    pub codec: Arc<dyn MessageCodec>,
    /// Pipeline endpoint decoded messages are delivered into
    pub sink: Arc<dyn MessageSink>,
}

/// Everything a factory needs to build the producing side for one queue
pub struct ProducerSpec {
    /// Queue (or topic) to produce to
    pub queue: String,
    /// Profile producer settings, including connector properties
    pub settings: ProducerSettings,
}

/// Builds transport consumers for one backend system
#[async_trait]
pub trait ConsumerFactory: Send + Sync {
    /// System name this factory serves, the registry key.
    fn system(&self) -> &str;

    /// Build a consumer bound to the spec's queue and sink.
    ///
    /// ## Errors
    /// - [`TransportError::InvalidConfiguration`]: required connector
    ///   properties are missing or malformed
    /// - [`TransportError::ConnectionFailed`]: the backend rejected the
    ///   connection
    async fn build_consumer(
        &self,
        spec: ConsumerSpec,
    ) -> Result<Box<dyn TransportConsumer>, TransportError>;
}

/// Builds transport producers for one backend system
#[async_trait]
pub trait ProducerFactory: Send + Sync {
    /// System name this factory serves, the registry key.
    fn system(&self) -> &str;

    /// Build a producer bound to the spec's queue.
    async fn build_producer(
        &self,
        spec: ProducerSpec,
    ) -> Result<Box<dyn TransportProducer>, TransportError>;
}

/// Registry of transport connector factories keyed by system name
///
/// ## Examples
/// ```rust
/// use anymq_core::TransportRegistry;
///
/// let registry = TransportRegistry::new();
/// assert!(registry.consumer_factory("membroker").is_none());
/// ```
#[derive(Default)]
pub struct TransportRegistry {
    consumers: HashMap<String, Arc<dyn ConsumerFactory>>,
    producers: HashMap<String, Arc<dyn ProducerFactory>>,
}

impl TransportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a consumer factory under its system name, replacing any
    /// previous registration for that name.
    pub fn register_consumer(&mut self, factory: Arc<dyn ConsumerFactory>) {
        self.consumers.insert(factory.system().to_string(), factory);
    }

    /// Register a producer factory under its system name.
    pub fn register_producer(&mut self, factory: Arc<dyn ProducerFactory>) {
        self.producers.insert(factory.system().to_string(), factory);
    }

    /// Consumer factory for a system name, if registered.
    pub fn consumer_factory(&self, system: &str) -> Option<Arc<dyn ConsumerFactory>> {
        self.consumers.get(system).cloned()
    }

    /// Producer factory for a system name, if registered.
    pub fn producer_factory(&self, system: &str) -> Option<Arc<dyn ProducerFactory>> {
        self.producers.get(system).cloned()
    }
}
