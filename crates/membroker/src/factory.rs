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

//! Transport factories wiring profiles to broker instances

use crate::broker::Broker;
use crate::consumer::MemBrokerConsumer;
use crate::producer::MemBrokerProducer;
use crate::registry::BrokerRegistry;
use async_trait::async_trait;
use anymq_core::{ConfigError, ConsumerFactory, ConsumerSpec, ProducerFactory, ProducerSpec};
use anymq_interface::{TransportConsumer, TransportError, TransportProducer};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// System name profiles use to select this transport.
pub const SYSTEM_NAME: &str = "membroker";

/// Profile property naming the broker instance to connect to.
pub const PROP_INSTANCE: &str = "instance";

/// Profile property naming the consuming application; part of the
/// subscriber id.
pub const PROP_APPLICATION_ID: &str = "application_id";

/// Optional profile property tuning the consumer fetch cadence.
pub const PROP_FETCH_INTERVAL_MS: &str = "fetch_interval_ms";

/// Fetch cadence used when the profile does not set one.
pub const DEFAULT_FETCH_INTERVAL_MS: u64 = 50;

/// Factory building in-process broker connectors
///
/// Implements both [`ConsumerFactory`] and [`ProducerFactory`] over a
/// shared [`BrokerRegistry`]; register one under each role:
///
/// ```rust
/// use anymq_core::TransportRegistry;
/// use anymq_membroker::{BrokerRegistry, MemBrokerTransport};
/// use std::sync::Arc;
///
/// let brokers = Arc::new(BrokerRegistry::new());
/// let transport = Arc::new(MemBrokerTransport::new(Arc::clone(&brokers)));
///
/// let mut registry = TransportRegistry::new();
/// registry.register_consumer(Arc::clone(&transport) as _);
/// registry.register_producer(transport);
/// ```
pub struct MemBrokerTransport {
    registry: Arc<BrokerRegistry>,
}

impl MemBrokerTransport {
    /// Create a factory over a broker registry.
    pub fn new(registry: Arc<BrokerRegistry>) -> Self {
        Self { registry }
    }

    async fn broker_for(&self, instance: &str) -> Result<Arc<Broker>, TransportError> {
        self.registry
            .instance(instance)
            .await
            .map_err(|err| TransportError::ConnectionFailed(err.to_string()))
    }
}

fn bad_property(err: ConfigError) -> TransportError {
    TransportError::InvalidConfiguration(err.to_string())
}

#[async_trait]
impl ConsumerFactory for MemBrokerTransport {
    fn system(&self) -> &str {
        SYSTEM_NAME
    }

    async fn build_consumer(
        &self,
        spec: ConsumerSpec,
    ) -> Result<Box<dyn TransportConsumer>, TransportError> {
        let properties = &spec.settings.properties;
        let instance = properties.str_prop(PROP_INSTANCE).map_err(bad_property)?;
        let application_id = properties
            .str_prop(PROP_APPLICATION_ID)
            .map_err(bad_property)?;
        let fetch_interval_ms = properties
            .u64_prop_or(PROP_FETCH_INTERVAL_MS, DEFAULT_FETCH_INTERVAL_MS)
            .map_err(bad_property)?;

        let broker = self.broker_for(instance).await?;
        let subscriber_id = format!("consumer_{application_id}_{}", spec.queue);
        broker
            .attach_subscriber(&spec.queue, &subscriber_id)
            .await
            .map_err(|err| TransportError::ConnectionFailed(err.to_string()))?;

        debug!(
            channel_id = %spec.channel_id,
            instance = %instance,
            subscriber_id = %subscriber_id,
            "Broker consumer built"
        );
        Ok(Box::new(MemBrokerConsumer::new(
            spec.channel_id,
            broker,
            spec.queue,
            subscriber_id,
            Duration::from_millis(fetch_interval_ms),
            spec.codec,
            spec.sink,
        )))
    }
}

#[async_trait]
impl ProducerFactory for MemBrokerTransport {
    fn system(&self) -> &str {
        SYSTEM_NAME
    }

    async fn build_producer(
        &self,
        spec: ProducerSpec,
    ) -> Result<Box<dyn TransportProducer>, TransportError> {
        let instance = spec
            .settings
            .properties
            .str_prop(PROP_INSTANCE)
            .map_err(bad_property)?;
        let broker = self.broker_for(instance).await?;
        debug!(instance = %instance, queue = %spec.queue, "Broker producer built");
        Ok(Box::new(MemBrokerProducer::new(broker, spec.queue)))
    }
}
