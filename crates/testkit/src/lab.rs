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

//! Self-contained messaging lab over the in-process broker

use crate::error::LabError;
use crate::probe::MessageProbe;
use crate::retention::{RetainedMessages, RetentionHandler};
use anymq_core::{ConsumerRuntime, MessageProducer, MessagingConfig, TransportRegistry};
use anymq_membroker::{BrokerError, BrokerRegistry, MemBrokerTransport, PROP_INSTANCE, SYSTEM_NAME};
use anymq_simplemessage::SimpleMessageCodec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// A complete messaging setup for one test: broker, consumers, producers
///
/// `start` reads the broker instances out of the listed profiles, creates
/// them with their queues, and opens a listening channel with a
/// [`RetentionHandler`] per `(profile, queue)` pair. Tests then publish
/// through [`TestLab::producer`] and assert over [`TestLab::probe`]
/// snapshots.
///
/// Queues carry [`anymq_simplemessage::SimpleMessage`] payloads; the lab
/// attaches that codec to every listening channel.
pub struct TestLab {
    brokers: Arc<BrokerRegistry>,
    registry: Arc<TransportRegistry>,
    runtime: ConsumerRuntime,
    retained: HashMap<(String, String), RetainedMessages>,
}

impl std::fmt::Debug for TestLab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestLab").finish_non_exhaustive()
    }
}

impl TestLab {
    /// Stand up a lab for the given listeners.
    ///
    /// Each listener is a `(profile, queue)` pair; profiles must target
    /// the in-process broker. Instances and queues shared between
    /// listeners are created once.
    ///
    /// ## Errors
    /// - [`LabError::UnsupportedSystem`]: a profile names another backend
    /// - [`LabError::Config`]: a profile is missing or incomplete
    /// - [`LabError::Setup`]: a listening channel could not be opened
    pub async fn start(
        config: MessagingConfig,
        listeners: &[(&str, &str)],
    ) -> Result<Self, LabError> {
        info!(listeners = listeners.len(), "Starting messaging lab");
        let brokers = Arc::new(BrokerRegistry::new());
        let transport = Arc::new(MemBrokerTransport::new(Arc::clone(&brokers)));
        let mut registry = TransportRegistry::new();
        registry.register_consumer(Arc::clone(&transport) as _);
        registry.register_producer(transport);
        let registry = Arc::new(registry);

        for (profile_name, queue) in listeners {
            let profile = config.profile(profile_name)?;
            if profile.system != SYSTEM_NAME {
                return Err(LabError::UnsupportedSystem(profile_name.to_string()));
            }
            let instance = profile
                .consumer_settings()?
                .properties
                .str_prop(PROP_INSTANCE)?
                .to_string();

            let broker = match brokers.create_instance(&instance).await {
                Ok(broker) => broker,
                Err(BrokerError::DuplicateInstance(_)) => brokers.instance(&instance).await?,
                Err(err) => return Err(err.into()),
            };
            match broker.register_queue(queue).await {
                Ok(()) | Err(BrokerError::DuplicateQueue(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        let mut runtime = ConsumerRuntime::new(config, Arc::clone(&registry));
        let mut retained = HashMap::new();
        for (profile_name, queue) in listeners {
            let handler = RetentionHandler::new();
            let buffer = handler.retained();
            runtime
                .setup_consumer(
                    profile_name,
                    queue,
                    Arc::new(SimpleMessageCodec::new()),
                    Arc::new(handler),
                )
                .await?;
            retained.insert((profile_name.to_string(), queue.to_string()), buffer);
        }

        Ok(Self {
            brokers,
            registry,
            runtime,
            retained,
        })
    }

    /// Connect a producer for a profile's queue.
    ///
    /// ## Errors
    /// - [`LabError::Setup`]: the profile has no producer section or the
    ///   connector could not be built
    pub async fn producer(&self, profile: &str, queue: &str) -> Result<MessageProducer, LabError> {
        let producer =
            MessageProducer::connect(self.runtime.config(), &self.registry, profile, queue).await?;
        Ok(producer)
    }

    /// Wait for in-flight messages to settle, then snapshot a listener's
    /// retention buffer.
    ///
    /// ## Errors
    /// - [`LabError::UnknownListener`]: `start` was not given this
    ///   `(profile, queue)` pair
    pub async fn probe(
        &self,
        profile: &str,
        queue: &str,
        settle: Duration,
    ) -> Result<MessageProbe, LabError> {
        let buffer = self
            .retained
            .get(&(profile.to_string(), queue.to_string()))
            .ok_or_else(|| LabError::UnknownListener {
                profile: profile.to_string(),
                queue: queue.to_string(),
            })?;
        tokio::time::sleep(settle).await;
        let snapshot = buffer.lock().await.clone();
        Ok(MessageProbe::new(snapshot))
    }

    /// Broker registry backing this lab, for direct inspection.
    pub fn brokers(&self) -> &Arc<BrokerRegistry> {
        &self.brokers
    }

    /// Shut down every listening channel.
    pub fn shutdown(&self) {
        self.runtime.shutdown();
    }
}
