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

//! Consumer runtime: the application-facing consuming surface

use super::channel::{open_channel, ChannelHandle};
use crate::config::MessagingConfig;
use crate::error::SetupError;
use crate::transport::TransportRegistry;
use anymq_interface::{MessageCodec, MessageHandler};
use std::sync::Arc;
use tracing::{info, instrument};

/// Owns every consumption channel an application opens
///
/// ## Purpose
/// One runtime is constructed per application (or per test), from a loaded
/// [`MessagingConfig`] and a [`TransportRegistry`] holding the connector
/// factories for the backend systems the config names. There is no hidden
/// global instance; everything a channel needs travels through the runtime
/// that opened it.
///
/// ## Examples
/// ```rust
/// use anymq_core::{ConsumerRuntime, MessagingConfig, TransportRegistry};
/// use std::sync::Arc;
///
/// let yaml = r#"
/// profiles:
///   - name: orders-local
///     system: membroker
///     consumer:
///       max_messages_per_batch: 10
///       max_poll_interval_ms: 5000
/// "#;
/// let config = MessagingConfig::from_yaml_str(yaml)?;
/// let runtime = ConsumerRuntime::new(config, Arc::new(TransportRegistry::new()));
/// assert_eq!(runtime.config().profiles.len(), 1);
/// # Ok::<(), anymq_core::ConfigError>(())
/// ```
pub struct ConsumerRuntime {
    config: MessagingConfig,
    registry: Arc<TransportRegistry>,
    channels: Vec<ChannelHandle>,
}

impl ConsumerRuntime {
    /// Create a runtime over a loaded configuration and connector registry.
    pub fn new(config: MessagingConfig, registry: Arc<TransportRegistry>) -> Self {
        Self { config, registry, channels: Vec::new() }
    }

    /// The configuration this runtime resolves profiles against.
    pub fn config(&self) -> &MessagingConfig {
        &self.config
    }

    /// Open a consumption channel for one profile and queue.
    ///
    /// Resolves the profile, builds the transport consumer through the
    /// registered factory, waits for the channel handshake (bounded by the
    /// profile's `handshake_timeout_ms`), and starts the first poll round.
    /// Messages begin flowing into `handler` before this returns.
    ///
    /// ## Errors
    /// - [`SetupError::Config`]: the profile is unknown or has no
    ///   consumer section
    /// - [`SetupError::UnknownSystem`]: no consumer factory is registered
    ///   for the profile's system
    /// - [`SetupError::Transport`]: the connector could not be built
    /// - [`SetupError::HandshakeTimeout`]: the channel units never finished
    ///   their handshake
    #[instrument(skip_all, fields(profile = %profile, queue = %queue))]
    pub async fn setup_consumer(
        &mut self,
        profile: &str,
        queue: &str,
        codec: Arc<dyn MessageCodec>,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<ChannelHandle, SetupError> {
        let resolved = self.config.profile(profile)?;
        let settings = resolved.consumer_settings()?.clone();
        let system = resolved.system.clone();
        let channel_id = format!("{system}:{profile}:{queue}");

        let factory = self
            .registry
            .consumer_factory(&system)
            .ok_or_else(|| SetupError::UnknownSystem(system.clone()))?;

        let pending = open_channel(
            channel_id.clone(),
            queue.to_string(),
            settings.clone(),
            factory,
            codec,
            handler,
        )
        .await?;
        let handle = pending.ready(settings.handshake_timeout()).await?;

        // First poll round; the channel keeps the cycle going from here.
        handle.start(settings.poll_batch_limit);
        info!(channel_id = %channel_id, "Consumer channel ready");

        self.channels.push(handle.clone());
        Ok(handle)
    }

    /// Shut down every channel this runtime opened.
    pub fn shutdown(&self) {
        info!(channels = self.channels.len(), "Shutting down consumer runtime");
        for channel in &self.channels {
            channel.shutdown();
        }
    }
}
