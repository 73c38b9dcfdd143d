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

//! YAML configuration profiles
//!
//! A messaging configuration is a list of named profiles. Each profile
//! binds a transport system to consumer and producer settings, with a
//! free-form property map the connector interprets.
//!
//! ```yaml
//! profiles:
//!   - name: orders-local
//!     system: membroker
//!     consumer:
//!       max_messages_per_batch: 10
//!       max_poll_interval_ms: 5000
//!       properties:
//!         instance: alpha
//!         application_id: orders-app
//!     producer:
//!       properties:
//!         instance: alpha
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Poll limit used for the first round and every re-poll when the profile
/// does not override it.
pub const DEFAULT_POLL_BATCH_LIMIT: usize = 3;

/// How long channel setup waits for the unit handshake before failing.
pub const DEFAULT_HANDSHAKE_TIMEOUT_MS: u64 = 10_000;

/// Errors raised while loading or querying configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// No profile with the requested name
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    /// Profile lacks the requested section
    #[error("Profile {profile} has no {section} section")]
    MissingSection {
        /// Profile name
        profile: String,
        /// Section name, `consumer` or `producer`
        section: &'static str,
    },

    /// Required connector property is absent
    #[error("Missing property: {0}")]
    MissingProperty(String),

    /// Connector property has the wrong type
    #[error("Invalid property {key}: expected {expected}")]
    InvalidProperty {
        /// Property key
        key: String,
        /// Expected scalar type
        expected: &'static str,
    },
}

/// Root configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// All configured profiles
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl MessagingConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Look up a profile by name.
    ///
    /// ## Errors
    /// - [`ConfigError::UnknownProfile`]: no profile with that name
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .iter()
            .find(|profile| profile.name == name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))
    }
}

/// One named binding of a transport system to channel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name, referenced at setup time
    pub name: String,
    /// Transport system name, resolved through the registry
    pub system: String,
    /// Consuming-side settings, absent for produce-only profiles
    #[serde(default)]
    pub consumer: Option<ConsumerSettings>,
    /// Producing-side settings, absent for consume-only profiles
    #[serde(default)]
    pub producer: Option<ProducerSettings>,
}

impl Profile {
    /// Consumer settings, or an error when this profile has none.
    pub fn consumer_settings(&self) -> Result<&ConsumerSettings, ConfigError> {
        self.consumer.as_ref().ok_or_else(|| ConfigError::MissingSection {
            profile: self.name.clone(),
            section: "consumer",
        })
    }

    /// Producer settings, or an error when this profile has none.
    pub fn producer_settings(&self) -> Result<&ProducerSettings, ConfigError> {
        self.producer.as_ref().ok_or_else(|| ConfigError::MissingSection {
            profile: self.name.clone(),
            section: "producer",
        })
    }
}

/// Consuming-side settings of a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerSettings {
    /// Buffer size at which the session flushes without waiting for the
    /// poll deadline
    pub max_messages_per_batch: usize,
    /// Poll round deadline in milliseconds
    pub max_poll_interval_ms: u64,
    /// Poll limit for the first round and every re-poll
    #[serde(default = "default_poll_batch_limit")]
    pub poll_batch_limit: usize,
    /// Handshake wait during channel setup, in milliseconds
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,
    /// Connector-specific properties
    #[serde(default)]
    pub properties: PropertyMap,
}

impl ConsumerSettings {
    /// Poll round deadline as a [`Duration`].
    pub fn max_poll_interval(&self) -> Duration {
        Duration::from_millis(self.max_poll_interval_ms)
    }

    /// Handshake wait as a [`Duration`].
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

fn default_poll_batch_limit() -> usize {
    DEFAULT_POLL_BATCH_LIMIT
}

fn default_handshake_timeout_ms() -> u64 {
    DEFAULT_HANDSHAKE_TIMEOUT_MS
}

/// Producing-side settings of a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProducerSettings {
    /// Connector-specific properties
    #[serde(default)]
    pub properties: PropertyMap,
}

/// String-keyed scalar properties forwarded to transport connectors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(HashMap<String, serde_yaml::Value>);

impl PropertyMap {
    /// Insert or replace a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw property value, if present.
    pub fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.0.get(key)
    }

    /// Required string property.
    ///
    /// ## Errors
    /// - [`ConfigError::MissingProperty`]: key absent
    /// - [`ConfigError::InvalidProperty`]: value is not a string
    pub fn str_prop(&self, key: &str) -> Result<&str, ConfigError> {
        self.0
            .get(key)
            .ok_or_else(|| ConfigError::MissingProperty(key.to_string()))?
            .as_str()
            .ok_or_else(|| ConfigError::InvalidProperty {
                key: key.to_string(),
                expected: "string",
            })
    }

    /// Required unsigned integer property.
    pub fn u64_prop(&self, key: &str) -> Result<u64, ConfigError> {
        self.0
            .get(key)
            .ok_or_else(|| ConfigError::MissingProperty(key.to_string()))?
            .as_u64()
            .ok_or_else(|| ConfigError::InvalidProperty {
                key: key.to_string(),
                expected: "unsigned integer",
            })
    }

    /// Unsigned integer property with a fallback for absence. A present
    /// value of the wrong type is still an error.
    pub fn u64_prop_or(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        match self.0.get(key) {
            None => Ok(default),
            Some(value) => value.as_u64().ok_or_else(|| ConfigError::InvalidProperty {
                key: key.to_string(),
                expected: "unsigned integer",
            }),
        }
    }
}
