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

//! Registry of named broker instances

use crate::broker::Broker;
use crate::error::BrokerError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Explicitly created owner of named [`Broker`] instances
///
/// There is no process-global registry and no implicit instance creation:
/// whoever owns the `Arc<BrokerRegistry>` decides which producers and
/// consumers share a broker. Two registries never see each other's
/// instances.
#[derive(Default)]
pub struct BrokerRegistry {
    instances: RwLock<HashMap<String, Arc<Broker>>>,
}

impl BrokerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a broker instance under a name.
    ///
    /// ## Errors
    /// - [`BrokerError::DuplicateInstance`]: the name is taken
    pub async fn create_instance(&self, name: &str) -> Result<Arc<Broker>, BrokerError> {
        let mut instances = self.instances.write().await;
        if instances.contains_key(name) {
            return Err(BrokerError::DuplicateInstance(name.to_string()));
        }
        let broker = Arc::new(Broker::new(name));
        instances.insert(name.to_string(), Arc::clone(&broker));
        info!(instance = %name, "Messaging instance created");
        Ok(broker)
    }

    /// Look up an instance by name.
    ///
    /// ## Errors
    /// - [`BrokerError::UnknownInstance`]: no instance has this name
    pub async fn instance(&self, name: &str) -> Result<Arc<Broker>, BrokerError> {
        self.instances
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| BrokerError::UnknownInstance(name.to_string()))
    }

    /// Remove an instance from the registry.
    ///
    /// Existing connectors holding the `Arc<Broker>` keep working; the
    /// instance just cannot be looked up any more.
    ///
    /// ## Errors
    /// - [`BrokerError::UnknownInstance`]: no instance has this name
    pub async fn drop_instance(&self, name: &str) -> Result<(), BrokerError> {
        if self.instances.write().await.remove(name).is_none() {
            return Err(BrokerError::UnknownInstance(name.to_string()));
        }
        info!(instance = %name, "Messaging instance dropped");
        Ok(())
    }

    /// Names of all registered instances.
    pub async fn instance_names(&self) -> Vec<String> {
        self.instances.read().await.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_instance_is_rejected() {
        let registry = BrokerRegistry::new();
        registry.create_instance("alpha").await.unwrap();
        let err = registry.create_instance("alpha").await.unwrap_err();
        assert!(matches!(err, BrokerError::DuplicateInstance(name) if name == "alpha"));
    }

    #[tokio::test]
    async fn test_unknown_instance_is_rejected() {
        let registry = BrokerRegistry::new();
        let err = registry.instance("ghost").await.unwrap_err();
        assert!(matches!(err, BrokerError::UnknownInstance(_)));
    }

    #[tokio::test]
    async fn test_drop_forgets_the_instance() {
        let registry = BrokerRegistry::new();
        registry.create_instance("alpha").await.unwrap();
        registry.drop_instance("alpha").await.unwrap();

        assert!(registry.instance("alpha").await.is_err());
        assert!(registry.instance_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_instances_are_isolated_per_registry() {
        let first = BrokerRegistry::new();
        let second = BrokerRegistry::new();
        first.create_instance("alpha").await.unwrap();

        assert!(second.instance("alpha").await.is_err());
        second.create_instance("alpha").await.unwrap();
    }
}
