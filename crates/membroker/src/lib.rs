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

//! # anymq-membroker
//!
//! ## Purpose
//! An in-process message broker with anymq transport connectors. It backs
//! integration tests and single-process deployments with real broker
//! semantics (named instances, registered queues, per-subscriber fan-out)
//! without any external infrastructure.
//!
//! ## Architecture Context
//! ```text
//!   MessageProducer ──▶ MemBrokerProducer ─┐
//!                                          ▼
//!                        Broker (queue ▶ subscriber buffers)
//!                                          │ fetch every interval
//!                                          ▼
//!   consumption pipeline ◀── MemBrokerConsumer (decode + deliver)
//! ```
//!
//! ## Key Components
//! - [`BrokerRegistry`]: explicitly created owner of named [`Broker`]
//!   instances
//! - [`Broker`]: queues with per-subscriber byte buffers; publish fans
//!   out, fetch drains
//! - [`MemBrokerTransport`]: [`anymq_core::ConsumerFactory`] and
//!   [`anymq_core::ProducerFactory`] over an `Arc<BrokerRegistry>`
//!
//! ## Design Decisions
//! - **No global state**: brokers live in whatever registry the caller
//!   creates and shares; two registries never see each other's instances.
//! - **Fan-out on publish**: every subscriber of a queue gets its own copy,
//!   so independent consumer groups each see the full stream.
//! - **Stop waits for the loop**: `stop_polling` joins the fetch task, so
//!   no delivery races past the stop call.
//!
//! ## Errors
//! Broker operations return [`BrokerError`]; the connectors translate
//! registry and property failures into
//! [`anymq_interface::TransportError`].
//!
//! ## Examples
//! ```rust
//! use anymq_membroker::BrokerRegistry;
//!
//! # async fn demo() -> Result<(), anymq_membroker::BrokerError> {
//! let registry = BrokerRegistry::new();
//! let broker = registry.create_instance("alpha").await?;
//! broker.register_queue("orders").await?;
//! broker.attach_subscriber("orders", "consumer_app_orders").await?;
//!
//! broker.publish("orders", b"payload".to_vec()).await?;
//! let pending = broker.fetch("orders", "consumer_app_orders").await?;
//! assert_eq!(pending.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod broker;
mod consumer;
mod error;
mod factory;
mod producer;
mod registry;

pub use broker::Broker;
pub use consumer::MemBrokerConsumer;
pub use error::BrokerError;
pub use factory::{
    MemBrokerTransport, DEFAULT_FETCH_INTERVAL_MS, PROP_APPLICATION_ID, PROP_FETCH_INTERVAL_MS,
    PROP_INSTANCE, SYSTEM_NAME,
};
pub use producer::MemBrokerProducer;
pub use registry::BrokerRegistry;
