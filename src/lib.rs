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

//! anymq: pluggable messaging with an ordered-dispatch consumption
//! pipeline
//!
//! Applications describe their queues in profiles, pick a transport
//! system per profile, and hand anymq a handler. The consumption
//! pipeline batches what the transport delivers, then dispatches with
//! strict per-group ordering: messages sharing a correlation group are
//! handled one at a time in arrival order, everything else runs in
//! parallel.
//!
//! ## Examples
//! ```rust,no_run
//! use anymq::{ConsumerRuntime, MessagingConfig, TransportRegistry};
//! use anymq::membroker::{BrokerRegistry, MemBrokerTransport};
//! use anymq::simplemessage::SimpleMessageCodec;
//! use std::sync::Arc;
//!
//! # async fn demo(
//! #     config: MessagingConfig,
//! #     handler: Arc<dyn anymq::MessageHandler>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let brokers = Arc::new(BrokerRegistry::new());
//! brokers.create_instance("alpha").await?;
//!
//! let transport = Arc::new(MemBrokerTransport::new(Arc::clone(&brokers)));
//! let mut registry = TransportRegistry::new();
//! registry.register_consumer(Arc::clone(&transport) as _);
//! registry.register_producer(transport);
//!
//! let mut runtime = ConsumerRuntime::new(config, Arc::new(registry));
//! let channel = runtime
//!     .setup_consumer(
//!         "orders-local",
//!         "orders",
//!         Arc::new(SimpleMessageCodec::new()),
//!         handler,
//!     )
//!     .await?;
//! # let _ = channel;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Independent crates - re-export them here
pub use anymq_core as core; // Pipeline, producer, config, registry
pub use anymq_interface as interface; // Transport-neutral contracts
pub use anymq_membroker as membroker; // In-process broker transport
pub use anymq_simplemessage as simplemessage; // Protobuf-backed message type

// Re-export the types most applications touch directly
pub use anymq_core::{
    ChannelHandle, ConsumerRuntime, MessageProducer, MessagingConfig, ProduceError, SetupError,
    TransportRegistry,
};
pub use anymq_interface::{Message, MessageCodec, MessageHandler};
pub use anymq_simplemessage::{SimpleMessage, SimpleMessageCodec};
