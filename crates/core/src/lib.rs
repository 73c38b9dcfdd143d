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

//! # anymq Core
//!
//! ## Purpose
//! The heart of anymq: the consumption pipeline that turns a raw transport
//! into batched, order-aware message dispatch, plus the producer client,
//! the YAML configuration profiles, and the registry that binds profiles
//! to transport connectors.
//!
//! ## Architecture Context
//! Each consumption channel is a small constellation of message-passing
//! units, every one a tokio task owning private state behind an mpsc
//! mailbox. Concurrency exists only *between* units; no unit ever locks
//! shared state.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Consumption channel                       │
//! │                                                                │
//! │  transport ──deliver──▶ ┌─────────┐   batch   ┌─────────┐    │
//! │  connector              │ session │──────────▶│  relay  │    │
//! │      ▲                  └─────────┘           └─────────┘    │
//! │      │ start/stop            ▲ re-poll             │ batch    │
//! │      └──────────────────────┘└─────────────────────┤          │
//! │                                                     ▼          │
//! │  ┌────────┐  release   ┌────────────┐   drained ┌─────────┐  │
//! │  │ worker │◀───────────│ dispatcher │──────────▶│  relay  │  │
//! │  │ tasks  │──done─────▶└────────────┘           └─────────┘  │
//! │  └────────┘                                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session buffers decoded messages and flushes a bounded prefix per
//! poll round; the relay shuttles batches onward and re-polls; the
//! dispatcher fans a batch out to ephemeral workers while keeping every
//! correlation group strictly sequential; the coordinator wires the units
//! together and gates startup behind the handshake.
//!
//! ## Key Components
//! - [`ConsumerRuntime`]: sets up consumption channels from profiles
//! - [`ChannelHandle`]: start/shutdown control over one channel
//! - [`MessageProducer`]: finalize-then-send producer client
//! - [`MessagingConfig`] / [`Profile`]: YAML configuration
//! - [`TransportRegistry`]: connector factories keyed by system name

#![warn(missing_docs)]

pub mod config;
pub mod consumer;
pub mod error;
pub mod producer;
pub mod transport;

pub use config::{ConfigError, ConsumerSettings, MessagingConfig, Profile, ProducerSettings, PropertyMap};
pub use consumer::{ChannelHandle, ConsumerRuntime};
pub use error::{ProduceError, SetupError};
pub use producer::MessageProducer;
pub use transport::{ConsumerFactory, ConsumerSpec, ProducerFactory, ProducerSpec, TransportRegistry};
