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

//! # anymq Interface
//!
//! ## Purpose
//! Defines the transport-neutral contracts every anymq component programs
//! against: what a message is, how raw payloads become messages, how
//! applications handle them, and what a transport connector must provide
//! on the consuming and producing side.
//!
//! ## Architecture Context
//! This crate sits at the bottom of the anymq workspace. The consumption
//! pipeline in `anymq-core` drives [`TransportConsumer`] implementations
//! and hands decoded messages to a [`MessageHandler`]; connectors such as
//! the in-process broker implement the transport traits against their
//! backend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   Application                        │
//! │        MessageHandler        Message types           │
//! ├─────────────────────────────────────────────────────┤
//! │                   anymq-core                         │
//! │   consumption pipeline        producer client        │
//! ├─────────────────────────────────────────────────────┤
//! │              this crate (contracts)                  │
//! │  Message │ MessageCodec │ TransportConsumer/Producer │
//! ├─────────────────────────────────────────────────────┤
//! │        Connectors (in-process broker, ...)           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Components
//! - [`Message`]: object-safe contract for anything that flows through a
//!   channel, including the correlation group used for ordered dispatch
//! - [`MessageCodec`]: decodes raw transport payloads into messages
//! - [`MessageHandler`]: application callback invoked per message
//! - [`TransportConsumer`] / [`TransportProducer`]: connector seams
//! - [`MessageSink`]: the pipeline endpoint connectors deliver into
//! - [`CodecError`] / [`TransportError`]: shared error taxonomy

#![warn(missing_docs)]

mod consumer;
mod error;
mod handler;
mod message;
mod producer;

pub use consumer::{MessageSink, TransportConsumer};
pub use error::{BoxError, CodecError, TransportError};
pub use handler::MessageHandler;
pub use message::{Message, MessageCodec};
pub use producer::TransportProducer;
