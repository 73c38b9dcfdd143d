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

//! Message and codec contracts

use crate::error::CodecError;
use std::any::Any;
use std::fmt;

/// Contract for every message that flows through an anymq channel
///
/// ## Purpose
/// Messages move through the pipeline as trait objects (`Box<dyn Message>`
/// on the wire seam, `Arc<dyn Message>` once buffered) so that channels,
/// dispatchers, and workers stay independent of concrete message types.
///
/// ## Design Decisions
/// - **Object-safe**: the pipeline never needs to know the concrete type;
///   handlers that do can recover it through [`Message::as_any`].
/// - **Correlation group**: [`Message::group_id`] drives dispatch ordering.
///   Messages that share a group are handled strictly one at a time, in
///   arrival order; messages without a group run in parallel.
/// - **Build lifecycle**: producers call [`Message::finalize`] exactly once
///   before encoding, letting the type stamp identifiers or timestamps it
///   wants assigned at send time.
pub trait Message: fmt::Debug + Send + Sync {
    /// Unique identifier of this message.
    fn id(&self) -> &str;

    /// Version of the message contract this instance satisfies.
    fn version(&self) -> &str;

    /// Identifier of the header schema this message type carries.
    fn header_schema(&self) -> &str;

    /// Correlation group for ordered dispatch.
    ///
    /// Returns `None` when the message carries no ordering constraint.
    /// Implementations backed by wire formats without optional fields must
    /// map their empty sentinel (e.g. an empty string) to `None`.
    fn group_id(&self) -> Option<&str>;

    /// Build lifecycle hook, invoked by the producer immediately before
    /// encoding. May stamp fields left unset by the application.
    ///
    /// ## Errors
    /// - [`CodecError::InvalidMessage`]: a required field is missing or
    ///   inconsistent
    fn finalize(&mut self) -> Result<(), CodecError>;

    /// Encode this message into its wire form.
    ///
    /// ## Errors
    /// - [`CodecError::EncodingFailed`]: serialization failed
    fn encode(&self) -> Result<Vec<u8>, CodecError>;

    /// Upcast for downcasting to the concrete type in handlers and tests.
    fn as_any(&self) -> &dyn Any;
}

/// Decodes raw transport payloads into messages
///
/// One codec is attached per consumption channel; connectors call it for
/// every fetched payload before delivering into the pipeline.
pub trait MessageCodec: Send + Sync {
    /// Decode raw payload bytes into a message.
    ///
    /// ## Errors
    /// - [`CodecError::MalformedPayload`]: the bytes are not a valid
    ///   encoding of the expected message type
    fn decode(&self, payload: &[u8]) -> Result<Box<dyn Message>, CodecError>;
}
