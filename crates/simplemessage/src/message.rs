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

//! The [`SimpleMessage`] type and its protobuf wire form

use anymq_interface::{CodecError, Message};
use chrono::{DateTime, Utc};
use std::any::Any;

/// Contract version stamped into every finalized message.
pub const MESSAGE_VERSION: &str = "1.0";

/// Header schema identifier stamped into every finalized message.
pub const HEADER_SCHEMA: &str = "simple_message_schema/v1.0";

/// Protobuf wire form of a [`SimpleMessage`].
///
/// Hand-written rather than generated; the field tags are the schema.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SimpleMessageWire {
    /// Unique message identifier.
    #[prost(string, tag = "1")]
    pub message_id: String,
    /// Contract version, [`MESSAGE_VERSION`] once finalized.
    #[prost(string, tag = "2")]
    pub version: String,
    /// Header schema identifier, [`HEADER_SCHEMA`] once finalized.
    #[prost(string, tag = "3")]
    pub header_schema: String,
    /// Application-defined schema of the payload bytes.
    #[prost(string, tag = "4")]
    pub content_schema: String,
    /// Logical name of the producing application.
    #[prost(string, tag = "5")]
    pub sender: String,
    /// Opaque application payload.
    #[prost(bytes = "vec", tag = "6")]
    pub payload: Vec<u8>,
    /// Creation time in epoch milliseconds.
    #[prost(uint64, tag = "7")]
    pub created_timestamp_ms: u64,
    /// Correlation group; empty means ungrouped.
    #[prost(string, tag = "8")]
    pub transaction_group_id: String,
}

/// General-purpose message carrying an opaque payload
///
/// Construct with [`SimpleMessage::new`], fill the fields the application
/// cares about, and hand it to a producer. The producer's
/// [`Message::finalize`] call stamps the envelope (id, version, header
/// schema, timestamp) before encoding.
#[derive(Debug, Clone, Default)]
pub struct SimpleMessage {
    wire: SimpleMessageWire,
}

impl SimpleMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the message id instead of letting `finalize` stamp one.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.wire.message_id = id.into();
    }

    /// Set the producing application's name.
    pub fn set_sender(&mut self, sender: impl Into<String>) {
        self.wire.sender = sender.into();
    }

    /// Set the application-defined schema of the payload.
    pub fn set_content_schema(&mut self, schema: impl Into<String>) {
        self.wire.content_schema = schema.into();
    }

    /// Set the payload bytes.
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.wire.payload = payload;
    }

    /// Set the correlation group for ordered dispatch.
    pub fn set_group_id(&mut self, group: impl Into<String>) {
        self.wire.transaction_group_id = group.into();
    }

    /// Pin the creation time instead of letting `finalize` stamp it.
    pub fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.wire.created_timestamp_ms = at.timestamp_millis() as u64;
    }

    /// Producing application's name.
    pub fn sender(&self) -> &str {
        &self.wire.sender
    }

    /// Application-defined schema of the payload.
    pub fn content_schema(&self) -> &str {
        &self.wire.content_schema
    }

    /// Payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.wire.payload
    }

    /// Creation time in epoch milliseconds, 0 until finalized or set.
    pub fn created_timestamp_ms(&self) -> u64 {
        self.wire.created_timestamp_ms
    }

    pub(crate) fn from_wire(wire: SimpleMessageWire) -> Self {
        Self { wire }
    }
}

impl From<SimpleMessageWire> for SimpleMessage {
    fn from(wire: SimpleMessageWire) -> Self {
        Self::from_wire(wire)
    }
}

impl Message for SimpleMessage {
    fn id(&self) -> &str {
        &self.wire.message_id
    }

    fn version(&self) -> &str {
        &self.wire.version
    }

    fn header_schema(&self) -> &str {
        &self.wire.header_schema
    }

    fn group_id(&self) -> Option<&str> {
        if self.wire.transaction_group_id.is_empty() {
            None
        } else {
            Some(&self.wire.transaction_group_id)
        }
    }

    fn finalize(&mut self) -> Result<(), CodecError> {
        self.wire.version = MESSAGE_VERSION.to_string();
        self.wire.header_schema = HEADER_SCHEMA.to_string();
        if self.wire.message_id.is_empty() {
            self.wire.message_id = ulid::Ulid::new().to_string();
        }
        if self.wire.created_timestamp_ms == 0 {
            self.wire.created_timestamp_ms = Utc::now().timestamp_millis() as u64;
        }
        Ok(())
    }

    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        use prost::Message as _;
        Ok(self.wire.encode_to_vec())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_finalize_stamps_envelope_fields() {
        let mut message = SimpleMessage::new();
        message.set_sender("orders-app");
        message.finalize().unwrap();

        assert_eq!(message.version(), MESSAGE_VERSION);
        assert_eq!(message.header_schema(), HEADER_SCHEMA);
        assert!(ulid::Ulid::from_string(message.id()).is_ok());
        assert!(message.created_timestamp_ms() > 0);
    }

    #[test]
    fn test_finalize_keeps_pinned_id_and_timestamp() {
        let created = Utc.timestamp_millis_opt(1_724_867_138_000).unwrap();
        let mut message = SimpleMessage::new();
        message.set_id("msg-1");
        message.set_created_at(created);
        message.finalize().unwrap();

        assert_eq!(message.id(), "msg-1");
        assert_eq!(message.created_timestamp_ms(), 1_724_867_138_000);
    }

    #[test]
    fn test_empty_group_means_ungrouped() {
        let mut message = SimpleMessage::new();
        assert_eq!(message.group_id(), None);

        message.set_group_id("order-42");
        assert_eq!(message.group_id(), Some("order-42"));
    }
}
