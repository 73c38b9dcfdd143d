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

//! # anymq-simplemessage
//!
//! ## Purpose
//! A ready-made, protobuf-encoded message type for applications that do
//! not want to define their own wire format. [`SimpleMessage`] carries an
//! opaque payload plus the envelope fields anymq cares about (message id,
//! correlation group, sender, timestamps), and [`SimpleMessageCodec`]
//! decodes it on the consuming side.
//!
//! ## Key Components
//! - [`SimpleMessage`]: the message type, implementing
//!   [`anymq_interface::Message`]
//! - [`SimpleMessageWire`]: its hand-written prost wire struct
//! - [`SimpleMessageCodec`]: the matching [`anymq_interface::MessageCodec`]
//!
//! ## Design Decisions
//! - **No build.rs**: the wire struct is written by hand with explicit
//!   field tags, so the crate builds without protoc.
//! - **Stamp-on-send**: `finalize()` fills the message id (ulid) and the
//!   created timestamp only when the application left them unset, which
//!   keeps explicitly pinned values (useful in tests) intact.
//! - **Empty string means ungrouped**: proto3 has no optional strings, so
//!   an empty `transaction_group_id` on the wire maps to `None`.
//!
//! ## Examples
//! ```rust
//! use anymq_interface::Message;
//! use anymq_simplemessage::SimpleMessage;
//!
//! let mut message = SimpleMessage::new();
//! message.set_sender("orders-app");
//! message.set_content_schema("application/json");
//! message.set_payload(br#"{"order":42}"#.to_vec());
//! message.set_group_id("order-42");
//!
//! message.finalize()?;
//! let bytes = message.encode()?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), anymq_interface::CodecError>(())
//! ```

#![warn(missing_docs)]

mod codec;
mod message;

pub use codec::SimpleMessageCodec;
pub use message::{SimpleMessage, SimpleMessageWire, HEADER_SCHEMA, MESSAGE_VERSION};
