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

//! Codec turning raw payload bytes back into [`SimpleMessage`]s

use crate::message::{SimpleMessage, SimpleMessageWire};
use anymq_interface::{CodecError, Message, MessageCodec};
use prost::Message as _;

/// Decodes [`SimpleMessage`] wire payloads
///
/// Attach one per consumption channel whose queue carries
/// [`SimpleMessage`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMessageCodec;

impl SimpleMessageCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl MessageCodec for SimpleMessageCodec {
    fn decode(&self, payload: &[u8]) -> Result<Box<dyn Message>, CodecError> {
        let wire = SimpleMessageWire::decode(payload).map_err(|err| {
            CodecError::MalformedPayload(format!("not a simple message: {err}"))
        })?;
        Ok(Box::new(SimpleMessage::from_wire(wire)))
    }
}
