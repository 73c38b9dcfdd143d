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

//! Shared error taxonomy for the codec and transport seams

use thiserror::Error;

/// Boxed error carried across the message-handler seam.
///
/// Handlers are application code; they report failures as whatever error
/// type they use internally, boxed at the boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while encoding or decoding message payloads
#[derive(Error, Debug)]
pub enum CodecError {
    /// Raw payload bytes could not be decoded into a message
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Message could not be encoded into its wire form
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Message failed validation during finalization
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

/// Errors raised by transport connectors
#[derive(Error, Debug)]
pub enum TransportError {
    /// Backend connection could not be established
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Polling could not be started or stopped
    #[error("Polling failed: {0}")]
    PollingFailed(String),

    /// Message could not be delivered to the backend
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Operation on a producer or consumer that was already closed
    #[error("Transport closed")]
    Closed,

    /// Connector configuration is missing or invalid
    #[error("Invalid transport configuration: {0}")]
    InvalidConfiguration(String),
}
