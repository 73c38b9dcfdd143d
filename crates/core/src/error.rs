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

//! Setup and produce error types

use crate::config::ConfigError;
use anymq_interface::{CodecError, TransportError};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while setting up consumers, producers, or channels
#[derive(Error, Debug)]
pub enum SetupError {
    /// Configuration lookup or validation failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No transport connector is registered for the profile's system
    #[error("No transport registered for system: {0}")]
    UnknownSystem(String),

    /// The transport connector could not be built
    #[error("Transport setup failed: {0}")]
    Transport(#[from] TransportError),

    /// The channel units did not finish their handshake in time
    #[error("Channel handshake timed out after {0:?}")]
    HandshakeTimeout(Duration),

    /// The channel shut down before setup completed
    #[error("Channel closed during setup")]
    ChannelClosed,
}

/// Errors raised while sending a message
#[derive(Error, Debug)]
pub enum ProduceError {
    /// Message finalization or encoding failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Transport delivery failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The producer was already closed
    #[error("Producer already closed")]
    Closed,
}
