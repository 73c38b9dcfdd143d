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

//! Consuming-side transport contract

use crate::error::TransportError;
use crate::message::Message;
use async_trait::async_trait;

/// Pipeline endpoint a transport connector delivers decoded messages into
///
/// Implemented by the consumption pipeline; handed to connectors at build
/// time. Delivery is non-blocking and infallible from the connector's
/// point of view: once decoded, a message is the pipeline's problem.
pub trait MessageSink: Send + Sync {
    /// Enqueue one decoded message into the pipeline buffer.
    fn deliver(&self, message: Box<dyn Message>);
}

/// Consuming side of a transport connector
///
/// ## Purpose
/// The pipeline toggles backend fetching around its poll rounds: polling
/// starts when a round opens with room in the buffer and stops when the
/// round flushes. While polling is on, the connector fetches raw payloads,
/// decodes them with the channel's [`crate::MessageCodec`], and pushes
/// each message into the channel's [`MessageSink`].
///
/// ## Design Decisions
/// - Both calls are idempotent toggles; the pipeline may issue them
///   repeatedly across rounds.
/// - Decode failures are the connector's to log and skip; a bad payload
///   must not stop the fetch loop.
#[async_trait]
pub trait TransportConsumer: Send + Sync {
    /// Begin fetching from the backend.
    ///
    /// ## Errors
    /// - [`TransportError::PollingFailed`]: the backend fetch loop could
    ///   not be started
    async fn start_polling(&mut self) -> Result<(), TransportError>;

    /// Stop fetching from the backend.
    ///
    /// ## Errors
    /// - [`TransportError::PollingFailed`]: the backend fetch loop could
    ///   not be stopped cleanly
    async fn stop_polling(&mut self) -> Result<(), TransportError>;
}

impl std::fmt::Debug for dyn TransportConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportConsumer").finish_non_exhaustive()
    }
}
