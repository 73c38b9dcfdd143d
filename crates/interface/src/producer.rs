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

//! Producing-side transport contract

use crate::error::TransportError;
use crate::message::Message;
use async_trait::async_trait;

/// Producing side of a transport connector
///
/// Connectors encode the message ([`Message::encode`]) and hand the bytes
/// to their backend. The message is already finalized by the time it
/// reaches the connector.
#[async_trait]
pub trait TransportProducer: Send + Sync {
    /// Publish one message.
    ///
    /// ## Errors
    /// - [`TransportError::SendFailed`]: encoding or backend delivery failed
    /// - [`TransportError::Closed`]: the producer was already closed
    async fn send(&self, message: &dyn Message) -> Result<(), TransportError>;

    /// Publish one message with an explicit partitioning key.
    ///
    /// Backends without partitions may ignore the key; they must still
    /// deliver the message.
    async fn send_keyed(&self, key: &str, message: &dyn Message) -> Result<(), TransportError>;

    /// Release backend resources. Further sends fail with
    /// [`TransportError::Closed`].
    async fn close(&mut self) -> Result<(), TransportError>;
}

impl std::fmt::Debug for dyn TransportProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportProducer").finish_non_exhaustive()
    }
}
