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

//! Broker error taxonomy

use thiserror::Error;

/// Errors raised by the in-process broker and its registry
#[derive(Error, Debug)]
pub enum BrokerError {
    /// An instance with this name already exists in the registry.
    #[error("Messaging instance already exists: {0}")]
    DuplicateInstance(String),

    /// No instance with this name exists in the registry.
    #[error("Unknown messaging instance: {0}")]
    UnknownInstance(String),

    /// A queue with this name is already registered on the instance.
    #[error("Queue already registered: {0}")]
    DuplicateQueue(String),

    /// No queue with this name is registered on the instance.
    #[error("Unknown queue: {0}")]
    UnknownQueue(String),

    /// No such subscriber is attached to the queue.
    #[error("Unknown subscriber {subscriber} on queue {queue}")]
    UnknownSubscriber {
        /// Queue the fetch targeted.
        queue: String,
        /// Subscriber id the fetch was made for.
        subscriber: String,
    },
}
