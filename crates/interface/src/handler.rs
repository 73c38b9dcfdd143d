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

//! Application-side message handling contract

use crate::error::BoxError;
use crate::message::Message;
use async_trait::async_trait;
use std::sync::Arc;

/// Application callback invoked for every dispatched message
///
/// ## Purpose
/// The dispatcher runs one handler invocation per message, on an ephemeral
/// worker task. A failing or panicking handler is logged and isolated; it
/// never stalls the rest of the batch or the channel.
///
/// ## Examples
/// ```rust
/// use anymq_interface::{BoxError, Message, MessageHandler};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// struct Printer;
///
/// #[async_trait]
/// impl MessageHandler for Printer {
///     async fn handle_message(&self, message: Arc<dyn Message>) -> Result<(), BoxError> {
///         println!("received {}", message.id());
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Process one message. Errors are logged by the worker and counted as
    /// a handler failure; they do not affect other messages.
    async fn handle_message(&self, message: Arc<dyn Message>) -> Result<(), BoxError>;

    /// Optionally supply a fresh handler instance per dispatched task.
    ///
    /// The default returns `None`, meaning the shared prototype handles
    /// every message. Handlers that keep per-invocation state return a new
    /// instance here.
    fn fresh_instance(&self) -> Option<Arc<dyn MessageHandler>> {
        None
    }
}
