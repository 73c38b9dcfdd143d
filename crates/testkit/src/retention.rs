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

//! Handler retaining every received message for later inspection

use async_trait::async_trait;
use anymq_interface::{BoxError, Message, MessageHandler};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared buffer a [`RetentionHandler`] appends into.
pub type RetainedMessages = Arc<Mutex<Vec<Arc<dyn Message>>>>;

/// Handler that appends every message it receives into a shared buffer
///
/// The lab attaches one per listening channel; probes snapshot the buffer.
/// Retention order is completion order, not necessarily publish order,
/// since ungrouped messages are handled in parallel.
#[derive(Default)]
pub struct RetentionHandler {
    retained: RetainedMessages,
}

impl RetentionHandler {
    /// Create a handler with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the shared buffer.
    pub fn retained(&self) -> RetainedMessages {
        Arc::clone(&self.retained)
    }
}

#[async_trait]
impl MessageHandler for RetentionHandler {
    async fn handle_message(&self, message: Arc<dyn Message>) -> Result<(), BoxError> {
        self.retained.lock().await.push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anymq_simplemessage::SimpleMessage;

    fn message(id: &str) -> Arc<dyn Message> {
        let mut message = SimpleMessage::new();
        message.set_id(id);
        Arc::new(message)
    }

    #[tokio::test]
    async fn test_handler_appends_in_completion_order() {
        let handler = RetentionHandler::new();
        let retained = handler.retained();

        handler.handle_message(message("msg-1")).await.unwrap();
        handler.handle_message(message("msg-2")).await.unwrap();

        let buffer = retained.lock().await;
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer[0].id(), "msg-1");
        assert_eq!(buffer[1].id(), "msg-2");
    }
}
