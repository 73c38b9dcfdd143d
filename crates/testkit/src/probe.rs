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

//! Point-in-time view over one channel's retained messages

use anymq_interface::Message;
use std::sync::Arc;

/// Snapshot of a retention buffer, taken after the settle delay
///
/// The snapshot is immutable: messages arriving after
/// [`crate::TestLab::probe`] returned are not part of it.
pub struct MessageProbe {
    messages: Vec<Arc<dyn Message>>,
}

impl std::fmt::Debug for MessageProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageProbe")
            .field("messages", &self.messages.len())
            .finish_non_exhaustive()
    }
}

impl MessageProbe {
    pub(crate) fn new(messages: Vec<Arc<dyn Message>>) -> Self {
        Self { messages }
    }

    /// Number of retained messages.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Retained messages in completion order.
    pub fn messages(&self) -> &[Arc<dyn Message>] {
        &self.messages
    }

    /// Retained message with this id, if any.
    pub fn message_by_id(&self, id: &str) -> Option<Arc<dyn Message>> {
        self.messages
            .iter()
            .find(|message| message.id() == id)
            .cloned()
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

    #[test]
    fn test_lookup_by_id() {
        let probe = MessageProbe::new(vec![message("msg-1"), message("msg-2")]);

        assert_eq!(probe.message_count(), 2);
        assert_eq!(probe.message_by_id("msg-2").unwrap().id(), "msg-2");
        assert!(probe.message_by_id("ghost").is_none());
    }
}
