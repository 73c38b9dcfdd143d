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

//! Consumer session: poll rounds, buffering, and bounded flushes
//!
//! The session owns the transport consumer and the FIFO buffer of decoded
//! messages for one channel. Its life is a sequence of poll rounds: each
//! round mints a fresh [`RoundId`], releases at most `limit` messages when
//! it closes, and closes exactly once: on the poll deadline, on the batch
//! threshold, or immediately when the buffer already covers the limit.

use super::deadline::spawn_poll_deadline;
use super::relay::RelayHandle;
use super::RoundId;
use anymq_interface::{Message, MessageSink, TransportConsumer};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Commands understood by the session unit
#[derive(Debug)]
pub(crate) enum SessionCommand {
    /// Open a new poll round releasing at most `limit` messages
    Poll { limit: usize },
    /// Buffer one decoded message from the transport
    Deliver { message: Arc<dyn Message> },
    /// Poll deadline reached for the given round
    Expire { round: RoundId },
    /// Attach the relay that receives flushed batches
    Attach { relay: RelayHandle },
    /// Stop the unit
    Shutdown,
}

/// Cloneable handle to a session unit
#[derive(Debug, Clone)]
pub(crate) struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn poll(&self, limit: usize) {
        self.send(SessionCommand::Poll { limit });
    }

    pub(crate) fn enqueue(&self, message: Arc<dyn Message>) {
        self.send(SessionCommand::Deliver { message });
    }

    pub(crate) fn expire(&self, round: RoundId) {
        self.send(SessionCommand::Expire { round });
    }

    pub(crate) fn attach(&self, relay: RelayHandle) {
        self.send(SessionCommand::Attach { relay });
    }

    pub(crate) fn shutdown(&self) {
        self.send(SessionCommand::Shutdown);
    }

    fn send(&self, command: SessionCommand) {
        if self.tx.send(command).is_err() {
            debug!("Session mailbox closed; dropping command");
        }
    }
}

/// Transport connectors deliver decoded messages straight into the
/// session's mailbox.
impl MessageSink for SessionHandle {
    fn deliver(&self, message: Box<dyn Message>) {
        self.enqueue(Arc::from(message));
    }
}

/// Static configuration of one session unit
pub(crate) struct SessionConfig {
    pub channel_id: String,
    /// Buffer size that triggers a flush without waiting for the deadline
    pub max_messages_per_batch: usize,
    /// Poll round deadline
    pub max_poll_interval: Duration,
}

/// Create the session mailbox ahead of spawning.
///
/// The handle doubles as the channel's [`MessageSink`], so it must exist
/// before the transport consumer is built; the unit itself is spawned
/// afterwards with [`spawn_session`].
pub(crate) fn session_mailbox() -> (SessionHandle, mpsc::UnboundedReceiver<SessionCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SessionHandle { tx }, rx)
}

/// Spawn the session unit over a previously created mailbox.
pub(crate) fn spawn_session(
    config: SessionConfig,
    consumer: Box<dyn TransportConsumer>,
    handle: SessionHandle,
    rx: mpsc::UnboundedReceiver<SessionCommand>,
) {
    let session = Session {
        channel_id: config.channel_id,
        consumer,
        buffer: VecDeque::new(),
        round: None,
        flush_limit: 0,
        relay: None,
        max_messages_per_batch: config.max_messages_per_batch,
        max_poll_interval: config.max_poll_interval,
        handle,
        rx,
    };
    tokio::spawn(session.run());
}

struct Session {
    channel_id: String,
    consumer: Box<dyn TransportConsumer>,
    buffer: VecDeque<Arc<dyn Message>>,
    /// Identity of the active poll round, `None` between rounds
    round: Option<RoundId>,
    /// Release cap of the active round
    flush_limit: usize,
    relay: Option<RelayHandle>,
    max_messages_per_batch: usize,
    max_poll_interval: Duration,
    handle: SessionHandle,
    rx: mpsc::UnboundedReceiver<SessionCommand>,
}

impl Session {
    async fn run(mut self) {
        debug!(channel_id = %self.channel_id, "Consumer session started");
        while let Some(command) = self.rx.recv().await {
            match command {
                SessionCommand::Poll { limit } => self.handle_poll(limit).await,
                SessionCommand::Deliver { message } => self.handle_deliver(message).await,
                SessionCommand::Expire { round } => self.handle_expire(round).await,
                SessionCommand::Attach { relay } => self.handle_attach(relay),
                SessionCommand::Shutdown => break,
            }
        }
        if let Err(error) = self.consumer.stop_polling().await {
            debug!(channel_id = %self.channel_id, error = %error, "Transport stop failed during teardown");
        }
        debug!(channel_id = %self.channel_id, "Consumer session stopped");
    }

    /// Open a new poll round. A round already in flight is superseded; its
    /// deadline turns stale the moment the new id is stored.
    async fn handle_poll(&mut self, limit: usize) {
        let round = RoundId::new();
        self.round = Some(round);
        self.flush_limit = limit;
        debug!(
            channel_id = %self.channel_id,
            round = %round,
            limit,
            buffered = self.buffer.len(),
            "Poll round opened"
        );

        if self.buffer.len() >= limit {
            // Enough buffered already: no deadline, no transport polling.
            self.flush().await;
            return;
        }

        spawn_poll_deadline(self.handle.clone(), round, self.max_poll_interval);
        if self.buffer.len() >= self.max_messages_per_batch {
            self.flush().await;
        } else if let Err(error) = self.consumer.start_polling().await {
            error!(
                channel_id = %self.channel_id,
                round = %round,
                error = %error,
                "Failed to start transport polling; round will close on its deadline"
            );
        }
    }

    async fn handle_deliver(&mut self, message: Arc<dyn Message>) {
        debug!(
            channel_id = %self.channel_id,
            message_id = %message.id(),
            buffered = self.buffer.len() + 1,
            "Message buffered"
        );
        self.buffer.push_back(message);
        metrics::counter!("anymq_messages_buffered_total").increment(1);
        if self.buffer.len() >= self.max_messages_per_batch {
            debug!(
                channel_id = %self.channel_id,
                buffered = self.buffer.len(),
                "Buffer reached batch threshold"
            );
            self.flush().await;
        }
    }

    async fn handle_expire(&mut self, round: RoundId) {
        if self.round == Some(round) {
            debug!(channel_id = %self.channel_id, round = %round, "Poll deadline reached; flushing");
            self.flush().await;
        } else {
            debug!(channel_id = %self.channel_id, round = %round, "Stale poll deadline ignored");
        }
    }

    fn handle_attach(&mut self, relay: RelayHandle) {
        self.relay = Some(relay.clone());
        relay.session_attached();
        debug!(channel_id = %self.channel_id, "Relay attached to session");
    }

    /// Close the active round, releasing at most `flush_limit` messages.
    ///
    /// ## Invariants
    /// - Runs at most once per round: the round id is consumed here, and
    ///   every later trigger quoting it finds the slot empty.
    /// - Without an attached relay the buffer is retained, not dropped.
    async fn flush(&mut self) {
        let Some(round) = self.round.take() else {
            return;
        };
        if let Err(error) = self.consumer.stop_polling().await {
            error!(
                channel_id = %self.channel_id,
                round = %round,
                error = %error,
                "Failed to stop transport polling"
            );
        }
        let Some(relay) = &self.relay else {
            debug!(channel_id = %self.channel_id, round = %round, "No relay attached; retaining buffer");
            return;
        };
        let count = self.buffer.len().min(self.flush_limit);
        let messages: Vec<Arc<dyn Message>> = self.buffer.drain(..count).collect();
        debug!(
            channel_id = %self.channel_id,
            round = %round,
            released = count,
            remaining = self.buffer.len(),
            "Batch flushed"
        );
        metrics::counter!("anymq_batches_flushed_total").increment(1);
        relay.batch_ready(round, messages);
    }
}
