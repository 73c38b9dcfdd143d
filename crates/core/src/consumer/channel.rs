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

//! Channel coordinator: wiring and lifecycle
//!
//! `open_channel` assembles one consumption channel. The session mailbox
//! is created first because its handle is the sink the transport delivers
//! into; the transport consumer is then built through the factory, and
//! only after that succeeds are the units spawned and handshaken. The
//! coordinator gates external `Start` commands until the relay reports
//! the handshake complete.

use super::dispatch::{spawn_dispatcher, DispatcherHandle};
use super::relay::{spawn_relay, RelayHandle};
use super::session::{session_mailbox, spawn_session, SessionConfig, SessionHandle};
use crate::config::ConsumerSettings;
use crate::error::SetupError;
use crate::transport::{ConsumerFactory, ConsumerSpec};
use anymq_interface::{MessageCodec, MessageHandler};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tracing::{debug, info, warn};

/// Commands understood by the coordinator unit
#[derive(Debug)]
pub(crate) enum CoordinatorCommand {
    /// Relay finished the handshake with both peers
    Initialized,
    /// Open a poll round for up to `limit` messages
    Start { limit: usize },
    /// Wind the whole channel down
    Shutdown,
}

/// Cloneable handle to a coordinator unit
#[derive(Debug, Clone)]
pub(crate) struct CoordinatorHandle {
    tx: mpsc::UnboundedSender<CoordinatorCommand>,
}

impl CoordinatorHandle {
    pub(crate) fn initialized(&self) {
        self.send(CoordinatorCommand::Initialized);
    }

    pub(crate) fn start(&self, limit: usize) {
        self.send(CoordinatorCommand::Start { limit });
    }

    pub(crate) fn shutdown(&self) {
        self.send(CoordinatorCommand::Shutdown);
    }

    fn send(&self, command: CoordinatorCommand) {
        if self.tx.send(command).is_err() {
            debug!("Coordinator mailbox closed; dropping command");
        }
    }
}

/// Create a coordinator mailbox without spawning the unit.
pub(crate) fn coordinator_mailbox(
) -> (CoordinatorHandle, mpsc::UnboundedReceiver<CoordinatorCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CoordinatorHandle { tx }, rx)
}

/// Control handle for one running consumption channel
///
/// Cloneable; all clones address the same channel. The channel's units
/// keep each other's mailboxes open, so a channel never winds down on its
/// own: call [`ChannelHandle::shutdown`] (directly or through the owning
/// runtime) to stop it.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    coordinator: CoordinatorHandle,
}

impl ChannelHandle {
    /// Ask the channel to open a poll round for up to `limit` messages.
    ///
    /// The runtime issues the first round automatically; afterwards the
    /// channel keeps polling itself, so this is only an external nudge.
    /// Ignored with a warning while the handshake is still in flight.
    pub fn start(&self, limit: usize) {
        self.coordinator.start(limit);
    }

    /// Stop the channel: relay, dispatcher, and session wind down, and
    /// the session turns the transport off on its way out.
    pub fn shutdown(&self) {
        self.coordinator.shutdown();
    }
}

/// A wired channel whose handshake has not been confirmed yet.
pub(crate) struct PendingChannel {
    handle: ChannelHandle,
    ready: oneshot::Receiver<()>,
}

impl std::fmt::Debug for PendingChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingChannel").finish_non_exhaustive()
    }
}

impl PendingChannel {
    /// Wait for the handshake to complete, bounded by `wait`.
    ///
    /// On timeout the half-built channel is shut down before the error
    /// is returned, so no units linger.
    pub(crate) async fn ready(self, wait: Duration) -> Result<ChannelHandle, SetupError> {
        let Self { handle, ready } = self;
        match time::timeout(wait, ready).await {
            Ok(Ok(())) => Ok(handle),
            Ok(Err(_)) => Err(SetupError::ChannelClosed),
            Err(_) => {
                handle.shutdown();
                Err(SetupError::HandshakeTimeout(wait))
            }
        }
    }
}

/// Build the transport consumer and spawn the channel's units.
///
/// Returns once the transport is built and the handshake is underway;
/// await [`PendingChannel::ready`] before using the channel.
pub(crate) async fn open_channel(
    channel_id: String,
    queue: String,
    settings: ConsumerSettings,
    factory: Arc<dyn ConsumerFactory>,
    codec: Arc<dyn MessageCodec>,
    handler: Arc<dyn MessageHandler>,
) -> Result<PendingChannel, SetupError> {
    debug!(channel_id = %channel_id, queue = %queue, "Opening consumption channel");

    // The session mailbox must exist before the transport consumer is
    // built: its handle is the sink the connector delivers into.
    let (session, session_rx) = session_mailbox();
    let consumer = factory
        .build_consumer(ConsumerSpec {
            channel_id: channel_id.clone(),
            queue,
            settings: settings.clone(),
            codec,
            sink: Arc::new(session.clone()),
        })
        .await?;

    spawn_session(
        SessionConfig {
            channel_id: channel_id.clone(),
            max_messages_per_batch: settings.max_messages_per_batch,
            max_poll_interval: settings.max_poll_interval(),
        },
        consumer,
        session.clone(),
        session_rx,
    );
    let dispatcher = spawn_dispatcher(channel_id.clone(), handler);
    let (coordinator, coordinator_rx) = coordinator_mailbox();
    let relay = spawn_relay(
        channel_id.clone(),
        session.clone(),
        dispatcher.clone(),
        coordinator.clone(),
        settings.poll_batch_limit,
    );
    relay.activate();
    let ready = spawn_coordinator(channel_id, session, dispatcher, relay, coordinator_rx);

    metrics::counter!("anymq_channels_opened_total").increment(1);
    Ok(PendingChannel { handle: ChannelHandle { coordinator }, ready })
}

fn spawn_coordinator(
    channel_id: String,
    session: SessionHandle,
    dispatcher: DispatcherHandle,
    relay: RelayHandle,
    rx: mpsc::UnboundedReceiver<CoordinatorCommand>,
) -> oneshot::Receiver<()> {
    let (ready_tx, ready_rx) = oneshot::channel();
    let coordinator = Coordinator {
        channel_id,
        session,
        dispatcher,
        relay,
        ready: Some(ready_tx),
        initialized: false,
        rx,
    };
    tokio::spawn(coordinator.run());
    ready_rx
}

struct Coordinator {
    channel_id: String,
    session: SessionHandle,
    dispatcher: DispatcherHandle,
    relay: RelayHandle,
    /// Fulfilled once, when the relay reports the handshake complete
    ready: Option<oneshot::Sender<()>>,
    initialized: bool,
    rx: mpsc::UnboundedReceiver<CoordinatorCommand>,
}

impl Coordinator {
    async fn run(mut self) {
        debug!(channel_id = %self.channel_id, "Channel coordinator started");
        while let Some(command) = self.rx.recv().await {
            match command {
                CoordinatorCommand::Initialized => self.handle_initialized(),
                CoordinatorCommand::Start { limit } => self.handle_start(limit),
                CoordinatorCommand::Shutdown => {
                    self.relay.shutdown();
                    self.dispatcher.shutdown();
                    self.session.shutdown();
                    break;
                }
            }
        }
        debug!(channel_id = %self.channel_id, "Channel coordinator stopped");
    }

    fn handle_initialized(&mut self) {
        self.initialized = true;
        info!(channel_id = %self.channel_id, "Consumption channel initialized");
        if let Some(ready) = self.ready.take() {
            if ready.send(()).is_err() {
                debug!(channel_id = %self.channel_id, "Nobody awaiting channel readiness");
            }
        }
    }

    fn handle_start(&mut self, limit: usize) {
        if !self.initialized {
            warn!(
                channel_id = %self.channel_id,
                "Start requested before the handshake completed; ignoring"
            );
            return;
        }
        debug!(channel_id = %self.channel_id, limit, "Poll round requested");
        self.session.poll(limit);
    }
}
