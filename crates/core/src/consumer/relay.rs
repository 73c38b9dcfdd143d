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

//! Channel relay: handshake and batch shuttling
//!
//! The relay sits between the session and the dispatcher. On activation it
//! introduces itself to both peers and reports the channel initialized
//! once both have acknowledged. Afterwards it keeps the poll cycle
//! spinning: non-empty batches go to the dispatcher, empty batches and
//! drained rounds trigger the next poll.

use super::channel::CoordinatorHandle;
use super::dispatch::DispatcherHandle;
use super::session::SessionHandle;
use super::RoundId;
use anymq_interface::Message;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Commands understood by the relay unit
#[derive(Debug)]
pub(crate) enum RelayCommand {
    /// Begin the handshake with session and dispatcher
    Activate,
    /// Session acknowledged the attach
    SessionAttached,
    /// Dispatcher acknowledged the registration
    DispatcherAttached,
    /// Session closed a round and released a batch
    BatchReady {
        round: RoundId,
        messages: Vec<Arc<dyn Message>>,
    },
    /// Dispatcher finished every task of a round
    RoundDrained { round: RoundId },
    /// Stop the unit
    Shutdown,
}

/// Cloneable handle to a relay unit
#[derive(Debug, Clone)]
pub(crate) struct RelayHandle {
    tx: mpsc::UnboundedSender<RelayCommand>,
}

impl RelayHandle {
    pub(crate) fn activate(&self) {
        self.send(RelayCommand::Activate);
    }

    pub(crate) fn session_attached(&self) {
        self.send(RelayCommand::SessionAttached);
    }

    pub(crate) fn dispatcher_attached(&self) {
        self.send(RelayCommand::DispatcherAttached);
    }

    pub(crate) fn batch_ready(&self, round: RoundId, messages: Vec<Arc<dyn Message>>) {
        self.send(RelayCommand::BatchReady { round, messages });
    }

    pub(crate) fn round_drained(&self, round: RoundId) {
        self.send(RelayCommand::RoundDrained { round });
    }

    pub(crate) fn shutdown(&self) {
        self.send(RelayCommand::Shutdown);
    }

    fn send(&self, command: RelayCommand) {
        if self.tx.send(command).is_err() {
            debug!("Relay mailbox closed; dropping command");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum HandshakePeer {
    Session,
    Dispatcher,
}

/// Create a relay mailbox without spawning the unit.
pub(crate) fn relay_mailbox() -> (RelayHandle, mpsc::UnboundedReceiver<RelayCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RelayHandle { tx }, rx)
}

/// Spawn the relay unit for one channel.
pub(crate) fn spawn_relay(
    channel_id: String,
    session: SessionHandle,
    dispatcher: DispatcherHandle,
    coordinator: CoordinatorHandle,
    repoll_limit: usize,
) -> RelayHandle {
    let (handle, rx) = relay_mailbox();
    let relay = Relay {
        channel_id,
        session,
        dispatcher,
        coordinator,
        repoll_limit,
        pending: HashSet::from([HandshakePeer::Session, HandshakePeer::Dispatcher]),
        initialized: false,
        handle: handle.clone(),
        rx,
    };
    tokio::spawn(relay.run());
    handle
}

struct Relay {
    channel_id: String,
    session: SessionHandle,
    dispatcher: DispatcherHandle,
    coordinator: CoordinatorHandle,
    /// Poll limit used whenever the relay restarts the cycle
    repoll_limit: usize,
    /// Peers that have not acknowledged the handshake yet
    pending: HashSet<HandshakePeer>,
    initialized: bool,
    handle: RelayHandle,
    rx: mpsc::UnboundedReceiver<RelayCommand>,
}

impl Relay {
    async fn run(mut self) {
        debug!(channel_id = %self.channel_id, "Channel relay started");
        while let Some(command) = self.rx.recv().await {
            match command {
                RelayCommand::Activate => self.handle_activate(),
                RelayCommand::SessionAttached => self.acknowledge(HandshakePeer::Session),
                RelayCommand::DispatcherAttached => self.acknowledge(HandshakePeer::Dispatcher),
                RelayCommand::BatchReady { round, messages } => {
                    self.handle_batch(round, messages)
                }
                RelayCommand::RoundDrained { round } => {
                    debug!(channel_id = %self.channel_id, round = %round, "Round drained; polling again");
                    self.session.poll(self.repoll_limit);
                }
                RelayCommand::Shutdown => break,
            }
        }
        debug!(channel_id = %self.channel_id, "Channel relay stopped");
    }

    fn handle_activate(&mut self) {
        debug!(channel_id = %self.channel_id, "Relay handshake started");
        self.session.attach(self.handle.clone());
        self.dispatcher.register(self.handle.clone());
    }

    fn acknowledge(&mut self, peer: HandshakePeer) {
        self.pending.remove(&peer);
        debug!(channel_id = %self.channel_id, peer = ?peer, "Handshake acknowledged");
        if self.pending.is_empty() && !self.initialized {
            self.initialized = true;
            debug!(channel_id = %self.channel_id, "Channel relay initialized");
            self.coordinator.initialized();
        }
    }

    fn handle_batch(&mut self, round: RoundId, messages: Vec<Arc<dyn Message>>) {
        if messages.is_empty() {
            debug!(channel_id = %self.channel_id, round = %round, "Empty batch; polling again");
            self.session.poll(self.repoll_limit);
        } else {
            debug!(
                channel_id = %self.channel_id,
                round = %round,
                count = messages.len(),
                "Forwarding batch to dispatcher"
            );
            self.dispatcher.dispatch(round, messages);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::channel::{coordinator_mailbox, CoordinatorCommand};
    use crate::consumer::dispatch::{dispatcher_mailbox, DispatcherCommand};
    use crate::consumer::session::{session_mailbox, SessionCommand};
    use crate::consumer::test_support::TestMessage;
    use tokio::time::{sleep, Duration};

    struct Rig {
        relay: RelayHandle,
        session_rx: mpsc::UnboundedReceiver<SessionCommand>,
        dispatcher_rx: mpsc::UnboundedReceiver<DispatcherCommand>,
        coordinator_rx: mpsc::UnboundedReceiver<CoordinatorCommand>,
    }

    fn rig() -> Rig {
        let (session, session_rx) = session_mailbox();
        let (dispatcher, dispatcher_rx) = dispatcher_mailbox();
        let (coordinator, coordinator_rx) = coordinator_mailbox();
        let relay = spawn_relay("membroker:test:q".to_string(), session, dispatcher, coordinator, 3);
        Rig { relay, session_rx, dispatcher_rx, coordinator_rx }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_initialized_once_after_both_acks() {
        let mut rig = rig();
        rig.relay.activate();

        // Handshake reaches both peers
        assert!(matches!(rig.session_rx.recv().await, Some(SessionCommand::Attach { .. })));
        assert!(matches!(
            rig.dispatcher_rx.recv().await,
            Some(DispatcherCommand::Register { .. })
        ));

        // One ack is not enough
        rig.relay.session_attached();
        sleep(Duration::from_millis(1)).await;
        assert!(rig.coordinator_rx.try_recv().is_err());

        rig.relay.dispatcher_attached();
        assert!(matches!(
            rig.coordinator_rx.recv().await,
            Some(CoordinatorCommand::Initialized)
        ));

        // Duplicate acks never re-report
        rig.relay.session_attached();
        sleep(Duration::from_millis(1)).await;
        assert!(rig.coordinator_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch_polls_again() {
        let mut rig = rig();
        rig.relay.batch_ready(RoundId::new(), Vec::new());
        match rig.session_rx.recv().await {
            Some(SessionCommand::Poll { limit }) => assert_eq!(limit, 3),
            other => panic!("expected re-poll, got {other:?}"),
        }
        // Nothing reaches the dispatcher for an empty batch
        assert!(rig.dispatcher_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_empty_batch_goes_to_dispatcher() {
        let mut rig = rig();
        let round = RoundId::new();
        rig.relay.batch_ready(round, vec![TestMessage::new("m0", None), TestMessage::new("m1", Some("g"))]);
        match rig.dispatcher_rx.recv().await {
            Some(DispatcherCommand::Dispatch { round: got, messages }) => {
                assert_eq!(got, round);
                assert_eq!(messages.len(), 2);
            }
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_drained_round_polls_again() {
        let mut rig = rig();
        rig.relay.round_drained(RoundId::new());
        assert!(matches!(
            rig.session_rx.recv().await,
            Some(SessionCommand::Poll { limit: 3 })
        ));
    }
}
