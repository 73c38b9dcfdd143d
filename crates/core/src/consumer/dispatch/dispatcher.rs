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

//! Dispatcher: one round of ordered fan-out at a time
//!
//! For every message of a batch the dispatcher mints a task id, pre-spawns
//! a parked worker, and queues the task under the message's correlation
//! group. The release pass then lets every ungrouped task go at once but
//! only the head of each group; completions release group successors. The
//! round is reported drained exactly once, when the open task set empties.

use super::queue::TaskQueue;
use super::worker::{spawn_worker, PendingTask};
use crate::consumer::relay::RelayHandle;
use crate::consumer::{RoundId, TaskId};
use anymq_interface::{Message, MessageHandler};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Commands understood by the dispatcher unit
#[derive(Debug)]
pub(crate) enum DispatcherCommand {
    /// Relay introduces itself during the handshake
    Register { relay: RelayHandle },
    /// Fan out one flushed batch
    Dispatch {
        round: RoundId,
        messages: Vec<Arc<dyn Message>>,
    },
    /// Worker finished its task
    TaskDone {
        task_id: TaskId,
        group: Option<String>,
    },
    /// Stop the unit, discarding parked workers
    Shutdown,
}

/// Cloneable handle to a dispatcher unit
#[derive(Debug, Clone)]
pub(crate) struct DispatcherHandle {
    tx: mpsc::UnboundedSender<DispatcherCommand>,
}

impl DispatcherHandle {
    pub(crate) fn register(&self, relay: RelayHandle) {
        self.send(DispatcherCommand::Register { relay });
    }

    pub(crate) fn dispatch(&self, round: RoundId, messages: Vec<Arc<dyn Message>>) {
        self.send(DispatcherCommand::Dispatch { round, messages });
    }

    pub(crate) fn task_done(&self, task_id: TaskId, group: Option<String>) {
        self.send(DispatcherCommand::TaskDone { task_id, group });
    }

    pub(crate) fn shutdown(&self) {
        self.send(DispatcherCommand::Shutdown);
    }

    fn send(&self, command: DispatcherCommand) {
        if self.tx.send(command).is_err() {
            debug!("Dispatcher mailbox closed; dropping command");
        }
    }
}

/// Create a dispatcher mailbox without spawning the unit.
pub(crate) fn dispatcher_mailbox() -> (DispatcherHandle, mpsc::UnboundedReceiver<DispatcherCommand>)
{
    let (tx, rx) = mpsc::unbounded_channel();
    (DispatcherHandle { tx }, rx)
}

/// Spawn the dispatcher unit for one channel.
pub(crate) fn spawn_dispatcher(
    channel_id: String,
    handler: Arc<dyn MessageHandler>,
) -> DispatcherHandle {
    let (handle, rx) = dispatcher_mailbox();
    let dispatcher = Dispatcher {
        channel_id,
        handler,
        relay: None,
        round: None,
        open_tasks: HashSet::new(),
        queue: TaskQueue::new(),
        handle: handle.clone(),
        rx,
    };
    tokio::spawn(dispatcher.run());
    handle
}

struct Dispatcher {
    channel_id: String,
    handler: Arc<dyn MessageHandler>,
    relay: Option<RelayHandle>,
    /// Identity of the round currently being drained
    round: Option<RoundId>,
    /// Tasks dispatched in this round that have not completed
    open_tasks: HashSet<TaskId>,
    queue: TaskQueue<PendingTask>,
    handle: DispatcherHandle,
    rx: mpsc::UnboundedReceiver<DispatcherCommand>,
}

impl Dispatcher {
    async fn run(mut self) {
        debug!(channel_id = %self.channel_id, "Dispatcher started");
        while let Some(command) = self.rx.recv().await {
            match command {
                DispatcherCommand::Register { relay } => self.handle_register(relay),
                DispatcherCommand::Dispatch { round, messages } => {
                    self.handle_dispatch(round, messages)
                }
                DispatcherCommand::TaskDone { task_id, group } => {
                    self.handle_task_done(task_id, group)
                }
                DispatcherCommand::Shutdown => break,
            }
        }
        // Dropping the queue drops every release sender; parked workers
        // observe the closed channel and exit without reporting.
        debug!(channel_id = %self.channel_id, "Dispatcher stopped");
    }

    fn handle_register(&mut self, relay: RelayHandle) {
        self.relay = Some(relay.clone());
        relay.dispatcher_attached();
        debug!(channel_id = %self.channel_id, "Relay registered with dispatcher");
    }

    fn handle_dispatch(&mut self, round: RoundId, messages: Vec<Arc<dyn Message>>) {
        debug!(
            channel_id = %self.channel_id,
            round = %round,
            count = messages.len(),
            "Dispatch round opened"
        );
        self.round = Some(round);
        metrics::counter!("anymq_tasks_dispatched_total").increment(messages.len() as u64);
        for message in messages {
            // Task identity is per round: redelivery of the same message
            // in a later round gets a fresh id.
            let task_id = TaskId::new();
            let group = message.group_id().map(str::to_owned);
            let handler = self
                .handler
                .fresh_instance()
                .unwrap_or_else(|| Arc::clone(&self.handler));
            let (release_tx, release_rx) = oneshot::channel();
            spawn_worker(
                self.channel_id.clone(),
                task_id,
                group.clone(),
                handler,
                self.handle.clone(),
                release_rx,
            );
            self.open_tasks.insert(task_id);
            self.queue.push(group, PendingTask { task_id, message, release: release_tx });
        }
        self.release_pass();
    }

    /// Release every ungrouped task and the head of each group.
    fn release_pass(&mut self) {
        for group in self.queue.group_keys() {
            if group.is_none() {
                while let Some(task) = self.queue.pop_next(&group) {
                    self.release(task);
                }
            } else if let Some(task) = self.queue.pop_next(&group) {
                self.release(task);
            }
        }
    }

    fn release(&mut self, task: PendingTask) {
        debug!(channel_id = %self.channel_id, task_id = %task.task_id, "Task released to worker");
        if task.release.send(task.message).is_err() {
            warn!(
                channel_id = %self.channel_id,
                task_id = %task.task_id,
                "Worker vanished before release"
            );
        }
    }

    fn handle_task_done(&mut self, task_id: TaskId, group: Option<String>) {
        if self.round.is_none() || !self.open_tasks.remove(&task_id) {
            warn!(channel_id = %self.channel_id, task_id = %task_id, "Stale task completion ignored");
            return;
        }
        debug!(
            channel_id = %self.channel_id,
            task_id = %task_id,
            open = self.open_tasks.len(),
            pending = self.queue.pending(),
            "Task completed"
        );
        // A completed grouped task unblocks its group's next head.
        if let Some(task) = self.queue.pop_next(&group) {
            self.release(task);
        }
        if self.open_tasks.is_empty() {
            if let Some(round) = self.round.take() {
                debug!(channel_id = %self.channel_id, round = %round, "Dispatch round drained");
                metrics::counter!("anymq_dispatch_rounds_total").increment(1);
                match &self.relay {
                    Some(relay) => relay.round_drained(round),
                    None => warn!(
                        channel_id = %self.channel_id,
                        round = %round,
                        "Round drained with no relay registered"
                    ),
                }
            }
        }
    }
}
