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

//! Ephemeral worker tasks

use super::dispatcher::DispatcherHandle;
use crate::consumer::TaskId;
use anymq_interface::{Message, MessageHandler};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error};

/// A task waiting in the dispatch queue: the message plus the release
/// channel of its pre-spawned worker.
pub(super) struct PendingTask {
    pub task_id: TaskId,
    pub message: Arc<dyn Message>,
    pub release: oneshot::Sender<Arc<dyn Message>>,
}

/// Spawn one worker, parked until the dispatcher releases its task.
///
/// The worker runs the handler exactly once and reports completion
/// whether the handler succeeds, fails, or panics. Failures are
/// logged and counted; they never escape the worker. Dropping the release
/// sender (dispatcher shutdown) discards the worker silently.
pub(super) fn spawn_worker(
    channel_id: String,
    task_id: TaskId,
    group: Option<String>,
    handler: Arc<dyn MessageHandler>,
    dispatcher: DispatcherHandle,
    release: oneshot::Receiver<Arc<dyn Message>>,
) {
    tokio::spawn(async move {
        let message = match release.await {
            Ok(message) => message,
            Err(_) => {
                debug!(channel_id = %channel_id, task_id = %task_id, "Worker discarded before release");
                return;
            }
        };
        debug!(
            channel_id = %channel_id,
            task_id = %task_id,
            message_id = %message.id(),
            "Worker running task"
        );
        let outcome = AssertUnwindSafe(handler.handle_message(Arc::clone(&message)))
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                metrics::counter!("anymq_handler_failures_total").increment(1);
                error!(
                    channel_id = %channel_id,
                    task_id = %task_id,
                    message_id = %message.id(),
                    error = %error,
                    "Message handler failed"
                );
            }
            Err(panic) => {
                metrics::counter!("anymq_handler_failures_total").increment(1);
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(
                    channel_id = %channel_id,
                    task_id = %task_id,
                    message_id = %message.id(),
                    reason = %reason,
                    "Message handler panicked"
                );
            }
        }
        // Completion must reach the dispatcher on every path above.
        dispatcher.task_done(task_id, group);
    });
}
