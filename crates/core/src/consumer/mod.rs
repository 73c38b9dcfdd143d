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

//! The consumption pipeline
//!
//! One channel is four cooperating units, each a tokio task with an mpsc
//! mailbox:
//!
//! - **session**: owns the transport consumer and the message buffer; runs
//!   poll rounds and flushes bounded batches
//! - **relay**: handshakes the units together, forwards batches, re-polls
//!   after empty rounds and drained dispatches
//! - **dispatcher**: fans one batch out to ephemeral workers with strict
//!   per-group ordering
//! - **coordinator**: wires everything up and gates startup
//!
//! [`ConsumerRuntime`] is the public entry point; [`ChannelHandle`] controls
//! one running channel.

mod channel;
mod deadline;
mod dispatch;
mod relay;
mod runtime;
mod session;
#[cfg(test)]
pub(crate) mod test_support;

pub use channel::ChannelHandle;
pub use runtime::ConsumerRuntime;

use std::fmt;
use ulid::Ulid;

/// Identity of one poll round.
///
/// A fresh id is minted every time the session opens a round; everything
/// downstream (deadline expiry, batch hand-off, dispatch completion) quotes
/// the id, which is how stale signals from superseded rounds are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RoundId(Ulid);

impl RoundId {
    pub(crate) fn new() -> Self {
        Self(Ulid::new())
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of one dispatched task. Minted per message per round; the same
/// message dispatched in two rounds gets two distinct task ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TaskId(Ulid);

impl TaskId {
    pub(crate) fn new() -> Self {
        Self(Ulid::new())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
