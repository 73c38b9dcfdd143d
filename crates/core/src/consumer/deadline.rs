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

//! One-shot poll deadlines

use super::session::SessionHandle;
use super::RoundId;
use std::time::Duration;
use tracing::debug;

/// Arm the deadline for one poll round.
///
/// Sleeps `wait`, then unconditionally reports expiry to the session. The
/// deadline is never cancelled; a round that already closed (or was
/// superseded) makes the report stale, and the session discards it by
/// comparing round ids. A sleeping task occupies no executor thread, so
/// arming one per round is cheap.
pub(crate) fn spawn_poll_deadline(session: SessionHandle, round: RoundId, wait: Duration) {
    tokio::spawn(async move {
        debug!(round = %round, wait_ms = wait.as_millis() as u64, "Poll deadline armed");
        tokio::time::sleep(wait).await;
        session.expire(round);
    });
}
