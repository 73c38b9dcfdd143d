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

//! Ordered fan-out dispatch
//!
//! One dispatch round takes a flushed batch and runs every message on its
//! own ephemeral worker. Messages sharing a correlation group are released
//! strictly one at a time in arrival order; ungrouped messages all run in
//! parallel. The round is drained when the last worker reports back.

mod dispatcher;
mod queue;
mod worker;

pub(crate) use dispatcher::{dispatcher_mailbox, spawn_dispatcher, DispatcherCommand, DispatcherHandle};
