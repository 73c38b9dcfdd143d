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

//! Lab error taxonomy

use anymq_core::{ConfigError, SetupError};
use anymq_membroker::BrokerError;
use thiserror::Error;

/// Errors raised while assembling or using a [`crate::TestLab`]
#[derive(Error, Debug)]
pub enum LabError {
    /// Channel or producer setup failed.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// The lab configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Broker instance or queue setup failed.
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// The profile points at a backend the lab cannot host in-process.
    #[error("Profile {0} does not use the in-process broker")]
    UnsupportedSystem(String),

    /// No retention listener was registered for this profile and queue.
    #[error("No retention listener for profile {profile} and queue {queue}")]
    UnknownListener {
        /// Profile name the probe asked for.
        profile: String,
        /// Queue name the probe asked for.
        queue: String,
    },
}
