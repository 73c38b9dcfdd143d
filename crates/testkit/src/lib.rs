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

//! # anymq-testkit
//!
//! ## Purpose
//! End-to-end verification tooling for anymq applications. A [`TestLab`]
//! stands up an in-process broker with listening channels that retain
//! everything they receive, so a test can publish messages and then
//! assert over what actually came through the full consumption pipeline.
//!
//! ## Key Components
//! - [`TestLab`]: broker + consumers + producers for one test
//! - [`RetentionHandler`]: handler retaining every received message
//! - [`MessageProbe`]: point-in-time snapshot used for assertions
//!
//! ## Examples
//! ```rust,no_run
//! use anymq_core::MessagingConfig;
//! use anymq_testkit::TestLab;
//! use std::time::Duration;
//!
//! # async fn demo(config: MessagingConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let lab = TestLab::start(config, &[("orders-local", "orders")]).await?;
//!
//! // ... publish through lab.producer("orders-local", "orders") ...
//!
//! let probe = lab
//!     .probe("orders-local", "orders", Duration::from_millis(200))
//!     .await?;
//! assert_eq!(probe.message_count(), 0);
//! lab.shutdown();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod lab;
mod probe;
mod retention;

pub use error::LabError;
pub use lab::TestLab;
pub use probe::MessageProbe;
pub use retention::{RetainedMessages, RetentionHandler};
