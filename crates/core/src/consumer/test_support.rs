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

//! Shared fixtures for the consumer unit tests.

use anymq_interface::{CodecError, Message};
use std::any::Any;
use std::sync::Arc;

/// Minimal message for driving the pipeline units directly.
#[derive(Debug)]
pub(crate) struct TestMessage {
    id: String,
    group: Option<String>,
}

impl TestMessage {
    pub(crate) fn new(id: &str, group: Option<&str>) -> Arc<dyn Message> {
        Arc::new(Self { id: id.to_string(), group: group.map(str::to_owned) })
    }

    /// Boxed variant for driving the sink seam.
    pub(crate) fn boxed(id: &str, group: Option<&str>) -> Box<dyn Message> {
        Box::new(Self { id: id.to_string(), group: group.map(str::to_owned) })
    }
}

impl Message for TestMessage {
    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> &str {
        "1.0"
    }

    fn header_schema(&self) -> &str {
        "test.message"
    }

    fn group_id(&self) -> Option<&str> {
        self.group.as_deref()
    }

    fn finalize(&mut self) -> Result<(), CodecError> {
        Ok(())
    }

    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        Ok(self.id.clone().into_bytes())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
