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

//! Dispatch ordering integration tests
//!
//! ## Purpose
//! Proves the ordering contract through the whole public surface: messages
//! sharing a correlation group are handled strictly one at a time in
//! arrival order, while ungrouped messages and different groups proceed
//! in parallel. The profile here uses a poll limit wide enough that each
//! scripted backlog arrives as a single dispatch round.

use anymq_core::{ConsumerFactory, ConsumerRuntime, ConsumerSpec, MessagingConfig, TransportRegistry};
use anymq_interface::{
    BoxError, CodecError, Message, MessageCodec, MessageHandler, MessageSink, TransportConsumer,
    TransportError,
};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Barrier};
use tokio::time::sleep;

#[derive(Debug)]
struct TestMessage {
    id: String,
    group: Option<String>,
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

/// Decodes `id|group`; an empty group segment means ungrouped.
struct PlainCodec;

impl MessageCodec for PlainCodec {
    fn decode(&self, payload: &[u8]) -> Result<Box<dyn Message>, CodecError> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| CodecError::MalformedPayload(e.to_string()))?;
        let (id, group) = match text.split_once('|') {
            Some((id, group)) if !group.is_empty() => (id, Some(group.to_string())),
            Some((id, _)) => (id, None),
            None => (text, None),
        };
        Ok(Box::new(TestMessage { id: id.to_string(), group }))
    }
}

struct ScriptedTransport {
    payloads: Vec<Vec<u8>>,
    codec: Arc<dyn MessageCodec>,
    sink: Arc<dyn MessageSink>,
}

#[async_trait]
impl TransportConsumer for ScriptedTransport {
    async fn start_polling(&mut self) -> Result<(), TransportError> {
        for payload in self.payloads.drain(..) {
            let message = self
                .codec
                .decode(&payload)
                .map_err(|e| TransportError::PollingFailed(e.to_string()))?;
            self.sink.deliver(message);
        }
        Ok(())
    }

    async fn stop_polling(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

struct ScriptedFactory {
    payloads: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl ConsumerFactory for ScriptedFactory {
    fn system(&self) -> &str {
        "scripted"
    }

    async fn build_consumer(
        &self,
        spec: ConsumerSpec,
    ) -> Result<Box<dyn TransportConsumer>, TransportError> {
        Ok(Box::new(ScriptedTransport {
            payloads: std::mem::take(&mut *self.payloads.lock().unwrap()),
            codec: spec.codec,
            sink: spec.sink,
        }))
    }
}

/// Records `enter:<id>` and `exit:<id>` around each invocation, sleeping
/// in between for ids listed in `sleep_ms`.
struct TracingHandler {
    events: mpsc::UnboundedSender<String>,
    sleep_ms: HashMap<String, u64>,
}

#[async_trait]
impl MessageHandler for TracingHandler {
    async fn handle_message(&self, message: Arc<dyn Message>) -> Result<(), BoxError> {
        let id = message.id().to_string();
        let _ = self.events.send(format!("enter:{id}"));
        match self.sleep_ms.get(&id) {
            Some(ms) => sleep(Duration::from_millis(*ms)).await,
            None => tokio::task::yield_now().await,
        }
        let _ = self.events.send(format!("exit:{id}"));
        Ok(())
    }
}

fn wide_config() -> MessagingConfig {
    MessagingConfig::from_yaml_str(
        r#"
profiles:
  - name: orders-local
    system: scripted
    consumer:
      max_messages_per_batch: 50
      max_poll_interval_ms: 250
      poll_batch_limit: 50
"#,
    )
    .expect("test config must parse")
}

async fn run_backlog(
    payloads: Vec<&str>,
    handler: Arc<dyn MessageHandler>,
) -> ConsumerRuntime {
    let mut registry = TransportRegistry::new();
    registry.register_consumer(Arc::new(ScriptedFactory {
        payloads: Mutex::new(payloads.into_iter().map(|p| p.as_bytes().to_vec()).collect()),
    }));
    let mut runtime = ConsumerRuntime::new(wide_config(), Arc::new(registry));
    runtime
        .setup_consumer("orders-local", "q", Arc::new(PlainCodec), handler)
        .await
        .expect("setup must succeed");
    runtime
}

async fn collect_events(rx: &mut mpsc::UnboundedReceiver<String>, count: usize) -> Vec<String> {
    let mut events = Vec::with_capacity(count);
    for _ in 0..count {
        match tokio::time::timeout(Duration::from_secs(30), rx.recv()).await {
            Ok(Some(event)) => events.push(event),
            other => panic!("expected {count} events, got {events:?} then {other:?}"),
        }
    }
    events
}

fn index_of(events: &[String], needle: &str) -> usize {
    events
        .iter()
        .position(|e| e == needle)
        .unwrap_or_else(|| panic!("event {needle} missing from {events:?}"))
}

#[tokio::test(start_paused = true)]
async fn test_correlation_group_is_strictly_sequential() {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let handler = TracingHandler {
        events: events_tx,
        sleep_ms: HashMap::from([
            ("m0".to_string(), 50),
            ("m1".to_string(), 50),
            ("m2".to_string(), 50),
        ]),
    };

    let runtime = run_backlog(vec!["m0|orders", "m1|orders", "m2|orders"], Arc::new(handler)).await;
    let events = collect_events(&mut events_rx, 6).await;
    runtime.shutdown();

    assert_eq!(
        events,
        ["enter:m0", "exit:m0", "enter:m1", "exit:m1", "enter:m2", "exit:m2"],
        "grouped messages must never overlap or reorder"
    );
}

#[tokio::test(start_paused = true)]
async fn test_other_groups_and_ungrouped_overtake_a_busy_group() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let handler = TracingHandler {
        events: events_tx,
        sleep_ms: HashMap::from([("a0".to_string(), 100)]),
    };

    let runtime = run_backlog(
        vec!["a0|order-1", "a1|order-1", "solo", "b0|order-2"],
        Arc::new(handler),
    )
    .await;
    let events = collect_events(&mut events_rx, 8).await;
    runtime.shutdown();

    let a0_exit = index_of(&events, "exit:a0");
    assert!(
        index_of(&events, "enter:solo") < a0_exit,
        "ungrouped message must not wait for order-1: {events:?}"
    );
    assert!(
        index_of(&events, "enter:b0") < a0_exit,
        "order-2 must not wait for order-1: {events:?}"
    );
    assert!(
        index_of(&events, "enter:a1") > a0_exit,
        "second order-1 message must wait for the first: {events:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_ungrouped_messages_run_concurrently() {
    // Only concurrent execution lets all three workers meet at the
    // barrier; a sequential dispatcher would time out instead.
    struct BarrierHandler {
        barrier: Arc<Barrier>,
        events: mpsc::UnboundedSender<String>,
    }

    #[async_trait]
    impl MessageHandler for BarrierHandler {
        async fn handle_message(&self, message: Arc<dyn Message>) -> Result<(), BoxError> {
            let outcome =
                match tokio::time::timeout(Duration::from_secs(5), self.barrier.wait()).await {
                    Ok(_) => "ok",
                    Err(_) => "late",
                };
            let _ = self.events.send(format!("{outcome}:{}", message.id()));
            Ok(())
        }
    }

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let handler = BarrierHandler { barrier: Arc::new(Barrier::new(3)), events: events_tx };

    // "u1|" exercises the empty-group sentinel: it must count as ungrouped.
    let runtime = run_backlog(vec!["u0", "u1|", "u2"], Arc::new(handler)).await;
    let events = collect_events(&mut events_rx, 3).await;
    runtime.shutdown();

    assert!(
        events.iter().all(|e| e.starts_with("ok:")),
        "all three must reach the barrier together: {events:?}"
    );
}
