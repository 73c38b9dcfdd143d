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

//! Integration tests for the messaging lab

use anymq_core::MessagingConfig;
use anymq_interface::Message;
use anymq_simplemessage::SimpleMessage;
use anymq_testkit::{LabError, TestLab};
use std::time::Duration;

const CONFIG: &str = r#"
profiles:
  - name: orders-local
    system: membroker
    consumer:
      max_messages_per_batch: 2
      max_poll_interval_ms: 200
      properties:
        instance: alpha
        application_id: orders-app
        fetch_interval_ms: 5
    producer:
      properties:
        instance: alpha
  - name: audit-local
    system: membroker
    consumer:
      max_messages_per_batch: 2
      max_poll_interval_ms: 200
      properties:
        instance: alpha
        application_id: audit-app
        fetch_interval_ms: 5
    producer:
      properties:
        instance: alpha
"#;

fn config() -> MessagingConfig {
    MessagingConfig::from_yaml_str(CONFIG).unwrap()
}

fn message(id: &str) -> Box<dyn Message> {
    let mut message = SimpleMessage::new();
    message.set_id(id);
    message.set_sender("lab-test");
    message.set_content_schema("text/plain");
    message.set_payload(b"payload".to_vec());
    Box::new(message)
}

#[tokio::test(start_paused = true)]
async fn test_lab_round_trip_retains_published_messages() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .try_init();

    let lab = TestLab::start(config(), &[("orders-local", "orders")])
        .await
        .unwrap();
    let producer = lab.producer("orders-local", "orders").await.unwrap();

    for id in ["msg-1", "msg-2", "msg-3"] {
        producer.send(message(id)).await.unwrap();
    }

    let probe = lab
        .probe("orders-local", "orders", Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(probe.message_count(), 3);
    assert!(probe.message_by_id("msg-2").is_some());
    assert!(probe.message_by_id("ghost").is_none());

    lab.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_listeners_share_an_instance_but_not_messages() {
    let lab = TestLab::start(
        config(),
        &[("orders-local", "orders"), ("audit-local", "audit")],
    )
    .await
    .unwrap();

    let orders = lab.producer("orders-local", "orders").await.unwrap();
    let audit = lab.producer("audit-local", "audit").await.unwrap();
    orders.send(message("order-msg")).await.unwrap();
    audit.send(message("audit-msg")).await.unwrap();

    let settle = Duration::from_secs(1);
    let orders_probe = lab.probe("orders-local", "orders", settle).await.unwrap();
    let audit_probe = lab.probe("audit-local", "audit", settle).await.unwrap();

    assert_eq!(orders_probe.message_count(), 1);
    assert!(orders_probe.message_by_id("order-msg").is_some());
    assert_eq!(audit_probe.message_count(), 1);
    assert!(audit_probe.message_by_id("audit-msg").is_some());

    lab.shutdown();
}

#[tokio::test]
async fn test_probe_for_unlisted_listener_is_rejected() {
    let lab = TestLab::start(config(), &[("orders-local", "orders")])
        .await
        .unwrap();

    let err = lab
        .probe("orders-local", "ghost", Duration::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, LabError::UnknownListener { .. }));

    lab.shutdown();
}

#[tokio::test]
async fn test_profile_on_a_foreign_system_is_rejected() {
    let foreign = r#"
profiles:
  - name: orders-kafka
    system: kafka
    consumer:
      max_messages_per_batch: 2
      max_poll_interval_ms: 200
"#;
    let config = MessagingConfig::from_yaml_str(foreign).unwrap();

    let err = TestLab::start(config, &[("orders-kafka", "orders")])
        .await
        .unwrap_err();
    assert!(matches!(err, LabError::UnsupportedSystem(_)));
}
