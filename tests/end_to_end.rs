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

//! Full-stack tests: producer -> broker -> pipeline -> handler

use anymq::{Message, MessagingConfig, SimpleMessage};
use anymq_testkit::TestLab;
use std::time::Duration;

const CONFIG: &str = r#"
profiles:
  - name: orders-local
    system: membroker
    consumer:
      max_messages_per_batch: 5
      max_poll_interval_ms: 200
      poll_batch_limit: 10
      properties:
        instance: alpha
        application_id: orders-app
        fetch_interval_ms: 5
    producer:
      properties:
        instance: alpha
"#;

fn config() -> MessagingConfig {
    MessagingConfig::from_yaml_str(CONFIG).unwrap()
}

fn message(id: &str, group: Option<&str>, payload: &[u8]) -> Box<dyn Message> {
    let mut message = SimpleMessage::new();
    message.set_id(id);
    message.set_sender("orders-app");
    message.set_content_schema("application/json");
    message.set_payload(payload.to_vec());
    if let Some(group) = group {
        message.set_group_id(group);
    }
    Box::new(message)
}

#[tokio::test(start_paused = true)]
async fn test_grouped_messages_arrive_in_publish_order() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .try_init();

    let lab = TestLab::start(config(), &[("orders-local", "orders")]).await?;
    let producer = lab.producer("orders-local", "orders").await?;

    // Interleave one correlation group with ungrouped traffic.
    producer.send(message("g-1", Some("order-42"), b"{}")).await?;
    producer.send(message("u-1", None, b"{}")).await?;
    producer.send(message("g-2", Some("order-42"), b"{}")).await?;
    producer.send(message("u-2", None, b"{}")).await?;
    producer.send(message("g-3", Some("order-42"), b"{}")).await?;
    producer.send(message("g-4", Some("order-42"), b"{}")).await?;
    producer.send(message("u-3", None, b"{}")).await?;

    let probe = lab
        .probe("orders-local", "orders", Duration::from_secs(2))
        .await?;
    assert_eq!(probe.message_count(), 7);

    let group_order: Vec<&str> = probe
        .messages()
        .iter()
        .filter(|kept| kept.group_id() == Some("order-42"))
        .map(|kept| kept.id())
        .collect();
    assert_eq!(group_order, vec!["g-1", "g-2", "g-3", "g-4"]);

    lab.shutdown();
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_payload_survives_the_full_stack() -> anyhow::Result<()> {
    let lab = TestLab::start(config(), &[("orders-local", "orders")]).await?;
    let producer = lab.producer("orders-local", "orders").await?;

    let body = serde_json::json!({ "order": 42, "status": "placed" });
    producer
        .send(message("order-msg", Some("order-42"), &serde_json::to_vec(&body)?))
        .await?;

    let probe = lab
        .probe("orders-local", "orders", Duration::from_secs(1))
        .await?;
    let received = probe
        .message_by_id("order-msg")
        .expect("message should arrive");

    let concrete = received
        .as_any()
        .downcast_ref::<SimpleMessage>()
        .expect("queue carries SimpleMessages");
    assert_eq!(concrete.sender(), "orders-app");
    assert_eq!(concrete.content_schema(), "application/json");

    let decoded: serde_json::Value = serde_json::from_slice(concrete.payload())?;
    assert_eq!(decoded["order"], 42);
    assert_eq!(decoded["status"], "placed");

    lab.shutdown();
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_messages_published_after_a_lull_still_arrive() -> anyhow::Result<()> {
    let lab = TestLab::start(config(), &[("orders-local", "orders")]).await?;
    let producer = lab.producer("orders-local", "orders").await?;

    producer.send(message("early", None, b"{}")).await?;
    let first = lab
        .probe("orders-local", "orders", Duration::from_secs(1))
        .await?;
    assert_eq!(first.message_count(), 1);

    // The channel keeps cycling poll rounds on its own.
    producer.send(message("late", None, b"{}")).await?;
    let second = lab
        .probe("orders-local", "orders", Duration::from_secs(1))
        .await?;
    assert_eq!(second.message_count(), 2);
    assert!(second.message_by_id("late").is_some());

    lab.shutdown();
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_finalize_stamps_ids_on_the_way_out() -> anyhow::Result<()> {
    let lab = TestLab::start(config(), &[("orders-local", "orders")]).await?;
    let producer = lab.producer("orders-local", "orders").await?;

    // No id pinned: the producer stamps one during finalize.
    let mut unstamped = SimpleMessage::new();
    unstamped.set_sender("orders-app");
    unstamped.set_payload(b"{}".to_vec());
    producer.send(Box::new(unstamped)).await?;

    let probe = lab
        .probe("orders-local", "orders", Duration::from_secs(1))
        .await?;
    assert_eq!(probe.message_count(), 1);
    let received = &probe.messages()[0];
    assert!(ulid::Ulid::from_string(received.id()).is_ok());

    lab.shutdown();
    Ok(())
}
