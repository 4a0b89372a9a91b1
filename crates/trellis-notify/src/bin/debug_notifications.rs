//! Exercise the notification engine end-to-end against in-process mocks:
//! login, a burst of pushes, mark-as-read, account switch, logout. Prints
//! every published snapshot so the sync behavior can be eyeballed.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::{mpsc, watch};

use trellis_notify::alerts::{AlertLevel, AlertSink};
use trellis_notify::transport::{NotificationApi, PushSubscription, PushTransport};
use trellis_notify::{Identity, Notification, NotifyEngine, SessionState};

struct StaticApi;

impl NotificationApi for StaticApi {
    async fn fetch_unread_count(&self) -> Result<i64> {
        Ok(2)
    }

    async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        let page = json!({ "content": [
            {
                "id": "seed-2",
                "kind": "COMMENT",
                "content": "commented on your post",
                "senderName": "Moss Brook",
                "senderHandle": "moss",
                "relatedId": "post-1",
                "read": false,
                "createdAt": "2026-03-01T11:58:00Z",
            },
            {
                "id": "seed-1",
                "kind": "LIKE",
                "content": "liked your post",
                "senderName": "Fern Dale",
                "senderHandle": "fern",
                "relatedId": "post-1",
                "read": false,
                "createdAt": "2026-03-01T11:55:00Z",
            },
        ]});
        let notifications = serde_json::from_value(page["content"].clone())?;
        Ok(notifications)
    }

    async fn acknowledge_read(&self, id: &str) -> Result<()> {
        eprintln!("[API] acknowledged {} as read", id);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct ChannelPush {
    slot: Arc<Mutex<Option<mpsc::UnboundedSender<Value>>>>,
}

impl PushTransport for ChannelPush {
    async fn subscribe(&self, topic: &str) -> Result<PushSubscription> {
        eprintln!("[PUSH] subscribed to {}", topic);
        let (tx, subscription) = PushSubscription::channel();
        *self.slot.lock().unwrap() = Some(tx);
        Ok(subscription)
    }
}

struct StderrAlerts;

impl AlertSink for StderrAlerts {
    fn show(&self, level: AlertLevel, message: &str) {
        eprintln!("[ALERT {:?}] {}", level, message);
    }
}

fn push_payload(id: &str, handle: &str, kind: &str, content: &str) -> Value {
    json!({
        "id": id,
        "kind": kind,
        "content": content,
        "senderName": handle,
        "senderHandle": handle,
        "relatedId": "post-1",
        "read": false,
        "createdAt": Utc::now().to_rfc3339(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    trellis_notify::tracing_setup::init_tracing();
    eprintln!("=== Notification Engine Debugger ===\n");

    let push = ChannelPush::default();
    let (identity_tx, identity_rx) = watch::channel(None);
    let engine = NotifyEngine::new(StaticApi, push.clone(), StderrAlerts, identity_rx);
    let handle = engine.handle();
    let mut snapshots = handle.watch();
    let engine_task = tokio::spawn(engine.run());

    eprintln!("-- login as u-1");
    identity_tx.send(Some(Identity::new("u-1")))?;
    while snapshots.borrow_and_update().session != SessionState::Live {
        snapshots.changed().await?;
    }
    dump(&handle.snapshot());

    eprintln!("-- three pushes: two likes from fern, one message from reed");
    let sender = push.slot.lock().unwrap().clone().expect("not subscribed");
    sender.send(push_payload("p-1", "fern", "LIKE", "liked your post"))?;
    sender.send(push_payload("p-2", "fern", "LIKE", "liked your post"))?;
    sender.send(push_payload("p-3", "reed", "MESSAGE", "New message from Reed Bank"))?;
    while snapshots.borrow_and_update().unread_count != 5 {
        snapshots.changed().await?;
    }
    dump(&handle.snapshot());

    eprintln!("-- mark fern's like group as read");
    let snapshot = handle.snapshot();
    let fern_group = snapshot
        .groups
        .iter()
        .find(|g| g.sender_handle == "fern" && g.has_unread)
        .expect("fern group");
    // The group folds both pushed likes and the baseline one: three reads
    handle.mark_group_as_read(fern_group)?;
    while snapshots.borrow_and_update().unread_count != 2 {
        snapshots.changed().await?;
    }
    dump(&handle.snapshot());

    eprintln!("-- logout");
    identity_tx.send(None)?;
    while snapshots.borrow_and_update().session != SessionState::Unbound {
        snapshots.changed().await?;
    }
    dump(&handle.snapshot());

    handle.shutdown()?;
    engine_task.await?;
    eprintln!("\n✓ done");
    Ok(())
}

fn dump(snapshot: &trellis_notify::EngineSnapshot) {
    eprintln!(
        "state={:?} unread={} groups={}",
        snapshot.session,
        snapshot.unread_count,
        snapshot.groups.len()
    );
    for group in &snapshot.groups {
        eprintln!(
            "  {} {} ({} folded{})",
            group.latest.sender_name,
            group.display_text(),
            group.count,
            if group.has_unread { ", unread" } else { "" }
        );
    }
    eprintln!();
}
