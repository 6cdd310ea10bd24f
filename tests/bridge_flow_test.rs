//! 端到端测试 - 调用方 post/close，OS 回传事件，调用方收到回调

use std::sync::Arc;
use std::thread;

use notification_bridge::notification::{
    BridgeBuilder, ChannelSpec, ChildId, Importance, InboundIntent, NativeSignal, NotificationBridge,
    NotificationId, NotificationRecord, PlatformCapabilities, RecordingNativeSink, RecordingSink,
    ReplySpec, SinkCall, Urgency,
};
use notification_bridge::BridgeConfig;

struct Harness {
    bridge: NotificationBridge,
    sink: Arc<RecordingSink>,
    native: Arc<RecordingNativeSink>,
}

fn harness(api_level: u32) -> Harness {
    let sink = Arc::new(RecordingSink::new());
    let native = Arc::new(RecordingNativeSink::new());
    let bridge = BridgeBuilder::new(sink.clone(), native.clone())
        .config(BridgeConfig {
            api_level,
            ..Default::default()
        })
        .build();
    Harness { bridge, sink, native }
}

fn message(id: u32) -> NotificationRecord {
    NotificationRecord::new(id, ChannelSpec::new("im", "Instant messages", "Incoming chat messages"))
        .with_title("Konqi")
        .with_text(format!("message {}", id))
        .with_group("chat")
        .with_urgency(Urgency::High)
}

fn child(id: u32) -> NotificationId {
    NotificationId::Child(ChildId(id))
}

#[test]
fn test_conversation_lifecycle_through_os_events() {
    let h = harness(34);
    h.bridge.post(&message(1).with_reply(ReplySpec::new("Reply")));
    h.bridge.post(&message(2).with_action("mark-read", "Mark as read"));

    assert_eq!(
        h.sink.channels_created(),
        vec![("im".to_string(), Importance::Default)]
    );
    let summary = h.bridge.group_snapshot("chat").unwrap().summary;
    assert!(h.sink.is_live(summary.into()));

    // 用户回复第一条
    let reply = h.sink.reply(child(1), "be right there").unwrap();
    assert!(h.bridge.handle_intent(&reply));

    // 用户对第二条点 "Mark as read"
    let press = h.sink.press(child(2), 0).unwrap();
    assert!(h.bridge.handle_intent(&press));

    // 用户清除整个分组
    for intent in h.sink.dismiss_group("chat") {
        assert!(h.bridge.handle_intent(&intent));
    }

    assert_eq!(
        h.native.signals(),
        vec![
            NativeSignal::InlineReply {
                id: ChildId(1),
                text: "be right there".to_string()
            },
            NativeSignal::ActionInvoked {
                id: ChildId(2),
                action_id: "mark-read".to_string()
            },
            NativeSignal::Finished { id: ChildId(1) },
            NativeSignal::Finished { id: ChildId(2) },
        ]
    );
    assert_eq!(h.bridge.group_count(), 0);
    assert_eq!(h.sink.live_count(), 0);
}

#[test]
fn test_group_recreated_after_close_gets_new_summary() {
    let h = harness(34);
    h.bridge.post(&message(1));
    let first = h.bridge.group_snapshot("chat").unwrap().summary;

    h.bridge.close(ChildId(1), Some("chat"));
    assert!(h.bridge.group_snapshot("chat").is_none());
    assert!(h
        .sink
        .calls()
        .contains(&SinkCall::Cancel { id: first.into() }));

    h.bridge.post(&message(2));
    let second = h.bridge.group_snapshot("chat").unwrap().summary;
    assert_ne!(first, second);
    assert!(h.sink.is_live(second.into()));
}

#[test]
fn test_malformed_events_never_reach_native() {
    let h = harness(34);
    h.bridge.post(&message(1));

    let malformed = [
        InboundIntent {
            action: "notification.opened".to_string(),
            ..Default::default()
        },
        InboundIntent {
            action: "notification.reply".to_string(),
            id: Some(1),
            kind: Some("child".to_string()),
            ..Default::default()
        },
        InboundIntent {
            action: "notification.deleted".to_string(),
            id: Some(0),
            kind: Some("summary".to_string()),
            ..Default::default()
        },
    ];
    for intent in &malformed {
        assert!(!h.bridge.handle_intent(intent));
    }

    assert!(h.native.signals().is_empty());
    assert!(h.bridge.group_snapshot("chat").is_some());
}

#[test]
fn test_legacy_platform_end_to_end() {
    let sink = Arc::new(RecordingSink::new());
    let native = Arc::new(RecordingNativeSink::new());
    let bridge = BridgeBuilder::new(sink.clone(), native.clone())
        .capabilities(PlatformCapabilities::for_api_level(22))
        .build();

    bridge.post(&message(1).with_reply(ReplySpec::new("Reply")));
    assert!(sink.channels_created().is_empty());
    let n = sink.posted(child(1)).unwrap();
    assert!(n.actions.is_empty());
    assert!(n.priority.is_some());

    bridge.handle_intent(&sink.tap(child(1)).unwrap());
    assert_eq!(
        native.signals(),
        vec![NativeSignal::ActionInvoked {
            id: ChildId(1),
            action_id: "default".to_string()
        }]
    );
}

#[test]
fn test_shutdown_cancels_summaries() {
    let h = harness(34);
    h.bridge.post(&message(1));
    let summary = h.bridge.group_snapshot("chat").unwrap().summary;

    h.bridge.shutdown();
    assert!(!h.sink.is_live(summary.into()));
    assert!(h.sink.is_live(child(1)));
}

#[test]
fn test_moved_child_does_not_pin_old_group() {
    let h = harness(34);
    h.bridge.post(&message(1).with_group("a"));
    let old = h.bridge.group_snapshot("a").unwrap().summary;

    // 同一 ID 更新到另一个分组
    h.bridge.post(&message(1).with_group("b"));
    let dismissed = h.sink.dismiss(child(1)).unwrap();
    assert!(h.bridge.handle_intent(&dismissed));

    assert!(h.bridge.group_snapshot("a").is_none());
    assert!(!h.sink.is_live(old.into()));
    assert!(h.bridge.group_snapshot("b").unwrap().children.is_empty());
    assert_eq!(h.native.signals(), vec![NativeSignal::Finished { id: ChildId(1) }]);
}

#[test]
fn test_concurrent_posts_create_channel_and_summary_first() {
    let h = harness(34);
    thread::scope(|scope| {
        for id in 1..=8 {
            let bridge = &h.bridge;
            scope.spawn(move || bridge.post(&message(id)));
        }
    });

    let summary = h.bridge.group_snapshot("chat").unwrap().summary;
    let calls = h.sink.calls();
    assert!(matches!(calls.first(), Some(SinkCall::CreateChannel { .. })));
    assert!(matches!(
        calls.get(1),
        Some(SinkCall::Post { id, .. }) if *id == NotificationId::from(summary)
    ));
    assert_eq!(h.sink.post_count(), 9);
    assert_eq!(h.bridge.group_snapshot("chat").unwrap().children.len(), 8);
}

#[test]
fn test_concurrent_post_and_close_leave_consistent_state() {
    for _ in 0..50 {
        let h = harness(34);
        thread::scope(|scope| {
            let bridge = &h.bridge;
            scope.spawn(move || bridge.post(&message(1)));
            scope.spawn(move || bridge.close(ChildId(1), Some("chat")));
        });

        match h.bridge.group_snapshot("chat") {
            Some(group) => {
                assert!(h.sink.is_live(group.summary.into()));
                assert!(h.sink.is_live(child(1)));
                assert_eq!(h.sink.live_count(), 2);
            }
            None => assert_eq!(h.sink.live_count(), 0),
        }
    }
}
