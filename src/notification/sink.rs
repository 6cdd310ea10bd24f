//! OS 通知接口 - 接收 post/cancel/建渠道 调用的外部服务
//!
//! Every call is fire-and-forget: the OS reports failures on its own, and
//! user interaction comes back later as [`InboundIntent`]s.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

use super::event::InboundIntent;
use super::id::NotificationId;
use super::platform::PlatformNotification;
use super::record::ChannelSpec;
use super::urgency::Importance;

/// OS notification service
pub trait NotificationSink: Send + Sync {
    /// 创建投递渠道（OS 侧幂等）
    fn create_channel(&self, spec: &ChannelSpec, importance: Importance);

    /// 提交或替换通知
    fn post(&self, id: NotificationId, notification: PlatformNotification);

    /// 取消通知
    fn cancel(&self, id: NotificationId);

    /// 将宿主应用的主界面切到前台
    fn activate_app(&self);
}

/// A call made against the sink
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SinkCall {
    CreateChannel {
        id: String,
        name: String,
        description: String,
        importance: Importance,
    },
    Post {
        id: NotificationId,
        notification: PlatformNotification,
    },
    Cancel {
        id: NotificationId,
    },
    ActivateApp,
}

#[derive(Default)]
struct RecordingState {
    calls: Vec<SinkCall>,
    live: HashMap<NotificationId, PlatformNotification>,
}

/// In-memory sink that records calls and can replay user interaction
#[derive(Default)]
pub struct RecordingSink {
    state: Mutex<RecordingState>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut RecordingState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// 所有已记录的调用
    pub fn calls(&self) -> Vec<SinkCall> {
        self.with_state(|s| s.calls.clone())
    }

    /// 取出并清空已记录的调用
    pub fn take_calls(&self) -> Vec<SinkCall> {
        self.with_state(|s| std::mem::take(&mut s.calls))
    }

    /// Currently shown notification for `id`
    pub fn posted(&self, id: NotificationId) -> Option<PlatformNotification> {
        self.with_state(|s| s.live.get(&id).cloned())
    }

    pub fn is_live(&self, id: NotificationId) -> bool {
        self.with_state(|s| s.live.contains_key(&id))
    }

    pub fn live_count(&self) -> usize {
        self.with_state(|s| s.live.len())
    }

    pub fn post_count(&self) -> usize {
        self.with_state(|s| {
            s.calls
                .iter()
                .filter(|c| matches!(c, SinkCall::Post { .. }))
                .count()
        })
    }

    pub fn channels_created(&self) -> Vec<(String, Importance)> {
        self.with_state(|s| {
            s.calls
                .iter()
                .filter_map(|c| match c {
                    SinkCall::CreateChannel { id, importance, .. } => Some((id.clone(), *importance)),
                    _ => None,
                })
                .collect()
        })
    }

    /// User taps the notification content
    pub fn tap(&self, id: NotificationId) -> Option<InboundIntent> {
        self.posted(id).map(|n| n.content_intent)
    }

    /// User presses the action button at `index`
    pub fn press(&self, id: NotificationId, index: usize) -> Option<InboundIntent> {
        self.posted(id)
            .and_then(|n| n.actions.into_iter().nth(index))
            .map(|a| a.intent)
    }

    /// User submits `text` through the first action with a text input
    pub fn reply(&self, id: NotificationId, text: &str) -> Option<InboundIntent> {
        self.posted(id)
            .and_then(|n| n.actions.into_iter().find(|a| a.reply.is_some()))
            .map(|a| a.intent.with_reply_text(text))
    }

    /// User swipes one notification away
    pub fn dismiss(&self, id: NotificationId) -> Option<InboundIntent> {
        self.with_state(|s| s.live.remove(&id)).map(|n| n.delete_intent)
    }

    /// User dismisses a whole group: every child goes first, then the summary
    pub fn dismiss_group(&self, key: &str) -> Vec<InboundIntent> {
        self.with_state(|s| {
            let mut members: Vec<(NotificationId, bool)> = s
                .live
                .iter()
                .filter(|(_, n)| n.group_key() == Some(key))
                .map(|(id, n)| (*id, n.is_summary()))
                .collect();
            members.sort_by_key(|(id, summary)| (*summary, id.raw_key()));

            members
                .into_iter()
                .filter_map(|(id, _)| s.live.remove(&id))
                .map(|n| n.delete_intent)
                .collect()
        })
    }
}

impl NotificationSink for RecordingSink {
    fn create_channel(&self, spec: &ChannelSpec, importance: Importance) {
        self.with_state(|s| {
            s.calls.push(SinkCall::CreateChannel {
                id: spec.id.clone(),
                name: spec.name.clone(),
                description: spec.description.clone(),
                importance,
            })
        });
    }

    fn post(&self, id: NotificationId, notification: PlatformNotification) {
        self.with_state(|s| {
            s.live.insert(id, notification.clone());
            s.calls.push(SinkCall::Post { id, notification });
        });
    }

    fn cancel(&self, id: NotificationId) {
        self.with_state(|s| {
            s.live.remove(&id);
            s.calls.push(SinkCall::Cancel { id });
        });
    }

    fn activate_app(&self) {
        self.with_state(|s| s.calls.push(SinkCall::ActivateApp));
    }
}
