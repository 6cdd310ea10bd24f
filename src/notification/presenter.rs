//! 通知展示 - 把调用方的通知记录翻译成 OS 通知
//!
//! `post` ensures the delivery channel, joins the group (posting its summary
//! on first use), builds the platform notification and submits it. Nothing
//! here can fail: unsupported features are skipped, the OS reports its own
//! submission failures.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::bridge::Shared;
use super::event::InboundIntent;
use super::group::GroupJoin;
use super::id::{ChildId, NotificationId, SummaryId};
use super::platform::{
    ContentStyle, GroupTag, Icon, PlatformAction, PlatformCapabilities, PlatformNotification, ReplyInput,
};
use super::record::{NotificationRecord, ReplyFallback, ReplySpec, DEFAULT_ACTION_ID, INLINE_REPLY_ACTION_ID};
use super::urgency::legacy_priority_for;

/// Posts and closes notifications
#[derive(Clone)]
pub struct Presenter {
    shared: Arc<Shared>,
}

impl Presenter {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// 提交通知（同一 ID 再次提交即替换）
    pub fn post(&self, record: &NotificationRecord) {
        info!(id = %record.id, channel = %record.channel.id, group = ?record.group, "Posting notification");
        self.shared.serialized(|| self.submit(record));
    }

    /// 关闭通知；若是分组中最后一个子通知，同时取消摘要
    pub fn close(&self, id: ChildId, group: Option<&str>) {
        info!(id = %id, group = ?group, "Closing notification");
        self.shared.serialized(|| {
            self.shared.sink.cancel(id.into());

            let Some(key) = group else {
                return;
            };
            let summary = self.shared.with_state(|state| state.groups.remove_child(key, id));
            if let Some(summary) = summary {
                debug!(group = %key, summary = %summary, "Cancelling group summary");
                self.shared.sink.cancel(summary.into());
            }
        });
    }

    fn submit(&self, record: &NotificationRecord) {
        let caps = self.shared.capabilities;
        let group = record.group.as_deref();
        let (new_channel, left, join) = self.shared.with_state(|state| {
            let new_channel = state.channels.ensure(&record.channel, record.urgency);
            // 更新时换了分组：先按关闭处理旧分组
            let left = state.groups.leave_other_group(record.id, group);
            let join = group.map(|key| state.groups.ensure_group(key, record.id));
            (new_channel, left, join)
        });

        if let Some((old_key, summary)) = left {
            debug!(group = %old_key, summary = %summary, "Cancelling summary of the group left behind");
            self.shared.sink.cancel(summary.into());
        }

        if let Some(importance) = new_channel {
            if caps.channels {
                self.shared.sink.create_channel(&record.channel, importance);
            } else {
                debug!(channel = %record.channel.id, "Platform has no delivery channels, using legacy priority");
            }
        }

        if let (Some(key), Some(GroupJoin::Created(summary))) = (group, join) {
            self.post_summary(key, summary, record);
        }

        let notification = self.build(record);
        self.shared.sink.post(record.id.into(), notification);
    }

    fn post_summary(&self, key: &str, summary: SummaryId, first_child: &NotificationRecord) {
        let id = NotificationId::Summary(summary);
        let caps = self.shared.capabilities;
        let text = self
            .shared
            .config
            .summary_text
            .clone()
            .unwrap_or_else(|| first_child.text.clone());

        let notification = PlatformNotification {
            channel_id: caps.channels.then(|| first_child.channel.id.clone()),
            icon: icon_for(first_child, &caps),
            title: first_child.title.clone(),
            text,
            style: ContentStyle::Plain,
            visibility: caps.visibility.then_some(first_child.visibility),
            priority: (!caps.channels).then(|| legacy_priority_for(first_child.urgency)),
            group: Some(GroupTag {
                key: key.to_string(),
                summary: true,
            }),
            content_intent: InboundIntent::opened(id, Some(key)),
            actions: Vec::new(),
            delete_intent: InboundIntent::deleted(id, Some(key)),
        };

        debug!(group = %key, summary = %summary, "Posting group summary");
        self.shared.sink.post(id, notification);
    }

    fn build(&self, record: &NotificationRecord) -> PlatformNotification {
        let caps = self.shared.capabilities;
        let id = NotificationId::Child(record.id);
        let group = record.group.as_deref();

        if !caps.visibility {
            debug!(id = %record.id, "Visibility not supported, omitted");
        }

        let mut actions: Vec<PlatformAction> = record
            .actions
            .iter()
            .filter(|action| {
                let reserved = action.id.is_empty() || action.id == DEFAULT_ACTION_ID;
                if reserved {
                    warn!(id = %record.id, action = %action.id, "Skipping action with reserved id");
                }
                !reserved
            })
            .map(|action| PlatformAction {
                label: action.label.clone(),
                intent: InboundIntent::action(record.id, action.id.clone()),
                reply: None,
            })
            .collect();

        if let Some(reply) = &record.reply {
            if let Some(action) = reply_action(record.id, reply, &caps) {
                actions.push(action);
            }
        }

        PlatformNotification {
            channel_id: caps.channels.then(|| record.channel.id.clone()),
            icon: icon_for(record, &caps),
            title: record.title.clone(),
            text: record.text.clone(),
            style: match &record.rich_text {
                Some(rich) => ContentStyle::BigText(rich.clone()),
                None => ContentStyle::Plain,
            },
            visibility: caps.visibility.then_some(record.visibility),
            priority: (!caps.channels).then(|| legacy_priority_for(record.urgency)),
            group: group.map(|key| GroupTag {
                key: key.to_string(),
                summary: false,
            }),
            content_intent: InboundIntent::opened(id, group),
            actions,
            delete_intent: InboundIntent::deleted(id, group),
        }
    }
}

fn icon_for(record: &NotificationRecord, caps: &PlatformCapabilities) -> Icon {
    match &record.icon {
        Some(data) if caps.custom_icons && !data.is_empty() => Icon::Data(data.clone()),
        _ => Icon::AppDefault,
    }
}

fn reply_action(id: ChildId, reply: &ReplySpec, caps: &PlatformCapabilities) -> Option<PlatformAction> {
    if caps.inline_reply {
        return Some(PlatformAction {
            label: reply.label.clone(),
            intent: InboundIntent::reply(id),
            reply: Some(ReplyInput {
                placeholder: reply.placeholder.clone(),
                submit_label: reply.submit_label.clone(),
            }),
        });
    }

    match reply.fallback {
        ReplyFallback::Hide => {
            debug!(id = %id, "Inline reply not supported, hiding reply action");
            None
        }
        ReplyFallback::RegularAction => Some(PlatformAction {
            label: reply.label.clone(),
            intent: InboundIntent::action(id, INLINE_REPLY_ACTION_ID),
            reply: None,
        }),
    }
}
