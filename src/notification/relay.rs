//! 事件转发 - 将 OS 事件分发给调用方和分组注册表
//!
//! | event                 | native caller                     | groups                    |
//! |-----------------------|-----------------------------------|---------------------------|
//! | opened(child)         | action_invoked(id, "default")     | -                         |
//! | opened(summary)       | -                                 | -                         |
//! | action                | action_invoked(id, action_id)     | -                         |
//! | reply                 | inline_reply(id, text)            | -                         |
//! | deleted(child)        | finished(id)                      | child_removed             |
//! | deleted(summary)      | -                                 | group deleted             |
//!
//! Opening anything also brings the host app forward when configured.

use std::sync::Arc;

use tracing::{debug, warn};

use super::bridge::Shared;
use super::event::{InboundIntent, PlatformEvent};
use super::id::NotificationId;
use super::record::DEFAULT_ACTION_ID;

/// Routes classified OS events
#[derive(Clone)]
pub struct EventRelay {
    shared: Arc<Shared>,
}

impl EventRelay {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// 解析并处理原始事件；格式错误的事件记录日志后丢弃
    pub fn handle_intent(&self, intent: &InboundIntent) -> bool {
        match PlatformEvent::try_from(intent) {
            Ok(event) => {
                self.handle(event);
                true
            }
            Err(e) => {
                warn!(action = %intent.action, id = ?intent.id, error = %e, "Dropping malformed notification event");
                false
            }
        }
    }

    pub fn handle(&self, event: PlatformEvent) {
        debug!(event = ?event, "Notification event");
        let native = &self.shared.native;

        match event {
            PlatformEvent::Opened(id) => {
                if self.shared.config.foreground_on_activation {
                    self.shared.sink.activate_app();
                }
                if let NotificationId::Child(id) = id {
                    native.notify_action_invoked(id, DEFAULT_ACTION_ID);
                }
            }
            PlatformEvent::ActionInvoked { id, action_id } => {
                native.notify_action_invoked(id, &action_id);
            }
            PlatformEvent::Replied { id, text } => {
                native.notify_inline_reply(id, &text);
            }
            PlatformEvent::ChildDeleted { id, group } => {
                if let Some(key) = group.as_deref() {
                    self.shared
                        .with_state(|state| state.groups.child_removed(key, id));
                }
                native.notify_finished(id);
            }
            PlatformEvent::SummaryDeleted { id, group } => {
                self.shared
                    .with_state(|state| state.groups.handle_summary_deleted(&group, id));
            }
        }
    }
}
