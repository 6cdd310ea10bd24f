//! 入站事件 - OS 回传的点击、操作、回复和删除事件
//!
//! The OS hands events back as loosely-typed [`InboundIntent`]s carrying the
//! extras that were attached when the notification was built. They are
//! classified exactly once, here, into a typed [`PlatformEvent`]. The `kind`
//! extra decides whether the id is a caller id or a summary id.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{ChildId, IdKind, NotificationId, SummaryId};

/// Intent action: notification content was tapped
pub const INTENT_OPENED: &str = "notification.opened";
/// Intent action: an action button was pressed
pub const INTENT_ACTION: &str = "notification.action";
/// Intent action: an inline reply was submitted
pub const INTENT_REPLY: &str = "notification.reply";
/// Intent action: the notification was removed
pub const INTENT_DELETED: &str = "notification.deleted";

/// Raw event as delivered by the OS
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundIntent {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_text: Option<String>,
}

impl InboundIntent {
    fn addressed(action: &str, id: NotificationId) -> Self {
        let number = match id {
            NotificationId::Child(c) => c.0,
            NotificationId::Summary(s) => s.seq(),
        };
        Self {
            action: action.to_string(),
            id: Some(number),
            kind: Some(id.kind().as_str().to_string()),
            ..Default::default()
        }
    }

    pub fn opened(id: NotificationId, group: Option<&str>) -> Self {
        let mut intent = Self::addressed(INTENT_OPENED, id);
        intent.group = group.map(str::to_string);
        intent
    }

    pub fn action(id: ChildId, action_id: impl Into<String>) -> Self {
        let mut intent = Self::addressed(INTENT_ACTION, id.into());
        intent.action_id = Some(action_id.into());
        intent
    }

    /// Reply intent template; the OS fills in `reply_text` on submission
    pub fn reply(id: ChildId) -> Self {
        Self::addressed(INTENT_REPLY, id.into())
    }

    pub fn deleted(id: NotificationId, group: Option<&str>) -> Self {
        let mut intent = Self::addressed(INTENT_DELETED, id);
        intent.group = group.map(str::to_string);
        intent
    }

    pub fn with_reply_text(mut self, text: impl Into<String>) -> Self {
        self.reply_text = Some(text.into());
        self
    }
}

/// 入站事件解析错误（记录日志后丢弃，不转发给调用方）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("event has no notification id")]
    MissingId,
    #[error("event has no id kind")]
    MissingKind,
    #[error("unknown id kind: {0}")]
    UnknownKind(String),
    #[error("unknown event action: {0}")]
    UnknownAction(String),
    #[error("action event has no action id")]
    MissingActionId,
    #[error("reply event has no reply text")]
    MissingReplyText,
    #[error("summary event has no group key")]
    MissingGroup,
    #[error("{0} event cannot target a summary")]
    UnexpectedSummary(&'static str),
}

/// Classified inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    Opened(NotificationId),
    ActionInvoked { id: ChildId, action_id: String },
    Replied { id: ChildId, text: String },
    ChildDeleted { id: ChildId, group: Option<String> },
    SummaryDeleted { id: SummaryId, group: String },
}

impl PlatformEvent {
    pub fn id(&self) -> NotificationId {
        match self {
            PlatformEvent::Opened(id) => *id,
            PlatformEvent::ActionInvoked { id, .. }
            | PlatformEvent::Replied { id, .. }
            | PlatformEvent::ChildDeleted { id, .. } => NotificationId::Child(*id),
            PlatformEvent::SummaryDeleted { id, .. } => NotificationId::Summary(*id),
        }
    }
}

fn classify(intent: &InboundIntent) -> Result<NotificationId, EventError> {
    let number = intent.id.ok_or(EventError::MissingId)?;
    let raw_kind = intent.kind.as_deref().ok_or(EventError::MissingKind)?;
    match IdKind::parse(raw_kind) {
        Some(IdKind::Child) => Ok(NotificationId::Child(ChildId(number))),
        Some(IdKind::Summary) => Ok(NotificationId::Summary(SummaryId::new(number))),
        None => Err(EventError::UnknownKind(raw_kind.to_string())),
    }
}

fn child_only(id: NotificationId, what: &'static str) -> Result<ChildId, EventError> {
    match id {
        NotificationId::Child(c) => Ok(c),
        NotificationId::Summary(_) => Err(EventError::UnexpectedSummary(what)),
    }
}

impl TryFrom<&InboundIntent> for PlatformEvent {
    type Error = EventError;

    fn try_from(intent: &InboundIntent) -> Result<Self, Self::Error> {
        let id = classify(intent)?;

        match intent.action.as_str() {
            INTENT_OPENED => Ok(PlatformEvent::Opened(id)),
            INTENT_ACTION => {
                let id = child_only(id, "action")?;
                let action_id = intent
                    .action_id
                    .clone()
                    .filter(|a| !a.is_empty())
                    .ok_or(EventError::MissingActionId)?;
                Ok(PlatformEvent::ActionInvoked { id, action_id })
            }
            INTENT_REPLY => {
                let id = child_only(id, "reply")?;
                let text = intent.reply_text.clone().ok_or(EventError::MissingReplyText)?;
                Ok(PlatformEvent::Replied { id, text })
            }
            INTENT_DELETED => match id {
                NotificationId::Child(id) => Ok(PlatformEvent::ChildDeleted {
                    id,
                    group: intent.group.clone(),
                }),
                NotificationId::Summary(id) => {
                    let group = intent.group.clone().ok_or(EventError::MissingGroup)?;
                    Ok(PlatformEvent::SummaryDeleted { id, group })
                }
            },
            other => Err(EventError::UnknownAction(other.to_string())),
        }
    }
}

impl TryFrom<InboundIntent> for PlatformEvent {
    type Error = EventError;

    fn try_from(intent: InboundIntent) -> Result<Self, Self::Error> {
        PlatformEvent::try_from(&intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opened_child() {
        let intent = InboundIntent::opened(ChildId(1).into(), None);
        let event = PlatformEvent::try_from(&intent).unwrap();
        assert_eq!(event, PlatformEvent::Opened(NotificationId::Child(ChildId(1))));
    }

    #[test]
    fn test_opened_summary() {
        let intent = InboundIntent::opened(SummaryId::new(0).into(), Some("chat"));
        let event = PlatformEvent::try_from(&intent).unwrap();
        assert_eq!(event.id().kind(), IdKind::Summary);
    }

    #[test]
    fn test_action() {
        let intent = InboundIntent::action(ChildId(2), "mark-read");
        let event = PlatformEvent::try_from(intent).unwrap();
        assert_eq!(
            event,
            PlatformEvent::ActionInvoked {
                id: ChildId(2),
                action_id: "mark-read".to_string()
            }
        );
    }

    #[test]
    fn test_reply_requires_text() {
        let intent = InboundIntent::reply(ChildId(3));
        assert_eq!(PlatformEvent::try_from(&intent), Err(EventError::MissingReplyText));

        let intent = intent.with_reply_text("on my way");
        assert_eq!(
            PlatformEvent::try_from(&intent),
            Ok(PlatformEvent::Replied {
                id: ChildId(3),
                text: "on my way".to_string()
            })
        );
    }

    #[test]
    fn test_deleted_child_keeps_group() {
        let intent = InboundIntent::deleted(ChildId(4).into(), Some("chat"));
        assert_eq!(
            PlatformEvent::try_from(&intent),
            Ok(PlatformEvent::ChildDeleted {
                id: ChildId(4),
                group: Some("chat".to_string())
            })
        );
    }

    #[test]
    fn test_deleted_summary_requires_group() {
        let intent = InboundIntent::deleted(SummaryId::new(1).into(), None);
        assert_eq!(PlatformEvent::try_from(&intent), Err(EventError::MissingGroup));
    }

    #[test]
    fn test_same_number_classified_by_tag() {
        let child = InboundIntent::deleted(ChildId(9).into(), Some("g"));
        let summary = InboundIntent::deleted(SummaryId::new(9).into(), Some("g"));
        assert!(matches!(
            PlatformEvent::try_from(&child),
            Ok(PlatformEvent::ChildDeleted { .. })
        ));
        assert!(matches!(
            PlatformEvent::try_from(&summary),
            Ok(PlatformEvent::SummaryDeleted { .. })
        ));
    }

    #[test]
    fn test_malformed_intents() {
        let no_id = InboundIntent {
            action: INTENT_OPENED.to_string(),
            kind: Some("child".to_string()),
            ..Default::default()
        };
        assert_eq!(PlatformEvent::try_from(&no_id), Err(EventError::MissingId));

        let no_kind = InboundIntent {
            action: INTENT_OPENED.to_string(),
            id: Some(1),
            ..Default::default()
        };
        assert_eq!(PlatformEvent::try_from(&no_kind), Err(EventError::MissingKind));

        let bad_kind = InboundIntent {
            kind: Some("parent".to_string()),
            ..no_kind.clone()
        };
        assert_eq!(
            PlatformEvent::try_from(&bad_kind),
            Err(EventError::UnknownKind("parent".to_string()))
        );

        let bad_action = InboundIntent {
            action: "notification.snoozed".to_string(),
            kind: Some("child".to_string()),
            ..no_kind
        };
        assert_eq!(
            PlatformEvent::try_from(&bad_action),
            Err(EventError::UnknownAction("notification.snoozed".to_string()))
        );

        let mut no_action_id = InboundIntent::action(ChildId(1), "x");
        no_action_id.action_id = None;
        assert_eq!(PlatformEvent::try_from(&no_action_id), Err(EventError::MissingActionId));
    }

    #[test]
    fn test_action_on_summary_rejected() {
        let mut intent = InboundIntent::action(ChildId(1), "x");
        intent.kind = Some("summary".to_string());
        assert_eq!(
            PlatformEvent::try_from(&intent),
            Err(EventError::UnexpectedSummary("action"))
        );
    }

    #[test]
    fn test_intent_json_roundtrip_shape() {
        let json = r#"{"action":"notification.reply","id":5,"kind":"child","reply_text":"ok"}"#;
        let intent: InboundIntent = serde_json::from_str(json).unwrap();
        assert_eq!(
            PlatformEvent::try_from(&intent).unwrap(),
            PlatformEvent::Replied {
                id: ChildId(5),
                text: "ok".to_string()
            }
        );
    }
}
