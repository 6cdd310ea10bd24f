//! 通知记录 - 调用方提交的完整通知数据

use serde::{Deserialize, Serialize};

use super::id::ChildId;
use super::urgency::Urgency;

/// Action id reserved for activating the notification content
pub const DEFAULT_ACTION_ID: &str = "default";

/// Action id signalled when an inline reply falls back to a regular button
pub const INLINE_REPLY_ACTION_ID: &str = "inline-reply";

/// 锁屏可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
    Secret,
}

/// 投递渠道
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ChannelSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// 操作按钮
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub id: String,
    pub label: String,
}

/// What to do with a reply affordance the platform cannot render inline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyFallback {
    /// Drop the affordance
    #[default]
    Hide,
    /// Show a plain button that signals [`INLINE_REPLY_ACTION_ID`]
    RegularAction,
}

/// 内联回复
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplySpec {
    pub label: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub submit_label: Option<String>,
    #[serde(default)]
    pub fallback: ReplyFallback,
}

impl ReplySpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            placeholder: None,
            submit_label: None,
            fallback: ReplyFallback::default(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_submit_label(mut self, submit_label: impl Into<String>) -> Self {
        self.submit_label = Some(submit_label.into());
        self
    }

    pub fn with_fallback(mut self, fallback: ReplyFallback) -> Self {
        self.fallback = fallback;
        self
    }
}

/// 通知记录（只在一次 post 调用期间存在）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// 调用方分配的 ID，在存活通知中唯一
    pub id: ChildId,
    #[serde(default)]
    pub title: String,
    /// 单行正文
    #[serde(default)]
    pub text: String,
    /// 富文本正文（可多行）
    #[serde(default)]
    pub rich_text: Option<String>,
    /// 已编码的图标数据（PNG）
    #[serde(default)]
    pub icon: Option<Vec<u8>>,
    /// 有序的 (action-id, label) 列表
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
    pub channel: ChannelSpec,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub reply: Option<ReplySpec>,
}

impl NotificationRecord {
    pub fn new(id: u32, channel: ChannelSpec) -> Self {
        Self {
            id: ChildId(id),
            title: String::new(),
            text: String::new(),
            rich_text: None,
            icon: None,
            actions: Vec::new(),
            channel,
            group: None,
            urgency: Urgency::default(),
            visibility: Visibility::default(),
            reply: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_rich_text(mut self, rich_text: impl Into<String>) -> Self {
        self.rich_text = Some(rich_text.into());
        self
    }

    pub fn with_icon(mut self, data: Vec<u8>) -> Self {
        self.icon = Some(data);
        self
    }

    /// 追加操作按钮（保持顺序）
    pub fn with_action(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.actions.push(ActionSpec {
            id: id.into(),
            label: label.into(),
        });
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_reply(mut self, reply: ReplySpec) -> Self {
        self.reply = Some(reply);
        self
    }
}
