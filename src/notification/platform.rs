//! Platform capabilities and the notification value handed to the OS sink

use serde::{Deserialize, Serialize};

use super::event::InboundIntent;
use super::record::Visibility;
use super::urgency::LegacyPriority;

/// First API level with delivery channels
pub const API_CHANNELS: u32 = 26;
/// First API level accepting custom icon data
pub const API_CUSTOM_ICONS: u32 = 23;
/// First API level with lock-screen visibility
pub const API_VISIBILITY: u32 = 21;
/// First API level with inline text input on actions
pub const API_INLINE_REPLY: u32 = 24;

/// Features the running OS version supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCapabilities {
    pub api_level: u32,
    pub channels: bool,
    pub custom_icons: bool,
    pub visibility: bool,
    pub inline_reply: bool,
}

impl PlatformCapabilities {
    pub fn for_api_level(api_level: u32) -> Self {
        Self {
            api_level,
            channels: api_level >= API_CHANNELS,
            custom_icons: api_level >= API_CUSTOM_ICONS,
            visibility: api_level >= API_VISIBILITY,
            inline_reply: api_level >= API_INLINE_REPLY,
        }
    }
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::for_api_level(crate::config::DEFAULT_API_LEVEL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Icon {
    /// The host application's own icon
    AppDefault,
    /// Encoded image data, decoded by the platform
    Data(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum ContentStyle {
    Plain,
    /// Expandable long-text presentation
    BigText(String),
}

/// Group membership of a built notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTag {
    pub key: String,
    pub summary: bool,
}

/// Text input attached to an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyInput {
    pub placeholder: Option<String>,
    pub submit_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformAction {
    pub label: String,
    /// Delivered back to the bridge when the action fires
    pub intent: InboundIntent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyInput>,
}

/// Fully built notification, ready to submit to the OS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformNotification {
    /// None on platforms without delivery channels
    pub channel_id: Option<String>,
    pub icon: Icon,
    pub title: String,
    pub text: String,
    pub style: ContentStyle,
    pub visibility: Option<Visibility>,
    /// Only set on platforms without delivery channels
    pub priority: Option<LegacyPriority>,
    pub group: Option<GroupTag>,
    pub content_intent: InboundIntent,
    pub actions: Vec<PlatformAction>,
    pub delete_intent: InboundIntent,
}

impl PlatformNotification {
    pub fn is_summary(&self) -> bool {
        self.group.as_ref().is_some_and(|g| g.summary)
    }

    pub fn group_key(&self) -> Option<&str> {
        self.group.as_ref().map(|g| g.key.as_str())
    }
}
