//! 投递渠道注册表 - 每个渠道 ID 只创建一次

use std::collections::HashSet;

use tracing::debug;

use super::record::ChannelSpec;
use super::urgency::{importance_for, Importance, Urgency};

/// Channel ids already handed to the OS.
///
/// Attributes are fixed by whichever notification introduced the channel;
/// later notifications on the same channel never update them.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    seen: HashSet<String>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `spec` if unseen.
    ///
    /// Returns the importance to create the channel with, or `None` when the
    /// channel already exists.
    pub fn ensure(&mut self, spec: &ChannelSpec, urgency: Urgency) -> Option<Importance> {
        if self.seen.contains(&spec.id) {
            return None;
        }
        self.seen.insert(spec.id.clone());

        let importance = importance_for(urgency);
        debug!(channel = %spec.id, importance = importance.as_str(), "New delivery channel");
        Some(importance)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
