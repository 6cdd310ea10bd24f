//! 通知标识 - 区分调用方通知与合成的分组摘要
//!
//! Caller-assigned ids and synthetic summary ids live in two tagged variants.
//! They are never compared across variants; classification happens once,
//! where an inbound event is parsed.

use serde::{Deserialize, Serialize};

/// Offset of the summary range in the flat platform key space
pub const SUMMARY_KEY_BASE: u64 = 1 << 32;

/// 调用方分配的通知 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildId(pub u32);

/// 分组摘要通知 ID（只能由 GroupRegistry 分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryId(u32);

impl SummaryId {
    pub(crate) fn new(seq: u32) -> Self {
        Self(seq)
    }

    /// Sequence number within the summary range
    pub fn seq(&self) -> u32 {
        self.0
    }
}

/// Which id space an event or a platform key refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    Child,
    Summary,
}

impl IdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdKind::Child => "child",
            IdKind::Summary => "summary",
        }
    }

    pub fn parse(s: &str) -> Option<IdKind> {
        match s {
            "child" => Some(IdKind::Child),
            "summary" => Some(IdKind::Summary),
            _ => None,
        }
    }
}

/// Key of a notification as known to the OS sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum NotificationId {
    Child(ChildId),
    Summary(SummaryId),
}

impl NotificationId {
    pub fn kind(&self) -> IdKind {
        match self {
            NotificationId::Child(_) => IdKind::Child,
            NotificationId::Summary(_) => IdKind::Summary,
        }
    }

    /// Flat key for platforms that address notifications by a single integer.
    ///
    /// Child ids occupy `0..=u32::MAX`, summaries start at [`SUMMARY_KEY_BASE`].
    pub fn raw_key(&self) -> u64 {
        match self {
            NotificationId::Child(id) => id.0 as u64,
            NotificationId::Summary(id) => SUMMARY_KEY_BASE + id.0 as u64,
        }
    }
}

impl From<ChildId> for NotificationId {
    fn from(id: ChildId) -> Self {
        NotificationId::Child(id)
    }
}

impl From<SummaryId> for NotificationId {
    fn from(id: SummaryId) -> Self {
        NotificationId::Summary(id)
    }
}

impl std::fmt::Display for ChildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for SummaryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "summary#{}", self.0)
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationId::Child(id) => write!(f, "{}", id),
            NotificationId::Summary(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_key_ranges_are_disjoint() {
        let max_child = NotificationId::Child(ChildId(u32::MAX)).raw_key();
        let min_summary = NotificationId::Summary(SummaryId::new(0)).raw_key();
        assert!(max_child < min_summary);
    }

    #[test]
    fn test_kind() {
        assert_eq!(NotificationId::from(ChildId(3)).kind(), IdKind::Child);
        assert_eq!(NotificationId::from(SummaryId::new(3)).kind(), IdKind::Summary);
    }

    #[test]
    fn test_same_number_different_kind_not_equal() {
        assert_ne!(
            NotificationId::from(ChildId(7)),
            NotificationId::from(SummaryId::new(7))
        );
    }

    #[test]
    fn test_id_kind_parse() {
        assert_eq!(IdKind::parse("child"), Some(IdKind::Child));
        assert_eq!(IdKind::parse("summary"), Some(IdKind::Summary));
        assert_eq!(IdKind::parse("other"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ChildId(12).to_string(), "12");
        assert_eq!(SummaryId::new(2).to_string(), "summary#2");
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_value(NotificationId::from(ChildId(5))).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "child", "id": 5}));
    }
}
