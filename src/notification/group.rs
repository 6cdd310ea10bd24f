//! 分组注册表 - 维护分组摘要与子通知的对应关系
//!
//! One entry per live group key: the set of child ids still shown and the id
//! of the synthetic summary standing for the group. An entry exists exactly
//! while at least one of its children is posted and not yet finalized.
//!
//! ## Removal policy
//! - `remove_child` (caller closed a child): drops the entry once it is
//!   empty and hands back the summary id so it can be cancelled.
//! - `child_removed` (OS reported a child dismissal): bookkeeping only; the
//!   entry stays until the OS reports the summary's own deletion.
//! - `handle_group_deleted` (OS reported the summary gone): drops the entry
//!   regardless of its children.
//! - `leave_other_group` (caller re-posted a live child under another key or
//!   none): same as `remove_child` on the group it used to be in.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::id::{ChildId, SummaryId};

/// 单个分组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    children: BTreeSet<ChildId>,
    summary: SummaryId,
}

impl GroupEntry {
    pub fn summary(&self) -> SummaryId {
        self.summary
    }

    pub fn children(&self) -> impl Iterator<Item = ChildId> + '_ {
        self.children.iter().copied()
    }

    pub fn contains(&self, child: ChildId) -> bool {
        self.children.contains(&child)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Result of adding a child to a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupJoin {
    /// New group; its summary still has to be posted
    Created(SummaryId),
    /// Existing group; summary already posted
    Joined(SummaryId),
}

impl GroupJoin {
    pub fn summary(&self) -> SummaryId {
        match self {
            GroupJoin::Created(id) | GroupJoin::Joined(id) => *id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, GroupJoin::Created(_))
    }
}

/// 分组注册表
#[derive(Debug, Default)]
pub struct GroupRegistry {
    entries: HashMap<String, GroupEntry>,
    next_summary: u32,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_summary(&mut self) -> SummaryId {
        let id = SummaryId::new(self.next_summary);
        self.next_summary = self.next_summary.wrapping_add(1);
        id
    }

    /// Add `child` to `key`, creating the group on first use.
    ///
    /// Idempotent per live group: the summary id never changes while the
    /// entry exists.
    pub fn ensure_group(&mut self, key: &str, child: ChildId) -> GroupJoin {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.children.insert(child);
            return GroupJoin::Joined(entry.summary);
        }

        let summary = self.allocate_summary();
        self.entries.insert(
            key.to_string(),
            GroupEntry {
                children: BTreeSet::from([child]),
                summary,
            },
        );
        debug!(group = %key, summary = %summary, child = %child, "Group created");
        GroupJoin::Created(summary)
    }

    /// OS reported a single child gone. Never removes the entry.
    ///
    /// Returns whether `child` was a member.
    pub fn child_removed(&mut self, key: &str, child: ChildId) -> bool {
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        let removed = entry.children.remove(&child);
        if removed {
            debug!(group = %key, child = %child, remaining = entry.children.len(), "Child left group");
        }
        removed
    }

    /// Caller closed `child`. Drops the entry when it becomes empty.
    ///
    /// Returns the summary to cancel if the group is gone.
    pub fn remove_child(&mut self, key: &str, child: ChildId) -> Option<SummaryId> {
        let entry = self.entries.get_mut(key)?;
        entry.children.remove(&child);
        if !entry.children.is_empty() {
            return None;
        }

        let summary = entry.summary;
        self.entries.remove(key);
        debug!(group = %key, summary = %summary, "Last child closed, group removed");
        Some(summary)
    }

    /// OS reported the summary deleted. Drops the entry unconditionally.
    pub fn handle_group_deleted(&mut self, key: &str) -> Option<GroupEntry> {
        let entry = self.entries.remove(key);
        if let Some(entry) = &entry {
            debug!(group = %key, summary = %entry.summary, children = entry.children.len(), "Group deleted");
        }
        entry
    }

    /// Like [`handle_group_deleted`](Self::handle_group_deleted), but ignores a
    /// deletion report for a summary the current entry no longer owns.
    pub fn handle_summary_deleted(&mut self, key: &str, summary: SummaryId) -> Option<GroupEntry> {
        match self.summary_id(key) {
            Some(current) if current == summary => self.handle_group_deleted(key),
            Some(current) => {
                debug!(
                    group = %key,
                    stale = %summary,
                    current = %current,
                    "Ignoring deletion of a superseded summary"
                );
                None
            }
            None => None,
        }
    }

    /// Key of the group currently listing `child`
    pub fn group_of(&self, child: ChildId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.contains(child))
            .map(|(key, _)| key.as_str())
    }

    /// Take `child` out of whatever group it is listed in, unless that group
    /// is `keep`.
    ///
    /// Returns the old key and its summary if that group is now gone.
    pub fn leave_other_group(&mut self, child: ChildId, keep: Option<&str>) -> Option<(String, SummaryId)> {
        let old = self.group_of(child)?;
        if keep == Some(old) {
            return None;
        }
        let old = old.to_string();
        debug!(group = %old, child = %child, new_group = ?keep, "Child moved out of group");
        self.remove_child(&old, child).map(|summary| (old, summary))
    }

    pub fn get(&self, key: &str) -> Option<&GroupEntry> {
        self.entries.get(key)
    }

    pub fn summary_id(&self, key: &str) -> Option<SummaryId> {
        self.entries.get(key).map(|e| e.summary)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry, yielding `(key, entry)` pairs
    pub fn drain(&mut self) -> Vec<(String, GroupEntry)> {
        self.entries.drain().collect()
    }
}
