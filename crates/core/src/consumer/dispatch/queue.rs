// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of anymq.
//
// anymq is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// anymq is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with anymq. If not, see <https://www.gnu.org/licenses/>.

//! Pending tasks grouped by correlation key

use indexmap::IndexMap;
use std::collections::VecDeque;

/// FIFO queues of pending tasks, one per correlation group.
///
/// The key `None` collects ungrouped tasks. Group keys keep insertion
/// order, so a release pass scans groups deterministically, and a key
/// whose queue empties is removed at once, keeping `has_tasks` a pure
/// map lookup.
pub(super) struct TaskQueue<T> {
    queues: IndexMap<Option<String>, VecDeque<T>>,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self { queues: IndexMap::new() }
    }

    /// Append a task to its group's queue, creating the group as needed.
    pub fn push(&mut self, group: Option<String>, task: T) {
        self.queues.entry(group).or_default().push_back(task);
    }

    /// Remove and return the head task of a group, dropping the group key
    /// once its queue empties.
    pub fn pop_next(&mut self, group: &Option<String>) -> Option<T> {
        let queue = self.queues.get_mut(group)?;
        let task = queue.pop_front();
        if queue.is_empty() {
            self.queues.shift_remove(group);
        }
        task
    }

    /// Whether a group still has pending tasks.
    pub fn has_tasks(&self, group: &Option<String>) -> bool {
        self.queues.contains_key(group)
    }

    /// Snapshot of the group keys in insertion order.
    pub fn group_keys(&self) -> Vec<Option<String>> {
        self.queues.keys().cloned().collect()
    }

    /// Total number of pending tasks across all groups.
    pub fn pending(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str) -> Option<String> {
        Some(name.to_string())
    }

    #[test]
    fn test_pops_fifo_within_a_group() {
        let mut queue = TaskQueue::new();
        queue.push(group("a"), 1);
        queue.push(group("a"), 2);
        queue.push(group("a"), 3);

        assert_eq!(queue.pop_next(&group("a")), Some(1));
        assert_eq!(queue.pop_next(&group("a")), Some(2));
        assert_eq!(queue.pop_next(&group("a")), Some(3));
        assert_eq!(queue.pop_next(&group("a")), None);
    }

    #[test]
    fn test_removes_group_key_once_empty() {
        let mut queue = TaskQueue::new();
        queue.push(group("a"), 1);
        assert!(queue.has_tasks(&group("a")));

        queue.pop_next(&group("a"));
        assert!(!queue.has_tasks(&group("a")));
        assert_eq!(queue.group_keys(), Vec::<Option<String>>::new());
    }

    #[test]
    fn test_keeps_groups_in_insertion_order() {
        let mut queue = TaskQueue::new();
        queue.push(group("b"), 1);
        queue.push(None, 2);
        queue.push(group("a"), 3);
        queue.push(group("b"), 4);

        assert_eq!(queue.group_keys(), vec![group("b"), None, group("a")]);
        assert_eq!(queue.pending(), 4);
    }

    #[test]
    fn test_ungrouped_tasks_share_the_none_key() {
        let mut queue = TaskQueue::new();
        queue.push(None, 1);
        queue.push(None, 2);

        assert_eq!(queue.pop_next(&None), Some(1));
        assert_eq!(queue.pop_next(&None), Some(2));
        assert!(!queue.has_tasks(&None));
    }

    #[test]
    fn test_popping_unknown_group_returns_none() {
        let mut queue: TaskQueue<i32> = TaskQueue::new();
        assert_eq!(queue.pop_next(&group("ghost")), None);
    }
}
