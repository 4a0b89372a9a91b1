use crate::constants::LIVE_LIST_CAP;
use crate::models::Notification;

/// Outcome of [`NotificationStore::mark_read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// The notification transitioned from unread to read.
    MarkedRead,
    /// Absent from the window or already read; nothing changed.
    Noop,
}

/// Single source of truth for the notification window and the unread counter.
///
/// The window is kept sorted by `created_at` descending and capped after each
/// push insertion. The counter is the server-authoritative superset of the
/// window's unread items and is reconciled independently: a genuine push
/// increments it, a local read transition decrements it (floored at zero),
/// and the baseline fetch overwrites it.
pub struct NotificationStore {
    items: Vec<Notification>,
    unread_count: u64,
    revision: u64,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            unread_count: 0,
            revision: 0,
        }
    }

    // ===== Getters =====

    pub fn notifications(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> u64 {
        self.unread_count
    }

    /// Bumped exactly once per mutating operation, so one operation is one
    /// observable moment for readers.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|n| n.id == id)
    }

    // ===== Mutations =====

    /// Baseline load: replace the window wholesale. The counter is not
    /// touched; the authoritative count arrives separately via
    /// [`set_counter`](Self::set_counter).
    pub fn replace_all(&mut self, mut items: Vec<Notification>) {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.items = items;
        self.revision += 1;
    }

    /// Push insertion: sorted insert (newest first), truncate to the live
    /// cap, count the arrival. An id already present in the window is a
    /// complete no-op; the event was counted when it first arrived.
    /// Returns whether the notification was genuinely new.
    pub fn append(&mut self, item: Notification) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        let pos = self
            .items
            .partition_point(|n| n.created_at > item.created_at);
        self.items.insert(pos, item);
        self.items.truncate(LIVE_LIST_CAP);
        self.unread_count += 1;
        self.revision += 1;
        true
    }

    pub fn mark_read(&mut self, id: &str) -> MarkReadOutcome {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(item) if !item.is_read => {
                item.is_read = true;
                self.unread_count = self.unread_count.saturating_sub(1);
                self.revision += 1;
                MarkReadOutcome::MarkedRead
            }
            _ => MarkReadOutcome::Noop,
        }
    }

    /// Authoritative baseline count. Negative input clamps to zero.
    pub fn set_counter(&mut self, count: i64) {
        self.unread_count = count.max(0) as u64;
        self.revision += 1;
    }

    /// Session end: empty window, zero counter.
    pub fn clear(&mut self) {
        self.items.clear();
        self.unread_count = 0;
        self.revision += 1;
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationKind;
    use chrono::{Duration, TimeZone, Utc};

    fn notif(id: &str, minutes: i64) -> Notification {
        Notification {
            id: id.to_string(),
            kind: NotificationKind::Like,
            content: "liked your post".to_string(),
            sender_name: "Fern Dale".to_string(),
            sender_handle: "fern".to_string(),
            sender_avatar_ref: None,
            related_id: "post-1".to_string(),
            is_read: false,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    fn ids(store: &NotificationStore) -> Vec<&str> {
        store.notifications().iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_append_keeps_newest_first_and_caps() {
        let mut store = NotificationStore::new();
        for i in 0..25 {
            assert!(store.append(notif(&format!("n-{}", i), i)));
        }

        assert_eq!(store.notifications().len(), LIVE_LIST_CAP);
        assert_eq!(store.unread_count(), 25);
        assert!(store
            .notifications()
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
        // The oldest entries fell off silently
        assert!(!store.contains("n-0"));
        assert_eq!(store.notifications()[0].id, "n-24");
    }

    #[test]
    fn test_append_out_of_order_stays_sorted() {
        let mut store = NotificationStore::new();
        store.append(notif("b", 10));
        store.append(notif("d", 30));
        store.append(notif("a", 0));
        store.append(notif("c", 20));

        assert_eq!(ids(&store), vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn test_duplicate_append_is_a_complete_noop() {
        let mut store = NotificationStore::new();
        assert!(store.append(notif("n-1", 0)));
        let revision = store.revision();

        assert!(!store.append(notif("n-1", 5)));
        assert_eq!(store.notifications().len(), 1);
        assert_eq!(store.unread_count(), 1);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_mark_read_twice_decrements_once() {
        let mut store = NotificationStore::new();
        store.append(notif("n-1", 0));
        store.append(notif("n-2", 1));

        assert_eq!(store.mark_read("n-1"), MarkReadOutcome::MarkedRead);
        assert_eq!(store.unread_count(), 1);
        assert_eq!(store.mark_read("n-1"), MarkReadOutcome::Noop);
        assert_eq!(store.unread_count(), 1);
    }

    #[test]
    fn test_mark_read_absent_is_noop() {
        let mut store = NotificationStore::new();
        assert_eq!(store.mark_read("ghost"), MarkReadOutcome::Noop);
        assert_eq!(store.unread_count(), 0);
    }

    #[test]
    fn test_counter_floors_at_zero() {
        let mut store = NotificationStore::new();
        store.replace_all(vec![notif("n-1", 0)]);
        // Counter deliberately behind the window: mark_read must not underflow
        store.set_counter(0);
        store.mark_read("n-1");
        assert_eq!(store.unread_count(), 0);
    }

    #[test]
    fn test_set_counter_clamps_negative() {
        let mut store = NotificationStore::new();
        store.set_counter(-3);
        assert_eq!(store.unread_count(), 0);
        store.set_counter(12);
        assert_eq!(store.unread_count(), 12);
    }

    #[test]
    fn test_replace_all_leaves_counter_and_ignores_cap() {
        let mut store = NotificationStore::new();
        store.set_counter(40);
        let page: Vec<Notification> = (0..30).map(|i| notif(&format!("n-{}", i), i)).collect();
        store.replace_all(page);

        assert_eq!(store.notifications().len(), 30);
        assert_eq!(store.unread_count(), 40);
        assert!(store
            .notifications()
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_clear_empties_window_and_zeroes_counter() {
        let mut store = NotificationStore::new();
        store.replace_all(vec![notif("n-1", 0), notif("n-2", 1)]);
        store.set_counter(2);
        store.clear();

        assert!(store.notifications().is_empty());
        assert_eq!(store.unread_count(), 0);
    }

    #[test]
    fn test_baseline_then_push_then_read() {
        // Baseline: A, B, C unread with authoritative count 3
        let mut store = NotificationStore::new();
        store.replace_all(vec![notif("a", 2), notif("b", 1), notif("c", 0)]);
        store.set_counter(3);

        // Push D
        assert!(store.append(notif("d", 3)));
        assert_eq!(ids(&store), vec!["d", "a", "b", "c"]);
        assert_eq!(store.unread_count(), 4);

        // Read D
        assert_eq!(store.mark_read("d"), MarkReadOutcome::MarkedRead);
        assert_eq!(store.unread_count(), 3);
    }

    #[test]
    fn test_one_operation_is_one_revision() {
        let mut store = NotificationStore::new();
        let start = store.revision();
        store.append(notif("n-1", 0));
        // List insert and counter increment land in the same revision
        assert_eq!(store.revision(), start + 1);
        store.mark_read("n-1");
        assert_eq!(store.revision(), start + 2);
    }
}
