use std::collections::HashMap;

use crate::models::{Notification, NotificationGroup, NotificationKind};

/// Fold a newest-first notification window into display groups keyed by
/// `(sender_handle, kind)`.
///
/// A group's output position is the position of its most recent
/// notification; the first notification seen for a key while scanning
/// becomes `latest`. Pure function of the window: same input, same output,
/// no state between calls. O(n) over the capped window, cheap enough to run
/// on every store change.
pub fn group_notifications(items: &[Notification]) -> Vec<NotificationGroup> {
    let mut groups: Vec<NotificationGroup> = Vec::new();
    let mut index: HashMap<(&str, NotificationKind), usize> = HashMap::new();

    for item in items {
        match index.get(&(item.sender_handle.as_str(), item.kind)) {
            Some(&at) => {
                let group = &mut groups[at];
                group.count += 1;
                if !item.is_read {
                    group.has_unread = true;
                    group.unread_ids.push(item.id.clone());
                }
            }
            None => {
                index.insert((item.sender_handle.as_str(), item.kind), groups.len());
                groups.push(NotificationGroup {
                    sender_handle: item.sender_handle.clone(),
                    kind: item.kind,
                    latest: item.clone(),
                    count: 1,
                    has_unread: !item.is_read,
                    unread_ids: if item.is_read {
                        Vec::new()
                    } else {
                        vec![item.id.clone()]
                    },
                });
            }
        }
    }

    groups
}
