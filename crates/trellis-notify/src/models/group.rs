use super::notification::{Notification, NotificationKind};

/// A display-ready aggregation of notifications sharing sender and kind
/// ("Fern Dale liked 3 of your posts").
///
/// Groups are a pure projection of the store window: recomputed on every
/// store change, never mutated by consumers, no lifecycle of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationGroup {
    pub sender_handle: String,
    pub kind: NotificationKind,
    /// Most recent notification folded into this group
    pub latest: Notification,
    /// Number of notifications folded in
    pub count: usize,
    pub has_unread: bool,
    /// Ids of the unread notifications, newest first
    pub unread_ids: Vec<String>,
}

impl NotificationGroup {
    /// Summary line for the group. Fixed policy per kind; kinds this build
    /// does not recognize fall back to the latest server-rendered content so
    /// new server-side kinds degrade instead of breaking the view.
    pub fn display_text(&self) -> String {
        match self.kind {
            NotificationKind::Follow => "started following you".to_string(),
            NotificationKind::Message => match self.count {
                1 => "sent you a message".to_string(),
                n => format!("sent you {} messages", n),
            },
            NotificationKind::Like => match self.count {
                1 => "liked your post".to_string(),
                n => format!("liked {} of your posts", n),
            },
            NotificationKind::Comment => match self.count {
                1 => "commented on your post".to_string(),
                n => format!("commented on {} of your posts", n),
            },
            NotificationKind::Unknown => self.latest.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn group(kind: NotificationKind, count: usize, content: &str) -> NotificationGroup {
        let latest = Notification {
            id: "n-1".to_string(),
            kind,
            content: content.to_string(),
            sender_name: "Fern Dale".to_string(),
            sender_handle: "fern".to_string(),
            sender_avatar_ref: None,
            related_id: "post-1".to_string(),
            is_read: false,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        };
        NotificationGroup {
            sender_handle: latest.sender_handle.clone(),
            kind,
            latest,
            count,
            has_unread: true,
            unread_ids: vec!["n-1".to_string()],
        }
    }

    #[test]
    fn test_follow_is_a_fixed_phrase() {
        let g = group(NotificationKind::Follow, 1, "started following you");
        assert_eq!(g.display_text(), "started following you");
        // Count does not change the phrase for follows
        let g = group(NotificationKind::Follow, 4, "started following you");
        assert_eq!(g.display_text(), "started following you");
    }

    #[test]
    fn test_message_pluralizes_on_count() {
        let g = group(NotificationKind::Message, 1, "New message from Fern Dale");
        assert_eq!(g.display_text(), "sent you a message");
        let g = group(NotificationKind::Message, 3, "New message from Fern Dale");
        assert_eq!(g.display_text(), "sent you 3 messages");
    }

    #[test]
    fn test_like_and_comment_pluralize_on_count() {
        assert_eq!(
            group(NotificationKind::Like, 1, "liked your post").display_text(),
            "liked your post"
        );
        assert_eq!(
            group(NotificationKind::Like, 2, "liked your post").display_text(),
            "liked 2 of your posts"
        );
        assert_eq!(
            group(NotificationKind::Comment, 1, "commented on your post").display_text(),
            "commented on your post"
        );
        assert_eq!(
            group(NotificationKind::Comment, 5, "commented on your post").display_text(),
            "commented on 5 of your posts"
        );
    }

    #[test]
    fn test_unknown_kind_falls_back_to_raw_content() {
        let g = group(NotificationKind::Unknown, 2, "Your fern looks thirsty");
        assert_eq!(g.display_text(), "Your fern looks thirsty");
    }
}
