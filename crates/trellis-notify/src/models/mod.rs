pub mod group;
pub mod notification;

pub use group::NotificationGroup;
pub use notification::{Notification, NotificationKind};
