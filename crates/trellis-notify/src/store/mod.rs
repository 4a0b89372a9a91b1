pub mod notification_store;
pub mod views;

pub use notification_store::{MarkReadOutcome, NotificationStore};
pub use views::group_notifications;
