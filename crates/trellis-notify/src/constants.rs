//! Application-wide constants
//!
//! Centralized location for magic strings and configuration values
//! that are used across multiple modules.

/// Default REST API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// REST path of the notifications resource, relative to the API base
pub const NOTIFICATIONS_PATH: &str = "/api/v1/notifications";

/// Prefix of per-user push topics (`notifications/{user_id}`)
pub const TOPIC_PREFIX: &str = "notifications/";

/// Maximum number of notifications kept in the live window.
/// Enforced after each push insertion; the baseline page is not capped.
pub const LIVE_LIST_CAP: usize = 20;
