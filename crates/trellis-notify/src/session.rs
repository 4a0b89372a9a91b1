/// The authenticated user a notification session is bound to.
///
/// Produced by the identity provider; absent means anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Engine state for one identity session.
///
/// `Live` is the only state in which push delivery is applied; a payload
/// racing a slow teardown is discarded, not applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unbound,
    BaselineLoading,
    Live,
}
