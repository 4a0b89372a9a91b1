/// Severity of a transient alert, mirroring the application's toast levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Sink for transient user-facing alerts (toasts).
///
/// Display plumbing belongs to the embedding application; the engine only
/// emits. Implementations must not block.
pub trait AlertSink {
    fn show(&self, level: AlertLevel, message: &str);
}
