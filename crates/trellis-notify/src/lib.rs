pub mod alerts;
pub mod avatar;
pub mod config;
pub mod constants;
pub mod models;
pub mod runtime;
pub mod session;
pub mod store;
pub mod tracing_setup;
pub mod transport;

// Re-export the engine surface at crate root for convenience
pub use config::CoreConfig;
pub use models::{Notification, NotificationGroup, NotificationKind};
pub use runtime::{EngineCommand, EngineSnapshot, EngineStopped, NotifyEngine, NotifyHandle};
pub use session::{Identity, SessionState};
