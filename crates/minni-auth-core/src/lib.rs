#![doc = include_str!("../README.md")]

pub mod env;
pub mod error;
pub mod logger;
pub mod options;
pub mod plugin;
pub mod store;
pub mod utils;

// Re-exports for convenience
pub use error::{ApiError, AuthError, ErrorCode};
pub use logger::{AuthLogger, LogHandler, LogLevel, LoggerConfig};
pub use options::GithubAuthOptions;
pub use plugin::{AuthPlugin, FlowKind, PluginEndpoint};
pub use store::models::{NewUser, User};
pub use store::memory::{MemorySessionStore, MemoryUserStore};
pub use store::session::SessionStore;
pub use store::user_store::{StoreResult, UserStore};
