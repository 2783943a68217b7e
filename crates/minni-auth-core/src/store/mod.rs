// Persistence seams owned by the host application.
//
// The plugin never talks to a database directly: it calls through the
// `UserStore` and `SessionStore` traits, and the host wires in whatever
// backs them. The in-memory implementations exist for tests and examples.

pub mod memory;
pub mod models;
pub mod session;
pub mod user_store;

pub use memory::{MemorySessionStore, MemoryUserStore};
pub use models::{NewUser, User};
pub use session::SessionStore;
pub use user_store::{StoreResult, UserStore};
