//! Jigsaw Store - Session persistence ports and adapters
//!
//! Workspaces are persisted as their JSON document, keyed by workspace id.
//! The store only moves documents around; decoding and validation stay in
//! `jigsaw-core`.

pub mod file;
pub mod memory;
pub mod ports;
pub mod session;

pub use file::JsonFileSessionStore;
pub use memory::MemorySessionStore;
pub use ports::SessionStore;
pub use session::{load_or_fresh, load_workspace, save_workspace};
