// Cache module for local filesystem state.
// Keeps the session and trace log between runs.

pub mod paths;
pub mod store;

pub use paths::{log_path, state_path};
pub use store::Session;
