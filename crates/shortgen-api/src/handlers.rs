//! Request handlers.

pub mod cleanup;
pub mod health;
pub mod jobs;

pub use cleanup::*;
pub use health::*;
pub use jobs::*;
