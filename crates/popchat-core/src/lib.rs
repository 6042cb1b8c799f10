//! Configuration persistence and command handling for the PopChat overlay.
//!
//! Nothing in here touches a real window: the toolkit is reached through
//! [`WindowHost`], which the runtime crate implements on top of Tauri.

pub mod assets;
pub mod config;
pub mod error;
pub mod host;
pub mod options;
pub mod session;
pub mod store;

pub use config::*;
pub use error::*;
pub use host::*;
pub use options::*;
pub use session::*;
pub use store::*;
