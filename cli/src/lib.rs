pub mod commands;
pub mod context;
pub mod logging;
pub mod render;

pub use context::{CliContext, SessionHandle, error_chain};
