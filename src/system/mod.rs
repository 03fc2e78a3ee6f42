//! System-level modules
//!
//! - Logging initialization

pub mod logging;

pub use logging::{ConsoleTarget, init_logging};
