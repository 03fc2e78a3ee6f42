pub mod cli;
pub mod server;

pub use cli::run_command;
pub use server::run_server;
