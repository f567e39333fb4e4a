pub mod cli;
pub mod client;
pub mod error;
pub mod fmt;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod render;
pub mod server;
pub mod settings;
pub mod shell;
#[cfg(test)]
mod testing;
pub mod tui;
