// CLI module
//
// This module contains the interactive front end for the ledger

pub mod command;
pub mod session;

// Re-export main components for easier access
pub use command::{Command, UnknownCommand};
pub use session::Session;
