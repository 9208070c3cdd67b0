//! Subcommand implementations.

pub mod cat;
pub mod completion;
pub mod list;
pub mod pack;
pub mod unpack;
