//! Configuration shared by the bot binary and the operator tools.

pub mod config;
