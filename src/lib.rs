pub mod config;
pub mod convert;
pub mod error;
pub mod package;
pub mod reader;
pub mod render;
pub mod schedule;
pub mod server;
pub mod source;
