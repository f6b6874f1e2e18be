//! CLI command handlers.
//!
//! Each submodule owns the arguments and output of one top-level command.

pub mod cache;
pub mod common;
pub mod config;
pub mod replay;
pub mod stats;
pub mod tier;
