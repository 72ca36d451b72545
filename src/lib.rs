// ABOUTME: Library root for paicku - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod git;
pub mod output;
pub mod pack;
pub mod process;
pub mod runtime;
pub mod ssh;
