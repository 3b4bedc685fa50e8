// ABOUTME: Library root for vigla - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod error;
pub mod logs;
pub mod ssh;
pub mod transfer;
pub mod types;
