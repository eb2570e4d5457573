// Library root: re-exports all modules so integration tests can drive the
// orchestrator and the view state directly.

pub mod app;
pub mod config;
pub mod protocol;
pub mod tui;
