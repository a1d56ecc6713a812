// Export our modules for use in the binary and integration tests
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod event;
pub mod ledger;
pub mod telemetry;
pub mod terminal;
pub mod ui;
pub mod verify;

#[cfg(test)]
mod testing;
