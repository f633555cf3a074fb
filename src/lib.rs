//! BANKROLL-SIM: Monte Carlo bankroll risk engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod odds;
pub mod simulation;
pub mod strategy;
pub mod types;
