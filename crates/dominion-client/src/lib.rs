//! dominion-client
//!
//! Drives the Dominion engine as a child process: reads each turn from its
//! stdout, prints the parsed state, and answers on its stdin.

pub mod config;
pub mod decision;
pub mod display;
pub mod engine_process;
pub mod session;
