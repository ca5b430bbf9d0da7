#![cfg_attr(
    not(test),
    warn(clippy::print_stdout, clippy::dbg_macro),
    deny(clippy::unwrap_used, clippy::expect_used)
)]

pub mod cli;
pub mod client;
pub mod config;
pub mod mock;
pub mod reporter;
pub mod runner;
pub mod sample;
pub mod utils;
