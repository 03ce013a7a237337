//! Core library for the spread-detector project.
//!
//! Polls spot prices for a set of tokens on several centralized exchanges
//! and reports transfers between exchanges that stay profitable after
//! withdrawal, deposit and trading fees.

pub mod aggregator;
pub mod arbitrage;
pub mod cex;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod notify;
pub mod server;
pub mod state;
pub mod utils;
