//! folioterm: a terminal dashboard and CLI for the portfolio trading
//! backend. Holdings, on-demand ticker analysis, buy/sell submission
//! and performance metrics, all over the backend's JSON API.

pub mod cli;
pub mod client;
pub mod config;
pub mod data_paths;
pub mod display;
pub mod logging;
pub mod poller;
pub mod ticker;
pub mod tui;
