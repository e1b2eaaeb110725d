//! Core domain + pipeline logic for the xgrab media mirror bot.
//!
//! This crate is intentionally framework-agnostic. Telegram / vxtwitter /
//! raw HTTP live behind ports (traits) implemented in adapter crates.

pub mod classify;
pub mod config;
pub mod deliver;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod logging;
pub mod pipeline;
pub mod plan;
pub mod ports;
pub mod quality;
pub mod stats;

pub use errors::{Error, Result};
