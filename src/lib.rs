//! EchoVault - Real-time room message board
//!
//! Messages are posted to six-digit rooms, persisted, and pushed to every
//! viewer currently streaming that room over Server-Sent Events. Room
//! history can be read back at any time.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
