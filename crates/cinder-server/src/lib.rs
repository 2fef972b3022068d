//! # Cinder Server
//!
//! Composition root for the world server.
//!
//! This crate ties together:
//! - Config: `cinder.toml` loading with defaults
//! - Particles: the custom effect catalog from `cinder-particles`
//! - Players: connected clients receiving encoded effect packets

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod logging;
pub mod players;
pub mod server;

pub use config::ServerConfig;
pub use players::{ConnectedPlayer, PlayerList};
pub use server::Server;
