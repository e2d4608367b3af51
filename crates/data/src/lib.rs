//! File-backed loading and persistence: the card catalog, the player profile and game config.

pub mod catalog;
pub mod config;
pub mod profile;
pub mod resolve;

pub use catalog::*;
pub use config::*;
pub use profile::*;
pub use resolve::*;
