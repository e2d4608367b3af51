//! Round and session logic for the card-matching quiz. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod config;
pub mod events;
pub mod hand;
pub mod profile;
pub mod rng;
pub mod round;
pub mod scoring;
pub mod session;

pub use cards::*;
pub use config::*;
pub use events::*;
pub use hand::*;
pub use profile::*;
pub use rng::*;
pub use round::*;
pub use scoring::*;
pub use session::*;
