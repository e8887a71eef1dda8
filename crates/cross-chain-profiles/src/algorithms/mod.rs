//! # Algorithms Module
//!
//! Profile codec and identifier derivation.

pub mod codec;
pub mod identity;

pub use codec::{decode_profile, encode_profile};
pub use identity::{derive_id, profile_seed};
