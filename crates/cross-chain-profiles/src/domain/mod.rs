//! # Domain Module
//!
//! Core domain types for the cross-chain profile registry.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod profile_store;
pub mod receipts;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use profile_store::ProfileStore;
pub use receipts::ReceiveLedger;
pub use value_objects::*;
