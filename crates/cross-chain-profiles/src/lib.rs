//! # Cross-Chain Profiles
//!
//! Identity registry that stores one profile per address and mirrors it to
//! a registry on another chain through a message router.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - Register a profile per address and derive its unique id
//! - Encode the profile and dispatch it through the router, paying the fee
//! - Accept inbound messages only from the configured router
//! - Let the owner rotate the router and withdraw fee balances
//!
//! ## Guarantees
//!
//! | Guarantee | Description |
//! |-----------|-------------|
//! | One profile per address | Second registration fails with `DuplicateProfile` |
//! | All-or-nothing registration | Failed dispatch leaves no profile and no fee spent |
//! | Trusted callbacks | Only the current router may deliver messages |
//! | Exactly-once receive | Redelivered message ids are rejected |
//!
//! ## Module Structure
//!
//! ```text
//! cross-chain-profiles/
//! ├── domain/          # Profile, messages, value objects, invariants, errors
//! ├── algorithms/      # Payload codec, id derivation
//! ├── ports/           # ProfileRegistryApi, RouterClient, EventPublisher
//! ├── adapters/        # InMemoryRouter, InMemoryEventLog
//! ├── gateway.rs       # Router trust boundary
//! ├── service.rs       # Send/receive pipelines and admin surface
//! ├── events.rs        # Audit events and filters
//! ├── config.rs        # Deployment configuration
//! └── telemetry.rs     # Tracing setup
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod events;
pub mod gateway;
pub mod ports;
pub mod service;
pub mod telemetry;

// Re-exports
pub use adapters::{InMemoryEventLog, InMemoryRouter, RoutedPacket, RouterFeeSchedule};
pub use algorithms::{decode_profile, derive_id, encode_profile, profile_seed};
pub use config::RegistryConfig;
pub use domain::{
    known, Address, ChainSelector, CrossChainMessage, FeeQuote, InboundEnvelope, MessageId,
    NewProfile, OutboundMessage, Profile, ProfileId, ProfileStore, ReceiveLedger,
    ReceivedMessageReceipt, RegistryError, RouterConfig, SendState,
};
pub use events::{EventFilter, RegistryEvent};
pub use gateway::RouterGateway;
pub use ports::{
    EventPublisher, NoopEventPublisher, ProfileRegistration, ProfileRegistryApi, RouterClient,
};
pub use service::{ProfileRegistryService, RegistryStats};
pub use telemetry::{init_tracing, TelemetryConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
