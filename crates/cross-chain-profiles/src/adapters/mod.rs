//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports.

mod event_log;
mod in_memory_router;

pub use event_log::{InMemoryEventLog, DEFAULT_EVENT_CAPACITY};
pub use in_memory_router::{InMemoryRouter, RoutedPacket, RouterFeeSchedule};
