//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the document core and an
//! external system (time, filesystem, ticket layout, communications).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod communications;
pub mod filesystem;
pub mod tickets;

pub use clock::Clock;
pub use communications::{Communication, CommunicationStore, CommunicationTag};
pub use filesystem::FileSystem;
pub use tickets::TicketResolver;
