//! Live adapters for real external interactions.

pub mod clock;
pub mod communications;
pub mod filesystem;
pub mod tickets;
