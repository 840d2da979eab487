//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (Console) but are themselves
//! concrete structs, not traits.

mod game;

pub use game::{GameService, MenuChoice, RunSummary};
