//! Domain layer: the decision tree and the round state machine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod session;

pub use arena::{DecisionTree, NodeKind, NodeRef, TreeIterator, TreeNode};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use session::{GameSession, Outcome, Prompt, SessionState, Transition};
