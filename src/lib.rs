//! Guess-the-animal game built on a self-extending binary decision tree.
//!
//! The [`domain`] layer holds the tree and the per-round state machine and is
//! usable on its own; the remaining layers wire it to a terminal.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{
    Answer, Branch, DecisionTree, DomainError, GameSession, NodeRef, Outcome, Prompt,
    SessionState, Teaching,
};
