//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeRef;
use crate::domain::session::SessionState;

/// Domain errors represent violations of the tree and session contracts.
/// A correct caller never triggers them; they are not user-input errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid node reference {node}: {reason}")]
    InvalidReference { node: NodeRef, reason: &'static str },

    #[error("cannot {action} while session is {state}")]
    InvalidTransition {
        state: SessionState,
        action: &'static str,
    },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
