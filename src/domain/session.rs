//! One round of play: a cursor walking a [`DecisionTree`] driven by answers.

use std::fmt;

use tracing::{debug, instrument};

use crate::domain::arena::{DecisionTree, NodeRef};
use crate::domain::entities::{Answer, Branch, Teaching};
use crate::domain::error::{DomainError, DomainResult};

/// Where a round currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Cursor is on a question node
    Traversing,
    /// Cursor is on a leaf, waiting for the guess to be confirmed
    AwaitingConfirmation,
    /// Guess was wrong, waiting for the new animal and its question
    AwaitingTeachingInput,
    Confirmed,
    Taught,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Confirmed | SessionState::Taught)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Traversing => "traversing",
            SessionState::AwaitingConfirmation => "awaiting confirmation",
            SessionState::AwaitingTeachingInput => "awaiting teaching input",
            SessionState::Confirmed => "confirmed",
            SessionState::Taught => "taught",
        };
        f.write_str(name)
    }
}

/// How a finished round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The guess was right
    Confirmed,
    /// The guess was wrong and the tree learned the new animal
    Taught,
}

/// What the caller has to show the player next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Question(String),
    Guess(String),
    Teach { guess: String },
    Finished(Outcome),
}

/// Result of feeding one answer to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Answer was not yes/no; nothing changed
    Reprompt,
    Entered(SessionState),
}

/// A single round over a tree.
///
/// Holds nothing but a cursor and the round's state; the tree is passed in
/// on every call so the session never outlives a borrow of it.
#[derive(Debug, Clone)]
pub struct GameSession {
    cursor: NodeRef,
    state: SessionState,
}

impl GameSession {
    /// Starts a round at the root of `tree`.
    pub fn start(tree: &DecisionTree) -> Self {
        let state = if tree.root_node().is_leaf() {
            SessionState::AwaitingConfirmation
        } else {
            SessionState::Traversing
        };
        Self {
            cursor: tree.root(),
            state,
        }
    }

    /// Moves the cursor back to the root for another round.
    pub fn rewind(&mut self, tree: &DecisionTree) {
        *self = Self::start(tree);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cursor(&self) -> NodeRef {
        self.cursor
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            SessionState::Confirmed => Some(Outcome::Confirmed),
            SessionState::Taught => Some(Outcome::Taught),
            _ => None,
        }
    }

    pub fn prompt(&self, tree: &DecisionTree) -> DomainResult<Prompt> {
        let node = tree.node(self.cursor)?;
        let prompt = match self.state {
            SessionState::Traversing => {
                Prompt::Question(node.question().unwrap_or_default().to_string())
            }
            SessionState::AwaitingConfirmation => {
                Prompt::Guess(node.label().unwrap_or_default().to_string())
            }
            SessionState::AwaitingTeachingInput => Prompt::Teach {
                guess: node.label().unwrap_or_default().to_string(),
            },
            SessionState::Confirmed => Prompt::Finished(Outcome::Confirmed),
            SessionState::Taught => Prompt::Finished(Outcome::Taught),
        };
        Ok(prompt)
    }

    /// Feeds one yes/no answer to the round.
    #[instrument(level = "debug", skip(self, tree), fields(state = %self.state))]
    pub fn answer(&mut self, tree: &DecisionTree, answer: Answer) -> DomainResult<Transition> {
        match (self.state, answer.branch()) {
            (SessionState::Traversing | SessionState::AwaitingConfirmation, None) => {
                debug!("ignoring answer outside yes/no");
                return Ok(Transition::Reprompt);
            }
            (SessionState::Traversing, Some(branch)) => {
                let next = tree.child(self.cursor, branch)?;
                self.cursor = next;
                if tree.is_leaf(next)? {
                    self.state = SessionState::AwaitingConfirmation;
                }
            }
            (SessionState::AwaitingConfirmation, Some(branch)) => {
                self.state = match branch {
                    Branch::Yes => SessionState::Confirmed,
                    Branch::No => SessionState::AwaitingTeachingInput,
                };
            }
            (state, _) => {
                return Err(DomainError::InvalidTransition {
                    state,
                    action: "answer",
                })
            }
        }
        debug!("now {}", self.state);
        Ok(Transition::Entered(self.state))
    }

    /// Grows the tree at the wrongly guessed leaf and ends the round.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn teach(&mut self, tree: &mut DecisionTree, teaching: &Teaching) -> DomainResult<()> {
        if self.state != SessionState::AwaitingTeachingInput {
            return Err(DomainError::InvalidTransition {
                state: self.state,
                action: "teach",
            });
        }
        tree.learn(
            self.cursor,
            &teaching.label,
            &teaching.question,
            teaching.branch,
        )?;
        self.state = SessionState::Taught;
        Ok(())
    }
}
