//! Domain entities: answers, branches and teaching input

use std::fmt;

/// Question asked at the root of a freshly built tree.
pub const DEFAULT_QUESTION: &str = "Is your animal warm or cold blooded?";
/// Label on the `yes` side of the default tree.
pub const DEFAULT_YES_LABEL: &str = "Dog";
/// Label on the `no` side of the default tree.
pub const DEFAULT_NO_LABEL: &str = "Snake";

/// A single normalized answer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// Anything else; callers re-prompt.
    Invalid,
}

impl Answer {
    /// Normalize a raw input token.
    ///
    /// Surrounding whitespace is ignored and matching is ASCII case-insensitive.
    /// `yes`/`y` and `no`/`n` are recognized, everything else is `Invalid`.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("yes") || token.eq_ignore_ascii_case("y") {
            Answer::Yes
        } else if token.eq_ignore_ascii_case("no") || token.eq_ignore_ascii_case("n") {
            Answer::No
        } else {
            Answer::Invalid
        }
    }

    /// The branch this answer selects, `None` for `Invalid`.
    pub fn branch(self) -> Option<Branch> {
        match self {
            Answer::Yes => Some(Branch::Yes),
            Answer::No => Some(Branch::No),
            Answer::Invalid => None,
        }
    }
}

impl From<&str> for Answer {
    fn from(token: &str) -> Self {
        Answer::parse(token)
    }
}

/// One of the two children of a question node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    Yes,
    No,
}

impl Branch {
    pub fn other(self) -> Self {
        match self {
            Branch::Yes => Branch::No,
            Branch::No => Branch::Yes,
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Yes => write!(f, "yes"),
            Branch::No => write!(f, "no"),
        }
    }
}

impl From<Branch> for Answer {
    fn from(branch: Branch) -> Self {
        match branch {
            Branch::Yes => Answer::Yes,
            Branch::No => Answer::No,
        }
    }
}

/// Everything needed to grow the tree after a wrong guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teaching {
    /// Name of the animal the player was thinking of
    pub label: String,
    /// Question that tells the new animal apart from the wrong guess
    pub question: String,
    /// Answer to `question` for the new animal
    pub branch: Branch,
}

impl Teaching {
    pub fn new(label: impl Into<String>, question: impl Into<String>, branch: Branch) -> Self {
        Self {
            label: label.into(),
            question: question.into(),
            branch,
        }
    }
}
