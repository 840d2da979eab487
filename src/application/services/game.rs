//! Game service
//!
//! Drives rounds of the guessing game and the post-round menu over a
//! [`Console`], growing one in-memory [`DecisionTree`] across rounds.

use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    Answer, Branch, DecisionTree, GameSession, Outcome, Prompt, Teaching, Transition,
};
use crate::infrastructure::traits::Console;
use crate::tree_traits::TreeRender;

const INVALID_ANSWER: &str = "Please answer 'yes' or 'no'.";
const INVALID_CHOICE: &str = "Invalid choice. Please try again.";
const MENU: &str = "What would you like to do next?\n\
1. Play again\n\
2. Reset memory and play again\n\
3. List all animals\n\
4. Quit";

/// Post-round menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    PlayAgain,
    ResetAndPlay,
    ListAnimals,
    Quit,
}

impl MenuChoice {
    /// Parse a menu selection (`1`..`4`), `None` for anything else.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "1" => Some(MenuChoice::PlayAgain),
            "2" => Some(MenuChoice::ResetAndPlay),
            "3" => Some(MenuChoice::ListAnimals),
            "4" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

/// Totals for a whole run, reported when the player quits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rounds: usize,
    pub guessed: usize,
    pub learned: usize,
    pub resets: usize,
}

/// Service running the interactive game.
pub struct GameService {
    console: Arc<dyn Console>,
    settings: Arc<Settings>,
    tree: DecisionTree,
}

impl GameService {
    /// Create a new game service with a default tree.
    pub fn new(console: Arc<dyn Console>, settings: Arc<Settings>) -> Self {
        Self {
            console,
            settings,
            tree: DecisionTree::new(),
        }
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// Play rounds until the player quits or input runs out.
    #[instrument(level = "debug", skip(self))]
    pub fn run(&mut self) -> ApplicationResult<RunSummary> {
        let mut summary = RunSummary::default();
        self.say(&self.settings.greeting)?;

        loop {
            match self.play_round()? {
                Some(Outcome::Confirmed) => summary.guessed += 1,
                Some(Outcome::Taught) => summary.learned += 1,
                None => break,
            }
            summary.rounds += 1;

            match self.after_round()? {
                Some(MenuChoice::ResetAndPlay) => summary.resets += 1,
                Some(MenuChoice::PlayAgain) => {}
                Some(MenuChoice::Quit) | Some(MenuChoice::ListAnimals) | None => break,
            }
        }

        info!(
            "run finished: {} rounds, {} guessed, {} learned, {} resets",
            summary.rounds, summary.guessed, summary.learned, summary.resets
        );
        Ok(summary)
    }

    /// Play one round from the root.
    ///
    /// Returns the outcome, or `None` when input ended mid-round.
    #[instrument(level = "debug", skip(self))]
    pub fn play_round(&mut self) -> ApplicationResult<Option<Outcome>> {
        let mut session = GameSession::start(&self.tree);
        let mut invalid = 0;

        loop {
            let text = match session.prompt(&self.tree)? {
                Prompt::Question(question) => format!("{question} (yes/no): "),
                Prompt::Guess(guess) => format!("Is it a {guess}? (yes/no): "),
                Prompt::Teach { guess } => {
                    let Some(teaching) = self.ask_teaching(&guess)? else {
                        return Ok(None);
                    };
                    session.teach(&mut self.tree, &teaching)?;
                    self.say("Got it! I'll remember that for next time.")?;
                    debug!("tree now has {} animals", self.tree.leaf_count());
                    continue;
                }
                Prompt::Finished(outcome) => return Ok(Some(outcome)),
            };

            let Some(line) = self.ask(&text)? else {
                return Ok(None);
            };
            match session.answer(&self.tree, Answer::parse(&line))? {
                Transition::Reprompt => {
                    invalid = self.count_invalid(invalid, &text)?;
                    self.say(INVALID_ANSWER)?;
                }
                Transition::Entered(state) => {
                    invalid = 0;
                    if session.outcome() == Some(Outcome::Confirmed) {
                        self.say("Yay! I guessed it right!")?;
                    }
                    debug!("round entered {}", state);
                }
            }
        }
    }

    /// Show the post-round menu until the player picks a round or quits.
    ///
    /// Listing animals re-shows the menu; `None` means input ended.
    #[instrument(level = "debug", skip(self))]
    pub fn after_round(&mut self) -> ApplicationResult<Option<MenuChoice>> {
        let mut invalid = 0;
        loop {
            self.say(MENU)?;
            let Some(line) = self.ask("Enter your choice (1/2/3/4): ")? else {
                return Ok(None);
            };
            match MenuChoice::parse(&line) {
                Some(MenuChoice::ListAnimals) => {
                    invalid = 0;
                    self.list_animals()?;
                }
                Some(MenuChoice::ResetAndPlay) => {
                    self.reset()?;
                    return Ok(Some(MenuChoice::ResetAndPlay));
                }
                Some(choice) => return Ok(Some(choice)),
                None => {
                    invalid = self.count_invalid(invalid, "menu choice")?;
                    self.say(INVALID_CHOICE)?;
                }
            }
        }
    }

    /// Forget everything learned so far.
    pub fn reset(&mut self) -> ApplicationResult<()> {
        self.tree.reset_to_default();
        info!("tree reset to default");
        self.say("Game has been reset to initial state.")
    }

    /// Print every animal the tree can currently guess.
    pub fn list_animals(&self) -> ApplicationResult<()> {
        let listing = self
            .tree
            .collect_labels()
            .iter()
            .map(|label| format!("- {label}"))
            .join("\n");
        self.say("Animals currently in memory:")?;
        self.say(&listing)?;
        if self.settings.show_tree {
            self.say(&self.tree.to_tree_string().to_string())?;
        }
        Ok(())
    }

    fn ask_teaching(&self, guess: &str) -> ApplicationResult<Option<Teaching>> {
        let Some(label) = self.ask_text("I give up! What is your animal? ")? else {
            return Ok(None);
        };
        let Some(question) = self.ask_text(&format!(
            "What question distinguishes a {label} from a {guess}?\n"
        ))?
        else {
            return Ok(None);
        };
        let Some(branch) = self.ask_branch(&format!(
            "For a {label}, what is the answer to that question? (yes/no): "
        ))?
        else {
            return Ok(None);
        };
        Ok(Some(Teaching::new(label, question, branch)))
    }

    fn ask_branch(&self, text: &str) -> ApplicationResult<Option<Branch>> {
        let mut invalid = 0;
        loop {
            let Some(line) = self.ask(text)? else {
                return Ok(None);
            };
            if let Some(branch) = Answer::parse(&line).branch() {
                return Ok(Some(branch));
            }
            invalid = self.count_invalid(invalid, text)?;
            self.say(INVALID_ANSWER)?;
        }
    }

    /// Ask for free text, re-prompting on blank lines.
    fn ask_text(&self, text: &str) -> ApplicationResult<Option<String>> {
        let mut invalid = 0;
        loop {
            let Some(line) = self.ask(text)? else {
                return Ok(None);
            };
            let line = line.trim();
            if !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
            invalid = self.count_invalid(invalid, text)?;
        }
    }

    fn ask(&self, text: &str) -> ApplicationResult<Option<String>> {
        self.console.write(text).with_action_context("write prompt")?;
        let line = self.console.read_line().with_action_context("read input")?;
        if line.is_none() {
            debug!("input exhausted");
        }
        Ok(line)
    }

    fn say(&self, text: &str) -> ApplicationResult<()> {
        self.console
            .write_line(text)
            .with_action_context("write output")
    }

    fn count_invalid(&self, invalid: usize, prompt: &str) -> ApplicationResult<usize> {
        let invalid = invalid + 1;
        if invalid > self.settings.max_reprompts {
            return Err(ApplicationError::TooManyInvalidAnswers {
                prompt: prompt.trim().to_string(),
                attempts: invalid,
            });
        }
        Ok(invalid)
    }
}
