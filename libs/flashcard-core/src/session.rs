//! Quiz session state machine.
//!
//! ```text
//! Idle --start_quiz--> Active --handle_answer--> Active ... --> Finished
//!                        ^                                        |
//!                        +--------------restart_quiz--------------+
//! any --reset_app--> Idle (deck discarded)
//! ```
//!
//! The session only keeps a running tally of correct answers, never a log of
//! which cards were answered which way.

use crate::error::SessionError;
use crate::shuffle::shuffle;
use crate::types::Card;
use rand::Rng;
use serde::Serialize;

/// Lifecycle phase of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Active,
    Finished,
}

/// Identifies the session state an asynchronous result was requested for.
///
/// A ticket goes stale once the deck is replaced, the quiz is (re)started or
/// the app is reset, and for elaboration also once the cursor moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
    cursor: usize,
}

/// Position of the current card, 1-based, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
}

impl Progress {
    /// Percentage of the deck reached, counting the current card.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.position as f64 / self.total as f64 * 100.0
    }
}

/// Final tally of a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
}

impl QuizSummary {
    /// Fraction of cards answered correctly (0.0 to 1.0).
    pub fn correct_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Owns the deck and the progress through it.
#[derive(Debug, Default)]
pub struct QuizSession {
    deck: Vec<Card>,
    phase: Phase,
    cursor: usize,
    correct_count: usize,
    is_flipped: bool,
    elaborating: bool,
    epoch: u64,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session holding `cards`, not yet started.
    pub fn with_deck(cards: Vec<Card>) -> Self {
        let mut session = Self::new();
        session.load_deck(cards);
        session
    }

    /// Replace the deck wholesale and return to `Idle`.
    pub fn load_deck(&mut self, cards: Vec<Card>) {
        self.deck = cards;
        self.phase = Phase::Idle;
        self.clear_progress();
        self.epoch += 1;
    }

    /// Replace the deck only if `ticket` still matches the session.
    ///
    /// Returns false (and leaves the session untouched) for stale tickets.
    pub fn load_deck_for(&mut self, ticket: Ticket, cards: Vec<Card>) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.load_deck(cards);
        true
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn is_elaborating(&self) -> bool {
        self.elaborating
    }

    /// Shuffle the deck and begin at the first card.
    pub fn start_quiz(&mut self) -> Result<(), SessionError> {
        self.start_quiz_with(&mut rand::rng())
    }

    /// Shuffle the deck with `rng` and begin at the first card.
    ///
    /// Fails with `EmptyDeck` and leaves the session unchanged if there are no cards.
    pub fn start_quiz_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        if self.deck.is_empty() {
            return Err(SessionError::EmptyDeck);
        }

        shuffle(&mut self.deck, rng);
        self.clear_progress();
        self.phase = Phase::Active;
        self.epoch += 1;
        Ok(())
    }

    /// Start over on the same deck, reshuffled, with counters reset.
    pub fn restart_quiz(&mut self) -> Result<(), SessionError> {
        self.start_quiz()
    }

    pub fn restart_quiz_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.start_quiz_with(rng)
    }

    /// Discard the deck and all progress.
    pub fn reset_app(&mut self) {
        *self = Self {
            epoch: self.epoch + 1,
            ..Self::default()
        };
    }

    /// The card being shown, while a quiz is active.
    pub fn current_card(&self) -> Option<&Card> {
        match self.phase {
            Phase::Active => self.deck.get(self.cursor),
            _ => None,
        }
    }

    /// Toggle which face of the current card is visible.
    ///
    /// Returns false and does nothing outside the `Active` phase.
    pub fn flip_card(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        self.is_flipped = !self.is_flipped;
        true
    }

    /// Record a self-reported answer and advance to the next card.
    ///
    /// Moves to `Finished` once every card has been answered and returns the
    /// phase after the transition.
    pub fn handle_answer(&mut self, is_correct: bool) -> Result<Phase, SessionError> {
        if self.phase != Phase::Active {
            return Err(SessionError::NotActive);
        }
        if self.elaborating {
            return Err(SessionError::ElaborationPending);
        }

        if is_correct {
            self.correct_count += 1;
        }
        self.cursor += 1;
        self.is_flipped = false;

        if self.cursor >= self.deck.len() {
            self.phase = Phase::Finished;
        }

        Ok(self.phase)
    }

    /// Position of the current card while active.
    pub fn progress(&self) -> Option<Progress> {
        match self.phase {
            Phase::Active => Some(Progress {
                position: self.cursor + 1,
                total: self.deck.len(),
            }),
            _ => None,
        }
    }

    /// Final tally once the quiz has finished.
    pub fn summary(&self) -> Option<QuizSummary> {
        match self.phase {
            Phase::Finished => Some(QuizSummary {
                total: self.deck.len(),
                correct: self.correct_count,
                incorrect: self.deck.len() - self.correct_count,
            }),
            _ => None,
        }
    }

    /// Snapshot of the current state, for tagging asynchronous work.
    pub fn ticket(&self) -> Ticket {
        Ticket {
            epoch: self.epoch,
            cursor: self.cursor,
        }
    }

    /// Whether the deck/session a ticket was issued for still exists.
    pub fn accepts(&self, ticket: Ticket) -> bool {
        ticket.epoch == self.epoch
    }

    /// Mark an explanation request for the current card as outstanding.
    ///
    /// Returns `None` when no card is shown or a request is already pending,
    /// so repeated triggers are ignored.
    pub fn begin_elaboration(&mut self) -> Option<(Ticket, Card)> {
        if self.elaborating {
            return None;
        }
        let card = self.current_card()?.clone();
        self.elaborating = true;
        Some((self.ticket(), card))
    }

    /// Clear the outstanding explanation request issued with `ticket`.
    ///
    /// Returns false when the ticket is stale, in which case the result
    /// should be discarded.
    pub fn finish_elaboration(&mut self, ticket: Ticket) -> bool {
        if !self.elaborating || ticket != self.ticket() {
            return false;
        }
        self.elaborating = false;
        true
    }

    fn clear_progress(&mut self) {
        self.cursor = 0;
        self.correct_count = 0;
        self.is_flipped = false;
        self.elaborating = false;
    }
}
