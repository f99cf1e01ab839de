use log::{debug, warn};

use crate::error::SessionError;
use crate::model::{question::Question, score::NewScore};

/// Coarse state of a session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No questions loaded.
    Empty,
    /// Questions loaded, quiz not finished.
    InProgress,
    /// The quiz has been finished; only a reset leaves this state.
    Complete,
}

/// What has happened to the score of the current completion.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Nothing sent for this completion (or the quiz is not complete).
    NotIssued,
    /// Claimed and in flight.
    Pending,
    /// The server accepted the score.
    Recorded,
    /// The call failed; the score is lost.
    Failed,
}

/// A claimed score submission, tagged with the completion epoch it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub epoch: u64,
    pub score: NewScore,
}

/// The result of a submission, handed back to the session that claimed it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub epoch: u64,
    pub recorded: bool,
}

/// One run of the quiz: the question set, where the player is in it, and
/// whether the score for the current completion has been sent.
///
/// Each epoch starts at a load or reset. At most one submission can be claimed
/// per epoch.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    position: usize,
    player: String,
    complete: bool,
    epoch: u64,
    submission: SubmissionStatus,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            position: 0,
            player: String::new(),
            complete: false,
            epoch: 0,
            submission: SubmissionStatus::NotIssued,
        }
    }

    /// Replace the question set wholesale and start from the beginning.
    pub fn load(&mut self, questions: Vec<Question>) {
        debug!("Loading {} questions", questions.len());
        self.questions = questions;
        self.restart();
    }

    /// Go back to the first question with every answer cleared. The question
    /// set is kept.
    pub fn reset(&mut self) {
        debug!("Resetting session for '{}'", self.player);
        self.restart();
    }

    fn restart(&mut self) {
        for question in &mut self.questions {
            question.clear_answer();
        }
        self.position = 0;
        self.complete = false;
        self.epoch += 1;
        self.submission = SubmissionStatus::NotIssued;
    }

    pub fn set_player(&mut self, name: &str) {
        self.player = name.trim().to_string();
    }

    pub fn clear_player(&mut self) {
        self.player.clear();
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Record an answer for the question with the given ID.
    ///
    /// The answer overwrites any earlier one. Returns false, changing nothing,
    /// if no such question is loaded.
    ///
    /// The session completes when the answer is recorded while the player is
    /// on the last question, or when it leaves no question unanswered.
    pub fn select_answer(&mut self, question_id: &str, option_index: i64) -> bool {
        let Some(question) = self.questions.iter_mut().find(|q| q.id == question_id) else {
            warn!("Ignoring answer for unknown question '{question_id}'");
            return false;
        };
        question.answer(option_index);

        let on_last = self.position + 1 == self.questions.len();
        if !self.complete && (on_last || self.answered_count() == self.questions.len()) {
            debug!("Session complete with score {}", self.score());
            self.complete = true;
        }
        true
    }

    /// Advance one question. Does nothing on the last question, on an empty
    /// session, or once complete.
    pub fn go_next(&mut self) {
        if !self.complete && self.position + 1 < self.questions.len() {
            self.position += 1;
        }
    }

    /// Step back one question. Does nothing on the first question or once
    /// complete.
    pub fn go_previous(&mut self) {
        if !self.complete && self.position > 0 {
            self.position -= 1;
        }
    }

    /// The question the player is looking at.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.questions
            .get(self.position)
            .ok_or(SessionError::OutOfRange {
                position: self.position,
                len: self.questions.len(),
            })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn state(&self) -> SessionState {
        if self.questions.is_empty() {
            SessionState::Empty
        } else if self.complete {
            SessionState::Complete
        } else {
            SessionState::InProgress
        }
    }

    pub fn correct_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct()).count()
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    /// Percentage of questions answered correctly, in `[0, 100]`. Zero when
    /// nothing is loaded.
    pub fn score(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.correct_count() as f64 / self.questions.len() as f64 * 100.0
    }

    pub fn submission_status(&self) -> SubmissionStatus {
        self.submission
    }

    /// Claim the score submission for the current completion.
    ///
    /// Returns `None` unless the session is complete and nothing has been
    /// claimed since it last became complete.
    pub fn claim_submission(&mut self) -> Option<PendingSubmission> {
        if !self.complete || self.submission != SubmissionStatus::NotIssued {
            return None;
        }
        self.submission = SubmissionStatus::Pending;
        Some(PendingSubmission {
            epoch: self.epoch,
            score: NewScore::from_percentage(self.player.clone(), self.score()),
        })
    }

    /// Record how a claimed submission went. Receipts from before the last
    /// load or reset are ignored.
    pub fn finish_submission(&mut self, receipt: SubmissionReceipt) {
        if receipt.epoch != self.epoch || self.submission != SubmissionStatus::Pending {
            debug!("Dropping stale submission receipt for epoch {}", receipt.epoch);
            return;
        }
        self.submission = if receipt.recorded {
            SubmissionStatus::Recorded
        } else {
            SubmissionStatus::Failed
        };
    }
}
