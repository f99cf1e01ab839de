use log::{info, warn};

use crate::error::ClientError;
use crate::model::{
    question::Question,
    score::{Leaderboard, NewScore, Score},
    session::{PendingSubmission, QuizSession, SubmissionReceipt},
};

/// The remote collaborators a quiz needs.
#[rocket::async_trait]
pub trait QuizApi: Send + Sync {
    /// Fetch the full question set.
    async fn fetch_questions(&self) -> Result<Vec<Question>, ClientError>;

    /// Persist a finished quiz's score.
    async fn submit_score(&self, score: &NewScore) -> Result<(), ClientError>;

    /// Fetch every persisted score.
    async fn fetch_leaderboard(&self) -> Result<Vec<Score>, ClientError>;
}

/// Which collaborator failed most recently, for display.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Load,
    Submission,
    Leaderboard,
}

impl From<&ClientError> for FailureKind {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Load(_) => Self::Load,
            ClientError::Submission(_) => Self::Submission,
            ClientError::Leaderboard(_) => Self::Leaderboard,
        }
    }
}

/// Send a claimed submission. Failure is logged and reported in the receipt,
/// never retried.
pub async fn submit<A: QuizApi + ?Sized>(api: &A, pending: PendingSubmission) -> SubmissionReceipt {
    let recorded = match api.submit_score(&pending.score).await {
        Ok(()) => {
            info!(
                "Recorded score {} for '{}'",
                pending.score.score, pending.score.name
            );
            true
        }
        Err(e) => {
            warn!("{e}");
            false
        }
    };
    SubmissionReceipt {
        epoch: pending.epoch,
        recorded,
    }
}

/// A quiz session wired to its remote collaborators. This is what a
/// presentation layer drives.
pub struct QuizRunner<A> {
    api: A,
    session: QuizSession,
    last_failure: Option<FailureKind>,
}

impl<A: QuizApi> QuizRunner<A> {
    pub fn new(api: A, player: &str) -> Self {
        let mut session = QuizSession::new();
        session.set_player(player);
        Self {
            api,
            session,
            last_failure: None,
        }
    }

    /// The collaborators, for sending a claimed submission with [`submit`]
    /// while the session stays readable.
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Direct access for answering and navigation.
    pub fn session_mut(&mut self) -> &mut QuizSession {
        &mut self.session
    }

    pub fn last_failure(&self) -> Option<FailureKind> {
        self.last_failure
    }

    fn fail(&mut self, err: ClientError) {
        warn!("{err}");
        self.last_failure = Some(FailureKind::from(&err));
    }

    /// Fetch and load a fresh question set. On failure the session is left
    /// as it was. Returns whether questions were loaded.
    pub async fn load(&mut self) -> bool {
        match self.api.fetch_questions().await {
            Ok(questions) => {
                info!("Loaded {} questions", questions.len());
                self.session.load(questions);
                self.last_failure = None;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Claim the score of a completed quiz for sending. `None` unless the
    /// session is complete and its score has not been claimed yet. The
    /// submission status reads `Pending` until the receipt is handed back.
    pub fn begin_submission(&mut self) -> Option<PendingSubmission> {
        self.session.claim_submission()
    }

    /// Hand back the outcome of a claimed submission.
    pub fn finish_submission(&mut self, receipt: SubmissionReceipt) {
        if !receipt.recorded {
            self.last_failure = Some(FailureKind::Submission);
        }
        self.session.finish_submission(receipt);
    }

    /// React to the session having completed. Safe to call any number of
    /// times: the score is sent at most once per completion.
    pub async fn observe_completion(&mut self) {
        let Some(pending) = self.begin_submission() else {
            return;
        };
        let receipt = submit(&self.api, pending).await;
        self.finish_submission(receipt);
    }

    /// Record an answer, then submit the score if that completed the quiz.
    pub async fn answer(&mut self, question_id: &str, option_index: i64) -> bool {
        let recorded = self.session.select_answer(question_id, option_index);
        self.observe_completion().await;
        recorded
    }

    /// Fetch the ranked leaderboard. Empty if it cannot be fetched.
    pub async fn leaderboard(&mut self) -> Leaderboard {
        match self.api.fetch_leaderboard().await {
            Ok(scores) => Leaderboard::ranked(scores),
            Err(e) => {
                self.fail(e);
                Leaderboard::default()
            }
        }
    }
}
