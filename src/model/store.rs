use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::model::score::{NewScore, Score};

/// Somewhere scores can be appended to and listed from.
#[rocket::async_trait]
pub trait ScoreStore: Send + Sync {
    /// Persist a new score, returning it with its generated ID.
    async fn append(&self, score: NewScore) -> Result<Score>;

    /// Every score, in the order they were added.
    async fn list(&self) -> Result<Vec<Score>>;
}

/// The store placed in Rocket's managed state.
pub type Scores = Box<dyn ScoreStore>;

/// Scores kept in process memory. Clones share the same scores.
#[derive(Debug, Clone, Default)]
pub struct MemoryScores {
    scores: Arc<Mutex<Vec<Score>>>,
}

impl MemoryScores {
    fn lock(&self) -> Result<MutexGuard<'_, Vec<Score>>> {
        self.scores
            .lock()
            .map_err(|e| Error::Store(e.to_string()))
    }
}

#[rocket::async_trait]
impl ScoreStore for MemoryScores {
    async fn append(&self, score: NewScore) -> Result<Score> {
        let mut scores = self.lock()?;
        let score = Score {
            id: scores.len() as u64 + 1,
            name: score.name,
            score: score.score,
        };
        scores.push(score.clone());
        Ok(score)
    }

    async fn list(&self) -> Result<Vec<Score>> {
        Ok(self.lock()?.clone())
    }
}
