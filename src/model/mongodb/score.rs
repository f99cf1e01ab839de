use mongodb::{bson::doc, error::Error as DbError, options::FindOptions, Database};
use rocket::futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    score::{NewScore, Score},
    store::ScoreStore,
};

use super::{
    counter::{ensure_score_id_counter_exists, Counter, SCORE_ID_COUNTER_ID},
    Coll,
};

/// A score document, keyed by its auto-incremented ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredScore {
    #[serde(rename = "_id")]
    pub id: u64,
    pub name: String,
    pub score: String,
}

impl From<StoredScore> for Score {
    fn from(stored: StoredScore) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            score: stored.score,
        }
    }
}

/// Scores kept in MongoDB.
#[derive(Clone)]
pub struct MongoScores {
    scores: Coll<StoredScore>,
    counters: Coll<Counter>,
}

impl MongoScores {
    /// Get a handle on the score collections, creating the ID counter if needed.
    pub async fn open(db: &Database) -> std::result::Result<Self, DbError> {
        let counters = Coll::from_db(db);
        ensure_score_id_counter_exists(&counters).await?;
        Ok(Self {
            scores: Coll::from_db(db),
            counters,
        })
    }
}

#[rocket::async_trait]
impl ScoreStore for MongoScores {
    async fn append(&self, score: NewScore) -> Result<Score> {
        let id = Counter::next(&self.counters, SCORE_ID_COUNTER_ID).await?;
        let stored = StoredScore {
            id,
            name: score.name,
            score: score.score,
        };
        self.scores.insert_one(&stored, None).await?;
        Ok(stored.into())
    }

    async fn list(&self) -> Result<Vec<Score>> {
        let by_id = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let scores = self
            .scores
            .find(None, by_id)
            .await?
            .map_ok(Score::from)
            .try_collect()
            .await?;
        Ok(scores)
    }
}
