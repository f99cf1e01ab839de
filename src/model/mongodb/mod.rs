mod collection;
mod counter;
mod score;

pub use collection::{Coll, MongoCollection};
pub use counter::{ensure_score_id_counter_exists, Counter, SCORE_ID_COUNTER_ID};
pub use score::{MongoScores, StoredScore};
