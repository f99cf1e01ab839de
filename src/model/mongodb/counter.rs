use log::debug;
use mongodb::{
    bson::doc,
    error::Error as DbError,
    options::{FindOneAndUpdateOptions, ReturnDocument, UpdateOptions},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::Coll;

/// The counter that hands out score IDs.
pub const SCORE_ID_COUNTER_ID: &str = "score_id";

/// A counter object used to implement auto-increment fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    pub next: u64,
}

impl Counter {
    /// Atomically retrieve the next value of the counter with the given ID.
    pub async fn next(counters: &Coll<Counter>, id: &str) -> Result<u64> {
        let update = doc! {
            "$inc": { "next": 1 }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::Before)
            .build();
        let counter = counters
            .find_one_and_update(doc! { "_id": id }, update, options)
            .await?
            .ok_or_else(|| Error::Store(format!("Failed to find counter with ID {id}")))?;
        Ok(counter.next)
    }
}

/// Create the score ID counter, starting at 1, unless it already exists.
///
/// This operation is idempotent.
pub async fn ensure_score_id_counter_exists(
    counters: &Coll<Counter>,
) -> std::result::Result<(), DbError> {
    debug!("Ensuring the score ID counter exists");
    let options = UpdateOptions::builder().upsert(true).build();
    counters
        .update_one(
            doc! { "_id": SCORE_ID_COUNTER_ID },
            doc! { "$setOnInsert": { "next": 1_i64 } },
            options,
        )
        .await?;
    Ok(())
}
