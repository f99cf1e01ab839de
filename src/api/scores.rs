use log::info;
use rocket::{
    serde::json::{Error as JsonError, Json},
    Route, State,
};

use crate::error::{Error, Result};
use crate::model::{
    score::{Message, NewScore, Score},
    store::Scores,
};

pub fn routes() -> Vec<Route> {
    routes![add_score, get_scores]
}

/// Append a score. The score text is stored exactly as received.
#[post("/addScore", data = "<score>")]
async fn add_score(
    score: std::result::Result<Json<NewScore>, JsonError<'_>>,
    scores: &State<Scores>,
) -> Result<Json<Message>> {
    let score = score.map_err(|e| Error::BadRequest(e.to_string()))?.into_inner();
    let stored = scores.append(score).await?;
    info!("Added score {} for '{}'", stored.id, stored.name);
    Ok(Json(Message::new("Score added")))
}

/// Every score, in the order they were added.
#[get("/getScore")]
async fn get_scores(scores: &State<Scores>) -> Result<Json<Vec<Score>>> {
    Ok(Json(scores.list().await?))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::serde_json::{self, json},
    };

    use crate::model::store::{examples::UnavailableScores, MemoryScores, ScoreStore};

    use super::*;

    async fn post_score(client: &Client, name: &str, score: &str) -> Status {
        client
            .post(uri!(add_score))
            .header(ContentType::JSON)
            .body(json!({ "name": name, "score": score }).to_string())
            .dispatch()
            .await
            .status()
    }

    #[backend_test]
    async fn add_then_list_scores(client: Client) {
        let response = client
            .post(uri!(add_score))
            .header(ContentType::JSON)
            .body(json!(NewScore::from_percentage("Ada", 2.0 / 3.0 * 100.0)).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let raw_response = response.into_string().await.unwrap();
        let message = serde_json::from_str::<Message>(&raw_response).unwrap();
        assert_eq!(message.message, "Score added");

        assert_eq!(Status::Ok, post_score(&client, "Bob", "100").await);

        let response = client.get(uri!(get_scores)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let raw_response = response.into_string().await.unwrap();
        let fetched = serde_json::from_str::<Vec<Score>>(&raw_response).unwrap();

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].id, 1);
        assert_eq!(fetched[0].name, "Ada");
        assert!(fetched[0].score.starts_with("66.666"));
        assert_eq!(fetched[1], Score::example(2, "Bob", "100"));
    }

    #[backend_test]
    async fn list_is_empty_initially(client: Client) {
        let response = client.get(uri!(get_scores)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(response.into_string().await.unwrap(), "[]");
    }

    #[backend_test]
    async fn any_score_text_is_accepted(client: Client, scores: MemoryScores) {
        assert_eq!(Status::Ok, post_score(&client, "", "").await);
        assert_eq!(Status::Ok, post_score(&client, "Eve", "not a number").await);
        assert_eq!(Status::Ok, post_score(&client, "Eve", "-12.5e3").await);

        let stored = scores.list().await.unwrap();
        let texts = stored.iter().map(|s| s.score.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, ["", "not a number", "-12.5e3"]);
    }

    #[backend_test]
    async fn duplicate_scores_are_appended(client: Client, scores: MemoryScores) {
        for _ in 0..3 {
            assert_eq!(Status::Ok, post_score(&client, "Ada", "50").await);
        }
        let ids = scores
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[backend_test]
    async fn malformed_body_is_rejected(client: Client, scores: MemoryScores) {
        let response = client
            .post(uri!(add_score))
            .header(ContentType::JSON)
            .body(json!({ "name": "Ada", "score": 50 }).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());
        let raw_response = response.into_string().await.unwrap();
        assert!(serde_json::from_str::<Message>(&raw_response).is_ok());
        assert!(scores.list().await.unwrap().is_empty());
    }

    #[backend_test]
    async fn non_json_body_is_a_json_bad_request(client: Client, scores: MemoryScores) {
        let response = client
            .post(uri!(add_score))
            .header(ContentType::Plain)
            .body("Ada scored 50")
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());
        assert_eq!(response.content_type(), Some(ContentType::JSON));
        let raw_response = response.into_string().await.unwrap();
        let message = serde_json::from_str::<Message>(&raw_response).unwrap();
        assert!(message.message.starts_with("Bad request:"));
        assert!(scores.list().await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn store_failures_are_server_errors() {
        let client = Client::tracked(crate::rocket_for_store(Box::new(UnavailableScores)))
            .await
            .unwrap();

        let response = client
            .post(uri!(add_score))
            .header(ContentType::JSON)
            .body(json!({ "name": "Ada", "score": "50" }).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::InternalServerError, response.status());
        let raw_response = response.into_string().await.unwrap();
        let message = serde_json::from_str::<Message>(&raw_response).unwrap();
        assert!(message.message.contains("connection reset"));

        let response = client.get(uri!(get_scores)).dispatch().await;
        assert_eq!(Status::InternalServerError, response.status());
        let raw_response = response.into_string().await.unwrap();
        assert!(serde_json::from_str::<Message>(&raw_response).is_ok());
    }
}
