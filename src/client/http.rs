use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ClientError, RequestError};
use crate::model::{
    question::{validate_questions, Question},
    score::{Message, NewScore, Score},
};

use super::QuizApi;

/// HTTP access to the question source and the score service.
#[derive(Debug, Clone)]
pub struct QuizClient {
    http: Client,
    config: ClientConfig,
}

impl QuizClient {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { http, config })
    }

    /// Fetch the full question set from the configured data URL.
    pub async fn fetch_questions(&self) -> Result<Vec<Question>, RequestError> {
        debug!("Fetching questions from {}", self.config.data_url);
        let response = self.http.get(&self.config.data_url).send().await?;
        let questions: Vec<Question> = json_body(response).await?;
        validate_questions(&questions)?;
        Ok(questions)
    }

    /// `POST /addScore`.
    pub async fn add_score(&self, score: &NewScore) -> Result<Message, RequestError> {
        let url = self.config.service_endpoint("addScore");
        debug!("Submitting score {} for '{}' to {url}", score.score, score.name);
        let response = self.http.post(url).json(score).send().await?;
        json_body(response).await
    }

    /// `GET /getScore`.
    pub async fn get_scores(&self) -> Result<Vec<Score>, RequestError> {
        let url = self.config.service_endpoint("getScore");
        let response = self.http.get(url).send().await?;
        json_body(response).await
    }
}

/// Decode a successful response, or turn an error status into a
/// [`RequestError::Status`] carrying the server's message.
async fn json_body<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let text = response.text().await.unwrap_or_default();
    let message = rocket::serde::json::serde_json::from_str::<Message>(&text)
        .map(|m| m.message)
        .unwrap_or(text);
    Err(RequestError::Status { status, message })
}

#[rocket::async_trait]
impl QuizApi for QuizClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ClientError> {
        QuizClient::fetch_questions(self)
            .await
            .map_err(ClientError::Load)
    }

    async fn submit_score(&self, score: &NewScore) -> Result<(), ClientError> {
        self.add_score(score)
            .await
            .map(|_| ())
            .map_err(ClientError::Submission)
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<Score>, ClientError> {
        self.get_scores().await.map_err(ClientError::Leaderboard)
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, TcpListener};

    use reqwest::StatusCode;
    use rocket::{config::LogLevel, fairing::AdHoc, tokio::sync::oneshot, Shutdown};

    use crate::client::QuizRunner;
    use crate::model::{
        session::{SessionState, SubmissionStatus},
        store::{examples::UnavailableScores, MemoryScores, ScoreStore, Scores},
    };

    use super::*;

    /// Launch the score service on a free loopback port and return a client
    /// pointed at it. Questions are fetched from a path the service lacks.
    async fn serve(scores: Scores) -> (QuizClient, Shutdown) {
        let port = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = rocket::Config {
            address: Ipv4Addr::LOCALHOST.into(),
            port,
            log_level: LogLevel::Off,
            ..rocket::Config::debug_default()
        };

        let (ready, listening) = oneshot::channel();
        let rocket = crate::rocket_for_store(scores)
            .configure(config)
            .attach(AdHoc::on_liftoff("Ready", move |_| {
                Box::pin(async move {
                    let _ = ready.send(());
                })
            }))
            .ignite()
            .await
            .unwrap();
        let shutdown = rocket.shutdown();
        rocket::tokio::spawn(rocket.launch());
        listening.await.unwrap();

        let service_url = format!("http://127.0.0.1:{port}");
        let client = QuizClient::new(ClientConfig {
            data_url: format!("{service_url}/questions.json"),
            service_url,
            timeout_secs: 5,
        })
        .unwrap();
        (client, shutdown)
    }

    /// Nothing listens on port 9 of the loopback interface.
    fn unreachable() -> QuizClient {
        QuizClient::new(ClientConfig {
            data_url: "http://127.0.0.1:9/questions.json".to_string(),
            service_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[rocket::async_test]
    async fn unreachable_services_are_reported() {
        let client = unreachable();
        assert!(matches!(
            client.fetch_questions().await,
            Err(RequestError::Http(_))
        ));
        assert!(matches!(
            client.add_score(&NewScore::from_percentage("Ada", 0.0)).await,
            Err(RequestError::Http(_))
        ));
        assert!(matches!(client.get_scores().await, Err(RequestError::Http(_))));
    }

    #[rocket::async_test]
    async fn error_statuses_carry_the_server_message() {
        let (client, shutdown) = serve(Box::new(UnavailableScores)).await;

        match client.add_score(&NewScore::from_percentage("Ada", 50.0)).await {
            Err(RequestError::Status { status, message }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "Score store failure: connection reset");
            }
            other => panic!("expected an error status, got {other:?}"),
        }
        match client.get_scores().await {
            Err(RequestError::Status { status, message }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert!(message.starts_with("Score store failure:"));
            }
            other => panic!("expected an error status, got {other:?}"),
        }
        assert!(matches!(
            client.fetch_questions().await,
            Err(RequestError::Status { status, .. }) if status == StatusCode::NOT_FOUND
        ));

        shutdown.notify();
    }

    #[rocket::async_test]
    async fn scores_round_trip_through_the_service() {
        let scores = MemoryScores::default();
        let (client, shutdown) = serve(Box::new(scores.clone())).await;

        let message = client
            .add_score(&NewScore::from_percentage("Ada", 100.0))
            .await
            .unwrap();
        assert_eq!(message.message, "Score added");
        client
            .submit_score(&NewScore::from_percentage("Bob", 50.0))
            .await
            .unwrap();

        let fetched = client.get_scores().await.unwrap();
        assert_eq!(
            fetched,
            vec![
                Score::example(1, "Ada", "100"),
                Score::example(2, "Bob", "50"),
            ]
        );
        assert_eq!(scores.list().await.unwrap(), fetched);

        let board = client.fetch_leaderboard().await.unwrap();
        assert_eq!(board.len(), 2);

        shutdown.notify();
    }

    #[rocket::async_test]
    async fn unreachable_services_do_not_break_the_runner() {
        let mut runner = QuizRunner::new(unreachable(), "Ada");

        assert!(!runner.load().await);
        assert_eq!(runner.session().state(), SessionState::Empty);
        assert!(runner.leaderboard().await.is_empty());
        assert_eq!(runner.session().submission_status(), SubmissionStatus::NotIssued);
    }
}
