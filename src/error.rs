use log::error;
use mongodb::error::Error as DbError;
use reqwest::{Error as HttpError, StatusCode};
use rocket::{
    http::Status,
    response::{self, status::Custom, Responder},
    serde::json::Json,
    Request,
};
use thiserror::Error;

use crate::model::score::Message;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while serving the score endpoints.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Score store failure: {0}")]
    Store(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl Error {
    fn status(&self) -> Status {
        match self {
            Self::Db(_) | Self::Store(_) => Status::InternalServerError,
            Self::BadRequest(_) => Status::BadRequest,
        }
    }
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status.class().is_server_error() {
            error!("{self}");
        }
        Custom(status, Json(Message::new(self.to_string()))).respond_to(req)
    }
}

/// Why a single request to the quiz services failed.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("Server responded {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("Invalid question set: {0}")]
    InvalidQuestions(#[from] QuestionSetError),
}

/// Why a fetched question set was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionSetError {
    #[error("duplicate question ID '{0}'")]
    DuplicateId(String),
    #[error("question '{id}' has correct answer {correct_answer} but only {options} options")]
    AnswerOutOfRange {
        id: String,
        correct_answer: usize,
        options: usize,
    },
}

/// Failures of the client-side collaborators. None of these are fatal.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to load questions: {0}")]
    Load(RequestError),
    #[error("Failed to submit score: {0}")]
    Submission(RequestError),
    #[error("Failed to fetch leaderboard: {0}")]
    Leaderboard(RequestError),
}

/// The only failure the session controller reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Position {position} is out of range for {len} questions")]
    OutOfRange { position: usize, len: usize },
}
