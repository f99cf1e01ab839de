//! The client side of the quiz: fetching questions, submitting scores, and
//! driving a [`QuizSession`](crate::model::session::QuizSession) through its
//! network collaborators.

mod http;
mod runner;

pub use http::QuizClient;
pub use runner::{submit, FailureKind, QuizApi, QuizRunner};
