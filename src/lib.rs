#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::StoreFairing;
use crate::logging::LoggerFairing;
use crate::model::store::Scores;

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

/// Build the score service, with its store chosen by configuration.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(LoggerFairing)
        .attach(StoreFairing)
}

/// Build the score service around an existing store.
pub fn rocket_for_store(scores: Scores) -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(LoggerFairing)
        .manage(scores)
}
