pub mod mongodb;
pub mod question;
pub mod score;
pub mod session;
pub mod store;
