pub mod cache;
pub mod config;
pub mod details;
pub mod error;
pub mod etag;
pub mod extract;
pub mod routes;
pub mod search;
pub mod state;
