#![doc = "The `tasks_api` library crate."]
#![doc = ""]
#![doc = "Models, validation rules, authentication helpers, database setup, routing and"]
#![doc = "error handling for the Tasks API. The binary (`main.rs`) reads the configuration"]
#![doc = "and serves `routes::config` with actix-web."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use error::AppError;
