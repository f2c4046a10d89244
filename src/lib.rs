pub mod activity;
pub mod catalog;
pub mod config;
pub mod error;
pub mod lenient;
pub mod pipeline;
pub mod profile;
pub mod routes;
pub mod state;
pub mod store;
pub mod types;
pub mod upload;
