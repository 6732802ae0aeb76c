pub mod auth_session;
pub mod cli;
pub mod cli_error;
pub mod data_store;
pub mod notify;
mod setup;
pub mod web;
