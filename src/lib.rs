//! HTTP service answering predictions from a linear model fitted at startup.

pub mod config;
pub mod error;
pub mod inference;
pub mod models;
pub mod routes;
