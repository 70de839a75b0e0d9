//! CASA court reports server library.
//!
//! Lists the cases assigned to a user, renders court reports from Word
//! templates, stores them against their case and serves them for download.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
