//! Court reports HTTP test suite.
//!
//! Drives the court report endpoints through actix-web with in-memory
//! collaborators; no database or S3 is needed.
//!
//! Run with: cargo test --test court_reports

mod test_helpers;

mod test_download;
mod test_generate;
mod test_listing;
