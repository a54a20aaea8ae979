//! Personal job-search tracker.
//!
//! Eleven record kinds (resumes, applications, recruiter calls, interview
//! questions and so on) live in a relational store. [`tracker::Tracker`]
//! is the entry point: one cached [`tracker::Repository`] per kind over a
//! [`store::RecordStore`], either PostgREST over HTTPS or a local SQLite
//! file.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod filters;
pub mod kinds;
pub mod logging;
pub mod records;
pub mod store;
pub mod tracker;

pub use error::StoreError;
