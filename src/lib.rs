//! TriageFlow TUI - a terminal client for the TriageFlow triage assistant.
//!
//! This library exposes modules for use in integration tests.

pub mod api;
pub mod app;
pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod stream;
pub mod ui;
