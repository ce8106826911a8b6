//! Remote analysis of candidate responses.
//!
//! This module provides the chat-completion client that turns a prompt
//! into a strengths/gaps summary.

pub mod client;

pub use client::{AnalyzerConfig, RemoteAnalyzer};
