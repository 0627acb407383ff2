//! contentverify - AI-generation and plagiarism checks for text and documents.
//!
//! A [`services::Session`] owns the text under review and drives the remote
//! extraction and analysis services through a [`client::VerificationBackend`].

pub mod cli;
pub mod client;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;
