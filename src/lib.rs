//! Document Q&A service: extracts "Q:/A:" pairs from an uploaded document and
//! answers questions by embedding similarity against the stored questions.

pub mod config;
pub mod document;
pub mod embedding;
pub mod qa;
pub mod server;
