pub mod parser;
pub mod relevance;
pub mod search;
pub mod service;
pub mod types;
pub mod utils;

pub use parser::{extract_qa, extract_qa_pairs};
pub use service::{AskOutcome, QAService};
pub use types::{QAItem, QASystem, QaStore};
