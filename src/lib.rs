//! Review Lens - interactive review sentiment and named-entity analysis
//!
//! This library wires two thin stages behind a console loop: a sentiment
//! requester that prompts a hosted chat-completions model and parses its
//! narrative for an overall verdict, and an entity extractor that runs a
//! pretrained token-classification model locally over the same text.

pub mod config;
pub mod console;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_prompt, merge_token_tags, parse_narrative, TokenTag, Verdict};
pub use crate::models::{EntityMatch, ReviewCategory, ReviewRequest, SentimentReport};
pub use crate::services::{ChatApi, ChatClient, EntityExtractor, EntityTagger, SentimentAnalyzer};
