// Service exports
pub mod chat;
pub mod ner;
pub mod sentiment;

pub use chat::{ChatApi, ChatClient, ChatError};
pub use ner::{BertNerModel, EntityExtractor, EntityTagger, NerError};
pub use sentiment::SentimentAnalyzer;
