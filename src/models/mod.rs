// Model exports
pub mod domain;

pub use domain::{EntityMatch, ReviewCategory, ReviewRequest, SentimentReport};
