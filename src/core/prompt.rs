//! Prompt construction for the sentiment stage.
//!
//! The instruction wording is fixed: the narrative parser in
//! [`crate::core::parser`] depends on the model being asked for an explicit
//! overall-verdict line.

/// System role framing for the single-turn conversation.
pub const SYSTEM_PROMPT: &str = "You are an expert in sentiment analysis.";

/// Build the user prompt embedding the category and review verbatim.
///
/// The category is interpolated as given; callers normally pass one of the
/// four menu categories but any string produces a well-formed prompt, as
/// does an empty review.
pub fn build_prompt(review: &str, category: &str) -> String {
    format!(
        "Analyze the following {category} review for sentiment. \
         Provide the sentiment contribution of each significant word as a percentage \
         and indicate whether the overall sentiment is positive or negative:\n\
         Review: {review}"
    )
}
