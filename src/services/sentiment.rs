use crate::core::{build_prompt, parse_narrative, SYSTEM_PROMPT};
use crate::models::SentimentReport;
use crate::services::chat::ChatApi;

/// Sentiment requester - builds the prompt, calls the remote model, and
/// parses the narrative for an overall verdict.
///
/// The stage never fails outward: remote errors are folded into a report
/// whose `overall` and `percentage` fields carry the "Error" sentinel, so
/// rendering needs no separate error path.
pub struct SentimentAnalyzer<C> {
    chat: C,
}

impl<C: ChatApi> SentimentAnalyzer<C> {
    pub fn new(chat: C) -> Self {
        Self { chat }
    }

    /// Analyze a review in the given category.
    ///
    /// The category is interpolated verbatim; an empty review still produces
    /// a well-formed prompt. One outbound call per invocation, no retry.
    pub async fn analyze(&self, review: &str, category: &str) -> SentimentReport {
        let prompt = build_prompt(review, category);

        match self.chat.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(narrative) => {
                let verdict = parse_narrative(&narrative);
                SentimentReport {
                    narrative,
                    overall: verdict.sentiment,
                    percentage: verdict.percentage,
                }
            }
            Err(e) => {
                tracing::error!("Sentiment request failed: {}", e);
                SentimentReport {
                    narrative: format!("Error with OpenAI API: {e}"),
                    overall: "Error".to_string(),
                    percentage: "Error".to_string(),
                }
            }
        }
    }
}
