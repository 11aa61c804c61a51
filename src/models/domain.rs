use serde::{Deserialize, Serialize};

/// Category a review belongs to. Interpolated verbatim into the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewCategory {
    Food,
    Product,
    Place,
    Other,
}

impl ReviewCategory {
    /// All selectable categories, in menu order.
    pub const ALL: [ReviewCategory; 4] = [
        ReviewCategory::Food,
        ReviewCategory::Product,
        ReviewCategory::Place,
        ReviewCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewCategory::Food => "Food",
            ReviewCategory::Product => "Product",
            ReviewCategory::Place => "Place",
            ReviewCategory::Other => "Other",
        }
    }

    /// Parse a menu selection: a 1-based index or a case-insensitive name.
    pub fn parse(input: &str) -> Option<ReviewCategory> {
        let trimmed = input.trim();
        if let Ok(idx) = trimmed.parse::<usize>() {
            return ReviewCategory::ALL.get(idx.wrapping_sub(1)).copied();
        }
        ReviewCategory::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .copied()
    }
}

impl std::fmt::Display for ReviewCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user submission. Discarded after rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub text: String,
    pub category: ReviewCategory,
}

/// Outcome of the sentiment stage.
///
/// `overall` holds the verdict token exactly as it was matched in the
/// narrative ("positive"/"negative" in whatever case the model wrote it),
/// the capitalised fallback "Positive"/"Negative", or the "Error" sentinel.
/// `percentage` holds the matched digits, the fallback "50", or "Error".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    pub narrative: String,
    pub overall: String,
    pub percentage: String,
}

impl SentimentReport {
    /// True when the remote call failed and the sentinel triple was produced.
    pub fn is_error(&self) -> bool {
        self.overall == "Error"
    }
}

/// One entity detected in the review, in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMatch {
    pub text: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_by_index() {
        assert_eq!(ReviewCategory::parse("1"), Some(ReviewCategory::Food));
        assert_eq!(ReviewCategory::parse("4"), Some(ReviewCategory::Other));
        assert_eq!(ReviewCategory::parse("5"), None);
        assert_eq!(ReviewCategory::parse("0"), None);
    }

    #[test]
    fn test_category_parse_by_name() {
        assert_eq!(ReviewCategory::parse("place"), Some(ReviewCategory::Place));
        assert_eq!(ReviewCategory::parse(" PRODUCT "), Some(ReviewCategory::Product));
        assert_eq!(ReviewCategory::parse("garden"), None);
    }

    #[test]
    fn test_report_error_flag() {
        let report = SentimentReport {
            narrative: "Error with OpenAI API: timeout".to_string(),
            overall: "Error".to_string(),
            percentage: "Error".to_string(),
        };
        assert!(report.is_error());
    }
}
