//! Narrative parsing for the sentiment stage.
//!
//! The remote model is asked to end its narrative with an explicit
//! "Overall sentiment: ... Percentage: ...%" line, but nothing guarantees it
//! phrases the verdict that way. When the pattern is absent we fall back to a
//! substring heuristic and a fixed percentage.

use once_cell::sync::Lazy;
use regex::Regex;

/// Percentage reported when the narrative lacks a parseable verdict line.
/// A fixed placeholder, not a derived confidence value.
pub const DEFAULT_PERCENTAGE: &str = "50";

// Non-greedy gap, single line: the gap does not cross newlines.
static OVERALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Overall sentiment: (positive|negative).*?Percentage: (\d+)%")
        .expect("overall-sentiment regex is valid")
});

/// Parsed overall verdict: sentiment token and percentage digits, both kept
/// as the strings that will be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub sentiment: String,
    pub percentage: String,
}

/// Scan a narrative for the overall-verdict pattern.
///
/// On a match, both captures are returned verbatim (including their case).
/// Otherwise the sentiment is "Positive" if the narrative contains
/// "positive" anywhere (case-insensitive), else "Negative", and the
/// percentage is [`DEFAULT_PERCENTAGE`].
pub fn parse_narrative(narrative: &str) -> Verdict {
    if let Some(caps) = OVERALL_RE.captures(narrative) {
        return Verdict {
            sentiment: caps[1].to_string(),
            percentage: caps[2].to_string(),
        };
    }

    let sentiment = if narrative.to_lowercase().contains("positive") {
        "Positive"
    } else {
        "Negative"
    };

    Verdict {
        sentiment: sentiment.to_string(),
        percentage: DEFAULT_PERCENTAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbatim_match() {
        let narrative =
            "Word-level breakdown follows. Overall sentiment: positive (strong) Percentage: 73%";
        let verdict = parse_narrative(narrative);
        assert_eq!(verdict.sentiment, "positive");
        assert_eq!(verdict.percentage, "73");
    }

    #[test]
    fn test_match_preserves_case() {
        let narrative = "Overall sentiment: Negative. Percentage: 12%";
        let verdict = parse_narrative(narrative);
        assert_eq!(verdict.sentiment, "Negative");
        assert_eq!(verdict.percentage, "12");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let narrative = "OVERALL SENTIMENT: POSITIVE -- PERCENTAGE: 88%";
        let verdict = parse_narrative(narrative);
        assert_eq!(verdict.sentiment, "POSITIVE");
        assert_eq!(verdict.percentage, "88");
    }

    #[test]
    fn test_gap_does_not_cross_newlines() {
        let narrative = "Overall sentiment: positive\nPercentage: 73%";
        let verdict = parse_narrative(narrative);
        // Falls back, but the word "positive" is present.
        assert_eq!(verdict.sentiment, "Positive");
        assert_eq!(verdict.percentage, DEFAULT_PERCENTAGE);
    }

    #[test]
    fn test_fallback_positive_substring() {
        let verdict = parse_narrative("The tone here is broadly Positive throughout.");
        assert_eq!(verdict.sentiment, "Positive");
        assert_eq!(verdict.percentage, "50");
    }

    #[test]
    fn test_fallback_negative() {
        let verdict = parse_narrative("Harsh words, little to redeem the experience.");
        assert_eq!(verdict.sentiment, "Negative");
        assert_eq!(verdict.percentage, "50");
    }

    #[test]
    fn test_empty_narrative_falls_back_negative() {
        let verdict = parse_narrative("");
        assert_eq!(verdict.sentiment, "Negative");
        assert_eq!(verdict.percentage, "50");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let narrative = "Overall sentiment: negative ... Percentage: 20% \
                         and later Overall sentiment: positive ... Percentage: 90%";
        let verdict = parse_narrative(narrative);
        assert_eq!(verdict.sentiment, "negative");
        assert_eq!(verdict.percentage, "20");
    }
}
