//! Interactive console surface: category menu, review input, rendering.
//!
//! Owns no business logic. One submission runs the sentiment stage, then the
//! extraction stage, then renders both; the loop blocks until the render is
//! complete before accepting the next submission.

use std::io::{self, BufRead, Write};

use crate::models::{EntityMatch, ReviewCategory, ReviewRequest, SentimentReport};
use crate::services::{ChatApi, EntityTagger, SentimentAnalyzer};

/// Result of one submission cycle.
#[derive(Debug)]
pub enum ReviewOutcome {
    /// The review text was empty; both stages were skipped.
    EmptyReview,
    Analyzed {
        sentiment: SentimentReport,
        entities: Result<Vec<EntityMatch>, String>,
    },
}

/// Run both stages for one request, or neither when the text is empty.
pub async fn run_review<C, T>(
    analyzer: &SentimentAnalyzer<C>,
    tagger: &T,
    request: &ReviewRequest,
) -> ReviewOutcome
where
    C: ChatApi,
    T: EntityTagger,
{
    if request.text.is_empty() {
        return ReviewOutcome::EmptyReview;
    }

    let sentiment = analyzer
        .analyze(&request.text, request.category.as_str())
        .await;
    let entities = tagger.extract(&request.text).map_err(|e| e.to_string());

    ReviewOutcome::Analyzed {
        sentiment,
        entities,
    }
}

/// Render one outcome.
pub fn render(out: &mut impl Write, outcome: &ReviewOutcome) -> io::Result<()> {
    match outcome {
        ReviewOutcome::EmptyReview => {
            writeln!(out, "Please enter a review to analyze.")?;
        }
        ReviewOutcome::Analyzed {
            sentiment,
            entities,
        } => {
            writeln!(out)?;
            writeln!(out, "Sentiment Analysis with Word-Level Contributions:")?;
            writeln!(out, "{}", sentiment.narrative)?;
            writeln!(out, "Overall Sentiment: {}", sentiment.overall)?;
            writeln!(
                out,
                "Overall Sentiment Percentage: {}%",
                sentiment.percentage
            )?;
            writeln!(out)?;
            match entities {
                Err(message) => {
                    writeln!(out, "{message}")?;
                }
                Ok(entities) => {
                    writeln!(out, "Named Entities:")?;
                    if entities.is_empty() {
                        writeln!(out, "No named entities found.")?;
                    } else {
                        for entity in entities {
                            writeln!(out, "{} ({})", entity.text, entity.label)?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// Interactive loop: Idle -> (submit) -> Analyzing -> Rendered -> Idle.
/// Exits on `quit` or end of input.
pub async fn run<C, T>(analyzer: &SentimentAnalyzer<C>, tagger: &T) -> io::Result<()>
where
    C: ChatApi,
    T: EntityTagger,
{
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    writeln!(out, "Sentiment Analyzer")?;
    writeln!(
        out,
        "Enter a review and select its category to analyze sentiment and extract named entities."
    )?;

    loop {
        writeln!(out)?;
        writeln!(out, "Select the review category:")?;
        for (i, category) in ReviewCategory::ALL.iter().enumerate() {
            writeln!(out, "  [{}] {}", i + 1, category)?;
        }
        write!(out, "Category (or 'quit'): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let selection = line.trim();
        if selection.eq_ignore_ascii_case("quit") || selection.eq_ignore_ascii_case("q") {
            break;
        }
        let Some(category) = ReviewCategory::parse(selection) else {
            writeln!(out, "Unrecognized category '{selection}'.")?;
            continue;
        };

        writeln!(out, "Enter the review content (finish with an empty line):")?;
        let mut lines = Vec::new();
        loop {
            let mut review_line = String::new();
            if input.read_line(&mut review_line)? == 0 {
                break;
            }
            let review_line = review_line.trim_end_matches(['\r', '\n']);
            if review_line.is_empty() {
                break;
            }
            lines.push(review_line.to_string());
        }

        let request = ReviewRequest {
            text: lines.join("\n"),
            category,
        };

        if !request.text.is_empty() {
            writeln!(out, "Analyzing...")?;
        }
        let outcome = run_review(analyzer, tagger, &request).await;
        render(&mut out, &outcome)?;
    }

    Ok(())
}
