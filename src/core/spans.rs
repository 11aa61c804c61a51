//! BIO tag aggregation for the entity extraction stage.
//!
//! Token-classification models emit one tag per subword token ("O", "B-ORG",
//! "I-ORG", ...). This module merges tagged tokens back into entity spans
//! over the original text, in order of appearance.

use crate::models::EntityMatch;

/// One classified token: byte offsets into the original text plus the raw
/// BIO tag predicted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTag {
    pub start: usize,
    pub end: usize,
    pub tag: String,
}

impl TokenTag {
    pub fn new(start: usize, end: usize, tag: &str) -> Self {
        Self {
            start,
            end,
            tag: tag.to_string(),
        }
    }
}

/// Strip the BIO prefix from a tag, returning (is_continuation, kind).
/// Tags without a recognised prefix are treated as span starts of their own
/// kind, which keeps models that emit bare labels usable.
fn split_tag(tag: &str) -> (bool, &str) {
    if let Some(kind) = tag.strip_prefix("B-") {
        (false, kind)
    } else if let Some(kind) = tag.strip_prefix("I-") {
        (true, kind)
    } else {
        (false, tag)
    }
}

/// Merge per-token tags into entity matches.
///
/// Consecutive tokens of the same kind (a "B-" start followed by "I-"
/// continuations, or adjacent subword pieces of one word) collapse into a
/// single span; the surface text is sliced from `text` using the merged byte
/// range. Tokens tagged "O" and tokens whose offsets do not fall on char
/// boundaries are skipped.
pub fn merge_token_tags(text: &str, tokens: &[TokenTag]) -> Vec<EntityMatch> {
    let mut entities = Vec::new();
    let mut current: Option<(usize, usize, String)> = None;

    for token in tokens {
        if token.tag == "O" || token.start >= token.end {
            flush(text, &mut current, &mut entities);
            continue;
        }

        let (continuation, kind) = split_tag(&token.tag);

        let extended = match current.as_mut() {
            Some((_, end, open_kind)) if continuation && open_kind.as_str() == kind => {
                *end = token.end;
                true
            }
            _ => false,
        };

        if !extended {
            flush(text, &mut current, &mut entities);
            current = Some((token.start, token.end, kind.to_string()));
        }
    }

    flush(text, &mut current, &mut entities);
    entities
}

fn flush(text: &str, current: &mut Option<(usize, usize, String)>, out: &mut Vec<EntityMatch>) {
    if let Some((start, end, kind)) = current.take() {
        if let Some(surface) = text.get(start..end) {
            out.push(EntityMatch {
                text: surface.to_string(),
                label: kind,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_single_token_entities() {
        let text = "Apple released a new phone in Paris.";
        let tokens = vec![
            TokenTag::new(0, 5, "B-ORG"),
            TokenTag::new(6, 14, "O"),
            TokenTag::new(30, 35, "B-LOC"),
        ];

        let entities = merge_token_tags(text, &tokens);

        assert_eq!(
            entities,
            vec![
                EntityMatch {
                    text: "Apple".to_string(),
                    label: "ORG".to_string()
                },
                EntityMatch {
                    text: "Paris".to_string(),
                    label: "LOC".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_merge_continuation_tokens() {
        let text = "I flew with British Airways yesterday.";
        let tokens = vec![
            TokenTag::new(12, 19, "B-ORG"),
            TokenTag::new(20, 27, "I-ORG"),
        ];

        let entities = merge_token_tags(text, &tokens);

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "British Airways");
        assert_eq!(entities[0].label, "ORG");
    }

    #[test]
    fn test_subword_pieces_merge_into_one_surface() {
        // "Redmond" split into "Red" + "##mond" by the tokenizer.
        let text = "Visit Redmond soon.";
        let tokens = vec![
            TokenTag::new(6, 9, "B-LOC"),
            TokenTag::new(9, 13, "I-LOC"),
        ];

        let entities = merge_token_tags(text, &tokens);

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Redmond");
    }

    #[test]
    fn test_kind_change_closes_span() {
        let text = "Paris Hilton";
        let tokens = vec![
            TokenTag::new(0, 5, "B-LOC"),
            TokenTag::new(6, 12, "I-PER"),
        ];

        let entities = merge_token_tags(text, &tokens);

        // An I- tag of a different kind starts its own span.
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].label, "LOC");
        assert_eq!(entities[1].label, "PER");
    }

    #[test]
    fn test_no_entities() {
        let text = "nothing to see";
        let tokens = vec![TokenTag::new(0, 7, "O"), TokenTag::new(8, 14, "O")];
        assert!(merge_token_tags(text, &tokens).is_empty());
    }

    #[test]
    fn test_left_to_right_order_preserved() {
        let text = "Apple met Google in Paris";
        let tokens = vec![
            TokenTag::new(0, 5, "B-ORG"),
            TokenTag::new(10, 16, "B-ORG"),
            TokenTag::new(20, 25, "B-LOC"),
        ];

        let surfaces: Vec<String> = merge_token_tags(text, &tokens)
            .into_iter()
            .map(|e| e.text)
            .collect();

        assert_eq!(surfaces, vec!["Apple", "Google", "Paris"]);
    }

    #[test]
    fn test_invalid_offsets_are_skipped() {
        // Offset past a multi-byte char boundary must not panic.
        let text = "café Apple";
        let tokens = vec![
            TokenTag::new(0, 4, "B-MISC"), // splits 'é'
            TokenTag::new(6, 11, "B-ORG"),
        ];

        let entities = merge_token_tags(text, &tokens);

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Apple");
    }
}
