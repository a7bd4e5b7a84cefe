//! Pulls the card array out of a raw model response.
//!
//! Models are asked for a fenced JSON array but do not always comply, so the
//! array is located through a fallback chain: fenced block, then the outermost
//! brackets, then (only if there are no brackets at all) the outermost braces.

use crate::card::Card;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

static FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fence pattern is valid")
});

/// Failure to turn a response into cards.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Could not find a valid JSON block in the response")]
    NoJsonBlock,

    #[error("Failed to parse the JSON in the response: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("The response JSON is not an array of cards")]
    UnexpectedShape,

    #[error("The response contained no usable cards")]
    Empty,
}

/// Locate the JSON-bearing substring of `raw`, if any.
pub fn isolate_json(raw: &str) -> Option<&str> {
    if let Some(inner) = FENCE.captures(raw).and_then(|c| c.get(1)) {
        let inner = inner.as_str().trim();
        if !inner.is_empty() {
            return Some(inner);
        }
    }

    if let Some(first) = raw.find('[') {
        return match raw.rfind(']') {
            Some(last) if last > first => Some(&raw[first..=last]),
            _ => None,
        };
    }

    let first = raw.find('{')?;
    let last = raw.rfind('}')?;
    (last > first).then(|| &raw[first..=last])
}

/// Parse the cards embedded in a model response.
///
/// Elements that are not recognisable cards are skipped with a warning; the
/// batch only fails if no JSON array can be found or parsed.
pub fn extract_cards(raw: &str) -> Result<Vec<Card>, ExtractionError> {
    let json = isolate_json(raw).ok_or(ExtractionError::NoJsonBlock)?;
    debug!(bytes = json.len(), "isolated JSON block");

    let value: serde_json::Value = serde_json::from_str(json).map_err(ExtractionError::Malformed)?;
    let serde_json::Value::Array(items) = value else {
        return Err(ExtractionError::UnexpectedShape);
    };

    let total = items.len();
    let cards: Vec<Card> = items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| {
            let tag = item
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or("<missing>")
                .to_string();
            match serde_json::from_value::<Card>(item) {
                Ok(card) => Some(card),
                Err(e) => {
                    warn!(position, tag = %tag, error = %e, "skipping unreadable card");
                    None
                }
            }
        })
        .collect();

    if cards.len() < total {
        debug!(kept = cards.len(), total, "some cards were skipped");
    }
    Ok(cards)
}
