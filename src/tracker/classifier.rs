use super::definition::Outcome;
use super::snapshot::{text_of_element, PageSnapshot};
use crate::global::{marker, page_selector};
use scraper::{Html, Selector};

/// A DOM match the engine may turn into a submission record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub outcome: Outcome,
    /// Text of the matched result element, kept for logging.
    pub text: String,
}

/// Decide whether the snapshot shows a freshly graded result.
///
/// Pure over the snapshot: search in priority order for a dedicated result
/// element, a dedicated status element, a generic success style marker, and
/// finally any element whose text mentions a verdict. Elements echoing a
/// previous verdict ("Last Accepted ...") are never a match.
pub fn classify(snapshot: &PageSnapshot) -> Option<Classification> {
    let doc = snapshot.document();

    let selectors = page_selector::RESULT_CONTAINERS
        .into_iter()
        .chain([page_selector::SUCCESS_CLASS]);
    for selector in selectors {
        if let Some(c) = match_selector(&doc, selector) {
            return Some(c);
        }
    }
    match_verdict_text(&doc)
}

fn match_selector(doc: &Html, selector: &str) -> Option<Classification> {
    let s = Selector::parse(selector).unwrap();
    for ele in doc.select(&s) {
        let text = text_of_element(ele);
        if text.is_empty() || is_stale(&text) {
            continue;
        }
        return Some(from_text(text));
    }
    None
}

fn match_verdict_text(doc: &Html) -> Option<Classification> {
    let any = Selector::parse("*").unwrap();
    for ele in doc.select(&any) {
        let text = text_of_element(ele);
        if is_stale(&text) {
            continue;
        }
        if text.contains(marker::SUCCESS) || text.contains(marker::ACCEPTED) {
            return Some(from_text(text));
        }
    }
    None
}

fn is_stale(text: &str) -> bool {
    text.contains(marker::STALE_RESULT)
}

fn from_text(text: String) -> Classification {
    let outcome = if text.contains(marker::ACCEPTED) {
        Outcome::Accepted
    } else {
        Outcome::Failed
    };
    Classification { outcome, text }
}
