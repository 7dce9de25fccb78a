use super::snapshot::{find_text_containing, text_of_first, PageSnapshot};
use crate::global::{marker, page_selector, sentinel};
use once_cell::sync::OnceCell;
use regex::Regex;

fn runtime_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)\s*(ms|s)\b").unwrap())
}

fn memory_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)\s*[Mm][Bb]").unwrap())
}

/// Elapsed runtime shown next to the verdict, or "N/A". Never fails: result
/// stats render asynchronously and are often simply absent.
pub fn extract_runtime(snapshot: &PageSnapshot) -> String {
    let doc = snapshot.document();
    let text = find_text_containing(&doc, marker::RUNTIME)
        .or_else(|| find_text_containing(&doc, marker::RUNTIME_ALT));
    match text.as_deref().and_then(|t| runtime_re().captures(t)) {
        Some(cap) => format!("{} {}", &cap[1], &cap[2]),
        None => sentinel::NOT_AVAILABLE.into(),
    }
}

/// Peak memory shown next to the verdict, or "N/A".
pub fn extract_memory(snapshot: &PageSnapshot) -> String {
    let doc = snapshot.document();
    let text = find_text_containing(&doc, marker::MEMORY);
    match text.as_deref().and_then(|t| memory_re().captures(t)) {
        Some(cap) => format!("{} MB", &cap[1]),
        None => sentinel::NOT_AVAILABLE.into(),
    }
}

/// Text of the editor's language selector, or "Unknown".
pub fn extract_language(snapshot: &PageSnapshot) -> String {
    let doc = snapshot.document();
    match text_of_first(&doc, page_selector::LANGUAGE_SELECT) {
        Some(t) if !t.is_empty() => t,
        _ => sentinel::UNKNOWN_LANGUAGE.into(),
    }
}

/// Easy/Medium/Hard label, falling back to "Medium" when the page does not
/// carry one.
pub fn extract_difficulty(snapshot: &PageSnapshot) -> String {
    let doc = snapshot.document();
    if let Some(t) = text_of_first(&doc, page_selector::DIFFICULTY) {
        for label in ["Easy", "Medium", "Hard"] {
            if t.contains(label) {
                return label.into();
            }
        }
    }
    sentinel::DEFAULT_DIFFICULTY.into()
}
