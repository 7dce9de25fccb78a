use scraper::{ElementRef, Html, Selector};

/// A rendered view of the problem page at one point in time. The document is
/// kept as text and parsed on demand; `scraper::Html` is not `Send`, so it
/// must not be held across awaits in the engine.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    pub html: String,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, title: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            html: html.into(),
        }
    }

    pub fn problem_id(&self) -> Option<String> {
        problem_id_from_url(&self.url)
    }

    /// Display name of the problem: the document title up to the site suffix.
    pub fn problem_title(&self) -> String {
        self.title
            .split(" - ")
            .next()
            .unwrap_or(&self.title)
            .trim()
            .to_string()
    }

    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// The stable identifier is the path segment after `/problems/`.
pub fn problem_id_from_url(url: &str) -> Option<String> {
    let rest = url.split("/problems/").nth(1)?;
    let id = rest.split('/').next().unwrap_or(rest);
    let id = id.split(['?', '#']).next().unwrap_or(id);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

pub fn text_of_element(ele: ElementRef) -> String {
    ele.text()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First element matching `selector`, as joined text.
pub fn text_of_first(doc: &Html, selector: &str) -> Option<String> {
    let s = Selector::parse(selector).ok()?;
    doc.select(&s).next().map(text_of_element)
}

/// First element whose own text contains `needle`.
pub fn find_text_containing(doc: &Html, needle: &str) -> Option<String> {
    let any = Selector::parse("*").unwrap();
    doc.select(&any)
        .map(text_of_element)
        .find(|t| t.contains(needle))
}
