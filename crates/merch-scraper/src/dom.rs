//! Small helpers over the `scraper` DOM.

use scraper::{ElementRef, Selector};

use crate::error::ScraperError;

pub(crate) fn compile_selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::Selector {
        selector: css.to_owned(),
        reason: e.to_string(),
    })
}

/// Trimmed text content of the first match of `selector` under `scope`, or
/// `None` when nothing matches or the text is blank.
pub(crate) fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let text: String = scope.select(selector).next()?.text().collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}
