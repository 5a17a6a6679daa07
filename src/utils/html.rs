//! Helpers for reading text out of parsed HTML.

use scraper::{ElementRef, Selector};

use crate::error::{AppError, Result};

/// Parse a CSS selector, reporting the offending string on failure.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Text content of `element`, skipping every subtree matched by `strip`.
pub fn text_without(element: ElementRef<'_>, strip: Option<&Selector>) -> String {
    let mut out = String::new();
    collect_text(element, strip, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, strip: Option<&Selector>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(&text.text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if strip.is_some_and(|s| s.matches(&child_element)) {
                continue;
            }
            collect_text(child_element, strip, out);
        }
    }
}

/// Text of the first descendant matching `selector`, if any.
pub fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
}
