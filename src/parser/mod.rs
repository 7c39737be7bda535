pub mod listing;
pub mod recipe;
pub mod search;

use scraper::ElementRef;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("element not found: {0}")]
    MissingElement(&'static str),

    #[error("no application/ld+json block")]
    NoStructuredData,

    #[error("invalid structured recipe data: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Concatenated, trimmed text content of an element.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
