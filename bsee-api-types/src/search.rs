use serde::{Deserialize, Serialize};

/// One hit from the search index, shaped for the results page.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct SearchResult {
    /// BM25 score relative to the other hits of the same query.
    pub score: f32,
    pub title: String,
    pub url: String,
    /// Snippet of the page body with `<b>`-wrapped matches. The
    /// surrounding text is HTML-escaped by the snippet generator.
    pub highlights: String,
}
