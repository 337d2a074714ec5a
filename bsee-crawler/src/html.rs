use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("static selector"));

/// Collects every anchor target of the document as an absolute URL.
/// Relative hrefs resolve against the page URL, same-document
/// fragment links are dropped, and fragments are stripped from the
/// rest so `/a` and `/a#b` dedupe to one frontier entry.
pub(crate) fn extract_links(body: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(body);
    document
        .select(&ANCHOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| !href.starts_with('#'))
        .filter_map(|href| page_url.join(href).ok())
        .map(|mut link| {
            link.set_fragment(None);
            link
        })
        .collect()
}

/// Returns the document title (if any) and the full visible text,
/// both whitespace-collapsed.
pub(crate) fn extract_text(body: &str) -> (Option<String>, String) {
    let document = Html::parse_document(body);
    let title = document
        .select(&TITLE)
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty());
    let text = collapse_whitespace(&document.root_element().text().collect::<Vec<_>>().join(" "));
    (title, text)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
