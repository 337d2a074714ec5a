use bsee_api_types::search::SearchResult;
use bsee_crawler::CrawledPage;
use std::collections::BTreeSet;
use std::sync::Arc;
use sublime_fuzzy::{FuzzySearch, Scoring};
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Query, QueryParser};
use tantivy::schema::{STORED, Schema, TextOptions, Value};
use tantivy::snippet::SnippetGenerator;
use tantivy::{Index, IndexReader, ReloadPolicy, TantivyDocument, doc};
use tracing::{error, info, warn};

const RESULT_LIMIT: usize = 10;
const SUGGESTION_LIMIT: usize = 10;

/// Full-text index over the crawled pages, built once at startup and
/// held in RAM. Queries never fail outward: anything wrong with a
/// query or the searcher is logged and reported as "no results".
#[derive(Clone)]
pub struct SearchService {
    index: Arc<Index>,
    reader: IndexReader,
    /// Sorted vocabulary of the indexed text, for suggestions.
    terms: Arc<BTreeSet<String>>,
    title_field: tantivy::schema::Field,
    content_field: tantivy::schema::Field,
    url_field: tantivy::schema::Field,
}

impl SearchService {
    pub fn new(pages: &[CrawledPage]) -> anyhow::Result<Self> {
        let mut schema_builder = Schema::builder();

        let text_options = TextOptions::default()
            .set_indexing_options(
                tantivy::schema::TextFieldIndexing::default()
                    .set_tokenizer("en_stem")
                    .set_index_option(tantivy::schema::IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();

        let title_field = schema_builder.add_text_field("title", text_options.clone());
        let content_field = schema_builder.add_text_field("content", text_options);
        let url_field = schema_builder.add_text_field("url", STORED);
        let schema = schema_builder.build();

        let index = Index::create_in_ram(schema);
        let mut index_writer = index.writer(50_000_000)?;

        let mut terms = BTreeSet::new();
        for page in pages {
            index_writer.add_document(doc!(
                title_field => page.title.as_str(),
                content_field => page.text.as_str(),
                url_field => page.url.as_str(),
            ))?;
            collect_terms(&mut terms, &page.title);
            collect_terms(&mut terms, &page.text);
        }
        index_writer.commit()?;
        info!(
            "indexed {} pages, {} distinct terms",
            pages.len(),
            terms.len()
        );

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            index: Arc::new(index),
            reader,
            terms: Arc::new(terms),
            title_field,
            content_field,
            url_field,
        })
    }

    pub fn search(&self, query_str: &str) -> Vec<SearchResult> {
        if query_str.trim().is_empty() {
            return vec![];
        }
        let searcher = self.reader.searcher();

        // Exact match parser (high boost, title over content)
        let mut exact_parser =
            QueryParser::for_index(&self.index, vec![self.title_field, self.content_field]);
        exact_parser.set_field_boost(self.title_field, 5.0);
        exact_parser.set_field_boost(self.content_field, 1.0);

        // Fuzzy match parser (low boost) to still catch typos
        let mut fuzzy_parser =
            QueryParser::for_index(&self.index, vec![self.title_field, self.content_field]);
        fuzzy_parser.set_field_boost(self.title_field, 0.5);
        fuzzy_parser.set_field_boost(self.content_field, 0.1);
        fuzzy_parser.set_field_fuzzy(self.title_field, false, 2, true);
        fuzzy_parser.set_field_fuzzy(self.content_field, false, 1, true);

        let exact_query = exact_parser.parse_query(query_str);
        let fuzzy_query = fuzzy_parser.parse_query(query_str);

        let query = match (exact_query, fuzzy_query) {
            (Ok(eq), Ok(fq)) => Box::new(BooleanQuery::union(vec![eq, fq])) as Box<dyn Query>,
            (Ok(eq), Err(_)) => eq,
            (Err(_), Ok(fq)) => fq,
            (Err(e), Err(_)) => {
                warn!("invalid query '{query_str}': {e}");
                return vec![];
            }
        };

        let top_docs = match searcher.search(&query, &TopDocs::with_limit(RESULT_LIMIT)) {
            Ok(docs) => docs,
            Err(e) => {
                error!("search execution failed: {e}");
                return vec![];
            }
        };

        let snippet_generator =
            SnippetGenerator::create(&searcher, &*query, self.content_field).ok();

        top_docs
            .into_iter()
            .filter_map(|(score, doc_address)| {
                let retrieved: TantivyDocument = searcher.doc(doc_address).ok()?;
                let title = retrieved
                    .get_first(self.title_field)
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                let url = retrieved
                    .get_first(self.url_field)
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                let highlights = snippet_generator
                    .as_ref()
                    .map(|generator| generator.snippet_from_doc(&retrieved).to_html())
                    .unwrap_or_default();
                Some(SearchResult {
                    score,
                    title,
                    url,
                    highlights,
                })
            })
            .collect()
    }

    /// Completes the last token of the query against the indexed
    /// vocabulary and splices each completion back into the query, so
    /// a suggestion is the full query the user would have typed.
    pub fn suggest(&self, query_str: &str) -> Vec<String> {
        let (stem, token) = match query_str
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
        {
            // split after the whitespace char, which may be multi-byte
            Some((pos, ws)) => query_str.split_at(pos + ws.len_utf8()),
            None => ("", query_str),
        };
        let token = token.to_lowercase();
        if token.is_empty() {
            return vec![];
        }

        let scoring = Scoring::default();
        let mut candidates: Vec<(isize, &str)> = self
            .terms
            .range(token.clone()..)
            .take_while(|term| term.starts_with(&token))
            .filter(|term| term.as_str() != token.as_str())
            .map(|term| {
                let score = FuzzySearch::new(&token, term)
                    .case_insensitive()
                    .score_with(&scoring)
                    .best_match()
                    .map(|m| m.score())
                    .unwrap_or_default();
                (score, term.as_str())
            })
            .collect();
        candidates.sort_by(|(score_a, term_a), (score_b, term_b)| {
            score_b
                .cmp(score_a)
                .then(term_a.len().cmp(&term_b.len()))
                .then(term_a.cmp(term_b))
        });

        candidates
            .into_iter()
            .take(SUGGESTION_LIMIT)
            .map(|(_, term)| format!("{stem}{term}"))
            .collect()
    }
}

fn collect_terms(terms: &mut BTreeSet<String>, text: &str) {
    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if word.chars().count() >= 3 {
            terms.insert(word.to_lowercase());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use url::Url;

    fn page(path: &str, title: &str, text: &str) -> CrawledPage {
        CrawledPage {
            url: Url::parse(&format!("https://crawl.example.org{path}")).unwrap(),
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    fn service() -> SearchService {
        SearchService::new(&[
            page(
                "/platypus.html",
                "Platypus",
                "The platypus is a semiaquatic egg-laying mammal found in Australia.",
            ),
            page(
                "/mammals.html",
                "Mammals of Australia",
                "Australia hosts many mammals, among them the platypus and several marsupials.",
            ),
            page(
                "/volcanoes.html",
                "Volcanoes",
                "Magma chambers and eruptions, nothing cuddly on this page.",
            ),
        ])
        .unwrap()
    }

    #[test]
    fn title_match_outranks_content_match() {
        let results = service().search("platypus");
        assert!(results.len() >= 2);
        assert_eq!(results[0].url, "https://crawl.example.org/platypus.html");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn blank_query_returns_nothing() {
        assert!(service().search("").is_empty());
        assert!(service().search("   ").is_empty());
    }

    #[test]
    fn unmatched_query_returns_empty_list() {
        assert!(service().search("zzzzqqqq").is_empty());
    }

    #[test]
    fn snippet_highlights_the_match() {
        let results = service().search("eruptions");
        assert_eq!(results.len(), 1);
        assert!(results[0].highlights.contains("<b>eruptions</b>"));
    }

    #[test]
    fn suggest_completes_the_last_token() {
        let suggestions = service().suggest("plat");
        assert!(suggestions.contains(&"platypus".to_string()));
        let spliced = service().suggest("australia mam");
        assert!(spliced.contains(&"australia mammal".to_string()));
    }

    #[test]
    fn suggest_splits_on_multibyte_whitespace() {
        // no-break space before the token under completion
        let suggestions = service().suggest("a\u{a0}plat");
        assert!(suggestions.contains(&"a\u{a0}platypus".to_string()));
        // and an ideographic space, three bytes wide
        assert!(!service().suggest("magma\u{3000}erup").is_empty());
    }

    #[test]
    fn suggest_on_blank_or_trailing_space_is_empty() {
        assert!(service().suggest("").is_empty());
        assert!(service().suggest("platypus ").is_empty());
    }

    #[test]
    fn suggest_skips_exact_tokens_and_unknown_prefixes() {
        assert!(!service().suggest("platypus").iter().any(|s| s == "platypus"));
        assert!(service().suggest("zzz").is_empty());
    }
}
