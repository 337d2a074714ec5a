use crate::api;
use crate::components::search_box::SearchBox;
use bsee_api_types::search::SearchResult;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;

/// Shortens a result URL into the `scheme://host > seg > seg` line
/// shown under each result title.
pub(crate) fn breadcrumb(url: &str) -> String {
    let mut parts = url.split('/');
    let head: Vec<&str> = parts.by_ref().take(3).collect();
    let mut segments = vec![head.join("/")];
    segments.extend(parts.filter(|s| !s.is_empty()).map(str::to_owned));
    segments.join(" > ")
}

/// Background shade for one result. BM25 scores are unbounded, so
/// the shade is scaled against the best hit of the result set;
/// brighter green means a better relative match.
pub(crate) fn score_shade(score: f32, best: f32) -> String {
    let relative = if best > 0.0 {
        (score / best).clamp(0.0, 1.0)
    } else {
        0.0
    };
    format!("rgb(26,{},26)", 26 + (relative * 26.0).round() as u8)
}

#[component]
pub fn SearchResults() -> impl IntoView {
    let query_map = use_query_map();
    let query = move || query_map.with(|map| map.get("q").unwrap_or_default());
    let (results, set_results) = signal(None::<Vec<SearchResult>>);

    Effect::new(move |_| {
        let q = query();
        spawn_local(async move {
            match api::search(&q).await {
                Ok(hits) => set_results.set(Some(hits)),
                Err(e) => log::error!("search failed: {e}"),
            }
        });
    });

    view! {
        <div id="content">
            <header>
                <a id="logo" href="/">
                    <h1>"Best Search Engine Ever"</h1>
                </a>
                <SearchBox initial=query()/>
                <div id="result-ranking-info">
                    <p>"What do the different shades of green mean?"</p>
                    <p class="hidden">
                        "The different shades of green indicate how well the result \
                         matches your search query in relation to the other results. \
                         A brighter shade of green means a better match regarding the \
                         BM25 score."
                    </p>
                </div>
            </header>
            <div id="results">
                <p>"Your results for the search: \"" {query} "\" are:"</p>
                <ul>
                    {move || match results.get() {
                        None => view! { <li class="loading">"Searching..."</li> }.into_any(),
                        Some(hits) if hits.is_empty() => {
                            view! { <li>"Oops such emptiness. Try a different search!"</li> }
                                .into_any()
                        }
                        Some(hits) => {
                            let best = hits.first().map(|hit| hit.score).unwrap_or_default();
                            hits.into_iter()
                                .map(|hit| {
                                    view! {
                                        <li style:background-color=score_shade(hit.score, best)>
                                            <a class="result-link" href=hit.url.clone()>
                                                <h2>{hit.title}</h2>
                                                <cite>{breadcrumb(&hit.url)}</cite>
                                            </a>
                                            <p inner_html=hit.highlights></p>
                                        </li>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }
                    }}
                </ul>
            </div>
        </div>
    }
}
