use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bsee::search_service::SearchService;
use bsee::web::api_router;
use bsee_api_types::search::SearchResult;
use bsee_crawler::CrawledPage;
use http_body_util::BodyExt;
use tower::ServiceExt;
use url::Url;

fn page(path: &str, title: &str, text: &str) -> CrawledPage {
    CrawledPage {
        url: Url::parse(&format!("https://crawl.example.org{path}")).unwrap(),
        title: title.to_string(),
        text: text.to_string(),
    }
}

fn router() -> Router {
    let pages = vec![
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
    ];
    let search = SearchService::new(&pages).unwrap();
    api_router::<SearchService>().with_state(search)
}

async fn get_json<T>(router: Router, uri: &str) -> (StatusCode, T)
where
    T: serde::de::DeserializeOwned,
{
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn suggestions_complete_the_typed_prefix() {
    let (status, suggestions) =
        get_json::<Vec<String>>(router(), "/search-suggestions?q=plat").await;
    assert_eq!(status, StatusCode::OK);
    assert!(suggestions.contains(&"platypus".to_string()));
}

#[tokio::test]
async fn empty_query_yields_an_empty_suggestion_list() {
    let (status, suggestions) = get_json::<Vec<String>>(router(), "/search-suggestions?q=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn missing_query_parameter_defaults_to_empty() {
    let (status, suggestions) = get_json::<Vec<String>>(router(), "/search-suggestions").await;
    assert_eq!(status, StatusCode::OK);
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn percent_encoded_spaces_reach_the_suggester() {
    let (status, suggestions) =
        get_json::<Vec<String>>(router(), "/search-suggestions?q=australia%20mam").await;
    assert_eq!(status, StatusCode::OK);
    assert!(suggestions.contains(&"australia mammal".to_string()));
}

#[tokio::test]
async fn non_ascii_whitespace_in_the_query_is_handled() {
    // %C2%A0 is a no-break space
    let (status, suggestions) =
        get_json::<Vec<String>>(router(), "/search-suggestions?q=a%C2%A0plat").await;
    assert_eq!(status, StatusCode::OK);
    assert!(suggestions.contains(&"a\u{a0}platypus".to_string()));
}

#[tokio::test]
async fn search_returns_scored_results_in_order() {
    let (status, results) =
        get_json::<Vec<SearchResult>>(router(), "/api/v1/search?q=platypus").await;
    assert_eq!(status, StatusCode::OK);
    assert!(results.len() >= 2);
    assert_eq!(results[0].url, "https://crawl.example.org/platypus.html");
    assert!(
        results
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score)
    );
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
