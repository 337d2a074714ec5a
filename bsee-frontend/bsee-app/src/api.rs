use crate::error::{AppError, AppResult};
use bsee_api_types::search::SearchResult;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

/// Percent-encodes a query string for use as a `q` parameter.
pub fn encode_query(query: &str) -> String {
    utf8_percent_encode(query, NON_ALPHANUMERIC).to_string()
}

pub fn suggestions_path(query: &str) -> String {
    format!("/search-suggestions?q={}", encode_query(query))
}

pub fn search_path(query: &str) -> String {
    format!("/api/v1/search?q={}", encode_query(query))
}

pub(crate) async fn fetch_suggestions(query: &str) -> AppResult<Vec<String>> {
    fetch_api(&suggestions_path(query)).await
}

pub(crate) async fn search(query: &str) -> AppResult<Vec<SearchResult>> {
    fetch_api(&search_path(query)).await
}

/// Relative paths resolve against the page's own origin.
#[cfg(not(feature = "ssr"))]
async fn fetch_api<T>(path: &str) -> AppResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let response = gloo_net::http::Request::get(path).send().await?;
    if !response.ok() {
        return Err(AppError::Status(response.status()));
    }
    Ok(response.json().await?)
}

/// During server rendering the app talks to its own HTTP listener.
#[cfg(feature = "ssr")]
async fn fetch_api<T>(path: &str) -> AppResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);
    let response = reqwest::get(format!("http://localhost:{port}{path}")).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Status(status.as_u16()));
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod test {
    use super::*;
    use percent_encoding::percent_decode_str;

    #[test]
    fn query_round_trips_through_encoding() {
        for query in ["", "cats", "a b", "füchse & igel", "50%+?"] {
            let encoded = encode_query(query);
            let decoded = percent_decode_str(&encoded).decode_utf8().unwrap();
            assert_eq!(decoded, query);
        }
    }

    #[test]
    fn empty_query_still_sends_the_parameter() {
        assert_eq!(suggestions_path(""), "/search-suggestions?q=");
    }

    #[test]
    fn spaces_are_percent_encoded() {
        assert_eq!(suggestions_path("a b"), "/search-suggestions?q=a%20b");
        assert_eq!(search_path("a b"), "/api/v1/search?q=a%20b");
    }
}
