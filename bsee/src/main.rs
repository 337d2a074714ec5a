use anyhow::Result;
use bsee::search_service::SearchService;
use bsee::web;
use bsee_crawler::Crawler;
use tracing::info;

const DEFAULT_START_URL: &str = "https://vm009.rz.uos.de/crawl/index.html";
const DEFAULT_MAX_PAGES: usize = 500;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let start_url =
        std::env::var("BSEE_START_URL").unwrap_or_else(|_| DEFAULT_START_URL.to_string());
    let max_pages = std::env::var("BSEE_MAX_PAGES")
        .ok()
        .and_then(|pages| pages.parse().ok())
        .unwrap_or(DEFAULT_MAX_PAGES);

    info!("crawling {start_url} (max {max_pages} pages)");
    let mut crawler = Crawler::new(&start_url, max_pages)?;
    let pages = crawler.crawl().await;

    let search = SearchService::new(&pages)?;
    web::start_web(search).await?;
    Ok(())
}
