use super::*;
use book_price_watcher::{
    AppError,
    config::ScraperConfig,
    models::FetchFailurePolicy,
    scraper::HttpPageFetcher,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn serve_page(server: &MockServer, page_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(response)
        .mount(server)
        .await;
}

fn http_fetcher() -> HttpPageFetcher {
    HttpPageFetcher::new(&ScraperConfig::default()).unwrap()
}

#[tokio::test]
async fn test_end_to_end_single_match_over_http() {
    let server = MockServer::start().await;
    serve_page(
        &server,
        "/catalogue/a",
        ResponseTemplate::new(200).set_body_string(product_page("Book A", "£7.50", "In stock (3 available)")),
    )
    .await;

    let source = json_file(r#"[{"slug": "a", "asking_price": 10}]"#);
    let watchlist = Watchlist::from_sources(&[source.path()]).unwrap();
    let notifier = RecordingNotifier::default();

    let checker = PriceChecker::new(
        watchlist,
        Box::new(http_fetcher()),
        Box::new(notifier.clone()),
        CheckerOptions::new(format!("{}/catalogue/", server.uri())),
    );

    let report = checker.check().await.unwrap();
    assert_eq!(report.matches_found, 1);

    let batches = notifier.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);

    let found = &batches[0][0];
    assert_eq!(found.title, "Book A");
    assert_eq!(found.price, dec("7.50"));
    assert_eq!(found.difference(), dec("2.50"));
    assert_eq!(found.url, format!("{}/catalogue/a", server.uri()));
}

#[tokio::test]
async fn test_every_cycle_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalogue/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page("Book A", "£20.00", "In stock")))
        .expect(2)
        .mount(&server)
        .await;

    let checker = create_checker(
        vec![WatchEntry::new("a", dec("10"))],
        http_fetcher(),
        RecordingNotifier::default(),
        CheckerOptions::new(format!("{}/catalogue/", server.uri())),
    );

    checker.check().await.unwrap();
    checker.check().await.unwrap();
    // MockServer verifies the expected request count on drop.
}

#[tokio::test]
async fn test_http_error_status_aborts_cycle() {
    let server = MockServer::start().await;
    serve_page(&server, "/catalogue/gone", ResponseTemplate::new(404)).await;

    let notifier = RecordingNotifier::default();
    let checker = create_checker(
        vec![WatchEntry::new("gone", dec("10"))],
        http_fetcher(),
        notifier.clone(),
        CheckerOptions::new(format!("{}/catalogue/", server.uri())),
    );

    let result = checker.check().await;
    assert!(matches!(result, Err(AppError::Fetch(FetchError::Network(_)))));
    assert!(notifier.batches().is_empty());
}

#[tokio::test]
async fn test_unparseable_page_is_parse_error() {
    let server = MockServer::start().await;
    serve_page(
        &server,
        "/catalogue/odd",
        ResponseTemplate::new(200).set_body_string(product_page("Odd Book", "£call us", "In stock")),
    )
    .await;

    let checker = create_checker(
        vec![WatchEntry::new("odd", dec("10"))],
        http_fetcher(),
        RecordingNotifier::default(),
        CheckerOptions::new(format!("{}/catalogue/", server.uri())),
    );

    let result = checker.check().await;
    assert!(matches!(result, Err(AppError::Fetch(FetchError::Parse(_)))));
}

#[tokio::test]
async fn test_skip_policy_over_http() {
    let server = MockServer::start().await;
    serve_page(&server, "/catalogue/broken", ResponseTemplate::new(500)).await;
    serve_page(
        &server,
        "/catalogue/ok",
        ResponseTemplate::new(200).set_body_string(product_page("Fine Book", "£4.00", "In stock")),
    )
    .await;

    let notifier = RecordingNotifier::default();
    let mut options = CheckerOptions::new(format!("{}/catalogue/", server.uri()));
    options.on_fetch_error = FetchFailurePolicy::Skip;

    let checker = create_checker(
        vec![WatchEntry::new("broken", dec("10")), WatchEntry::new("ok", dec("5"))],
        http_fetcher(),
        notifier.clone(),
        options,
    );

    let report = checker.check().await.unwrap();
    assert_eq!(report.items_skipped, 1);
    assert_eq!(report.matches_found, 1);
    assert_eq!(notifier.batches()[0][0].title, "Fine Book");
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let server = MockServer::start().await;
    serve_page(
        &server,
        "/catalogue/slow",
        ResponseTemplate::new(200)
            .set_body_string(product_page("Slow Book", "£1.00", "In stock"))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let mut options = CheckerOptions::new(format!("{}/catalogue/", server.uri()));
    options.fetch_timeout = Duration::from_millis(200);

    let checker = create_checker(
        vec![WatchEntry::new("slow", dec("10"))],
        http_fetcher(),
        RecordingNotifier::default(),
        options,
    );

    let result = checker.check().await;
    assert!(matches!(result, Err(AppError::Fetch(FetchError::Timeout { .. }))));
}

#[tokio::test]
async fn test_matches_batched_into_one_send() {
    let fetcher = StaticFetcher::default()
        .with_page("a", PageSnapshot::new("Book A", dec("8"), true))
        .with_page("b", PageSnapshot::new("Book B", dec("5"), true))
        .with_page("c", PageSnapshot::new("Book C", dec("1"), false));
    let notifier = RecordingNotifier::default();

    let checker = create_checker(
        vec![
            WatchEntry::new("a", dec("10")),
            WatchEntry::new("b", dec("5")),
            WatchEntry::new("c", dec("10")),
        ],
        fetcher.clone(),
        notifier.clone(),
        CheckerOptions::new(BASE_URL),
    );

    let report = checker.check().await.unwrap();
    assert_eq!(report.matches_found, 2);
    assert_eq!(fetcher.call_count(), 3);

    let batches = notifier.batches();
    assert_eq!(batches.len(), 1);
    let savings: Decimal = batches[0].iter().map(PriceMatch::difference).sum();
    assert_eq!(savings, dec("2.00"));
}
