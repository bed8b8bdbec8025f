use stock_reminder::errors::watch_error::WatchError;
use stock_reminder::fetchers::price_fetcher::{PriceSource, QuotePageFetcher, USER_AGENT};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, Request, ResponseTemplate,
};

//
// ----------- Test Helpers -----------
//

fn quote_page(price_text: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body>
    <div id="quote-header-info">
      <span class="Trsdu(0.3s) Fw(b) Fz(36px) Mb(-4px) D(ib)" data-reactid="32">{price_text}</span>
      <span class="Trsdu(0.3s) Fw(500) Pstart(10px) Fz(24px)">+0.350 (+1.32%)</span>
    </div>
  </body>
</html>"#
    )
}

// The agent string contains a comma, so compare the raw header value.
fn sends_browser_user_agent(request: &Request) -> bool {
    request
        .headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        == Some(USER_AGENT)
}

/// Helper to create a mock server serving the given page for any quote.
async fn setup_mock_server(status: u16, body: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

//
// ----------- Happy Path Tests -----------
//

#[tokio::test]
async fn fetch_price_reads_price_from_quote_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/1810.HK"))
        .and(query_param("p", "1810.HK"))
        .and(query_param(".tsrc", "fin-srch"))
        .and(sends_browser_user_agent)
        .respond_with(ResponseTemplate::new(200).set_body_string(quote_page("26.950")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = QuotePageFetcher::new(mock_server.uri()).expect("client should build");
    let price = fetcher
        .fetch_price("1810.HK")
        .await
        .expect("price should be fetched");

    assert!((price - 26.95).abs() < 1e-9);
}

#[tokio::test]
async fn fetch_price_sends_one_request_per_call() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/3032.HK"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quote_page("7.630")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = QuotePageFetcher::new(mock_server.uri()).expect("client should build");
    fetcher.fetch_price("3032.HK").await.expect("first fetch");
    fetcher.fetch_price("3032.HK").await.expect("second fetch");
}

//
// ----------- Sad Path Tests -----------
//

#[tokio::test]
async fn fetch_price_changed_layout_is_missing_element() {
    let page = r#"<html><body><fin-streamer data-field="regularMarketPrice">26.950</fin-streamer></body></html>"#;
    let mock_server = setup_mock_server(200, page.to_string()).await;

    let fetcher = QuotePageFetcher::new(mock_server.uri()).expect("client should build");
    let err = fetcher.fetch_price("1810.HK").await.unwrap_err();

    assert!(
        matches!(err, WatchError::MissingElement { ref ticker } if ticker == "1810.HK"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn fetch_price_error_page_is_missing_element() {
    let mock_server = setup_mock_server(404, "<html><body>Not Found</body></html>".to_string()).await;

    let fetcher = QuotePageFetcher::new(mock_server.uri()).expect("client should build");
    let err = fetcher.fetch_price("NOPE.HK").await.unwrap_err();

    assert!(err.is_parse_error(), "unexpected error: {err:?}");
    assert!(!matches!(err, WatchError::Transport { .. }));
}

#[tokio::test]
async fn fetch_price_non_numeric_is_invalid_price() {
    let mock_server = setup_mock_server(200, quote_page("--")).await;

    let fetcher = QuotePageFetcher::new(mock_server.uri()).expect("client should build");
    let err = fetcher.fetch_price("1810.HK").await.unwrap_err();

    assert!(
        matches!(err, WatchError::InvalidPrice { ref text, .. } if text == "--"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn fetch_price_unreachable_host_is_transport_error() {
    // Nothing listens on port 1.
    let fetcher = QuotePageFetcher::new("http://127.0.0.1:1").expect("client should build");
    let err = fetcher.fetch_price("1810.HK").await.unwrap_err();

    assert!(
        matches!(err, WatchError::Transport { ref ticker, .. } if ticker == "1810.HK"),
        "unexpected error: {err:?}"
    );
    assert!(err.is_fetch_error());
    assert!(!err.is_parse_error());
}
