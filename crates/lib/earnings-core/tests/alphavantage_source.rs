use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use earnings_core::source::{AlphaVantageConfig, AlphaVantageSource, ReportSource, SourceError};
use earnings_store::models::{CompanySymbol, ReportType};
use tokio::net::TcpListener;

type Hits = Arc<Mutex<Vec<HashMap<String, String>>>>;

const INCOME_STATEMENT: &str = r#"{
    "symbol": "MSFT",
    "annualReports": [],
    "quarterlyReports": [
        {"fiscalDateEnding": "2024-06-30", "reportedCurrency": "USD", "totalRevenue": "64727000000"},
        {"fiscalDateEnding": "2024-03-31", "reportedCurrency": "USD", "totalRevenue": "61858000000"}
    ]
}"#;

async fn spawn_upstream(
    status: StatusCode,
    body: &'static str,
    delay: Option<Duration>,
) -> (String, Hits) {
    let hits: Hits = Arc::new(Mutex::new(Vec::new()));
    let recorded = hits.clone();
    let app = Router::new().route(
        "/query",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().expect("hits lock").push(params);
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                (status, body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("upstream server");
    });
    (format!("http://{addr}/query"), hits)
}

fn source_for(base_url: &str, api_key: Option<&str>) -> AlphaVantageSource {
    let config = AlphaVantageConfig::new(api_key.map(str::to_string)).with_base_url(base_url);
    AlphaVantageSource::new(config).expect("client should build")
}

#[tokio::test]
async fn fetch_sends_function_symbol_and_key() {
    let (base_url, hits) = spawn_upstream(StatusCode::OK, INCOME_STATEMENT, None).await;
    let source = source_for(&base_url, Some("test-key"));

    let response = source
        .fetch_quarterly_reports(ReportType::IncomeStatement, CompanySymbol::Msft)
        .await
        .expect("fetch should succeed");

    assert_eq!(response.quarterly_reports.len(), 2);
    assert_eq!(
        response.quarterly_reports[0].total_revenue.as_deref(),
        Some("64727000000")
    );

    let hits = hits.lock().expect("hits lock");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].get("function").map(String::as_str), Some("INCOME_STATEMENT"));
    assert_eq!(hits[0].get("symbol").map(String::as_str), Some("MSFT"));
    assert_eq!(hits[0].get("apikey").map(String::as_str), Some("test-key"));
}

#[tokio::test]
async fn missing_key_fails_without_request() {
    let (base_url, hits) = spawn_upstream(StatusCode::OK, INCOME_STATEMENT, None).await;
    let source = source_for(&base_url, Some("   "));

    let err = source
        .fetch_quarterly_reports(ReportType::CashFlow, CompanySymbol::Tsla)
        .await
        .expect_err("blank key should be rejected");

    assert_eq!(err, SourceError::MissingCredential("ALPHAVANTAGE_API_KEY"));
    assert!(hits.lock().expect("hits lock").is_empty());
}

#[tokio::test]
async fn error_status_is_transport_failure() {
    let (base_url, _hits) =
        spawn_upstream(StatusCode::SERVICE_UNAVAILABLE, "unavailable", None).await;
    let source = source_for(&base_url, Some("secret-key"));

    let err = source
        .fetch_quarterly_reports(ReportType::CashFlow, CompanySymbol::Nvda)
        .await
        .expect_err("503 should fail");

    let message = match err {
        SourceError::Transport(message) => message,
        other => panic!("expected transport error, got {other:?}"),
    };
    assert!(message.contains("503"), "message was: {message}");
    assert!(!message.contains("secret-key"), "message leaked key: {message}");
}

#[tokio::test]
async fn malformed_body_is_decode_failure() {
    let (base_url, _hits) = spawn_upstream(StatusCode::OK, "<html>oops</html>", None).await;
    let source = source_for(&base_url, Some("test-key"));

    let err = source
        .fetch_quarterly_reports(ReportType::IncomeStatement, CompanySymbol::Msft)
        .await
        .expect_err("html is not a statement payload");

    assert!(matches!(err, SourceError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn advisory_payload_yields_no_reports() {
    let (base_url, _hits) = spawn_upstream(
        StatusCode::OK,
        r#"{"Information": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#,
        None,
    )
    .await;
    let source = source_for(&base_url, Some("test-key"));

    let response = source
        .fetch_quarterly_reports(ReportType::IncomeStatement, CompanySymbol::Msft)
        .await
        .expect("advisory payload is still a valid response");

    assert!(response.quarterly_reports.is_empty());
    assert!(response.advisory().is_some());
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let (base_url, _hits) = spawn_upstream(
        StatusCode::OK,
        INCOME_STATEMENT,
        Some(Duration::from_millis(500)),
    )
    .await;
    let config = AlphaVantageConfig::new(Some("test-key".to_string()))
        .with_base_url(base_url)
        .with_timeout(Duration::from_millis(50));
    let source = AlphaVantageSource::new(config).expect("client should build");

    let err = source
        .fetch_quarterly_reports(ReportType::IncomeStatement, CompanySymbol::Msft)
        .await
        .expect_err("request should time out");

    let message = match err {
        SourceError::Transport(message) => message,
        other => panic!("expected transport error, got {other:?}"),
    };
    assert!(message.contains("timed out"), "message was: {message}");
}
