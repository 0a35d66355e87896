// src/fetcher.rs
// =============================================================================
// This module is the HTTP boundary of the crawler.
//
// Key functionality:
// - Builds the shared reqwest client with the configured timeout
// - Fetches page bodies for the crawl engine
// - Makes independent verification requests for discovered resources
// - Classifies every failure mode into a FetchError
//
// Every FetchError is non-fatal: the task that hit it reports the error
// (when verbose) and ends, without affecting sibling tasks or the run.
// =============================================================================

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;

// Classified failure of a single fetch.
//
// Connection failures, timeouts and non-2xx statuses all land here; the
// crawl engine treats them identically (report and move on), so the variants
// exist for diagnostics, not control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request exceeded the configured timeout
    Timeout,
    /// Could not connect (DNS failure, refused, unreachable)
    Connect,
    /// The server answered with a non-2xx status
    Status(u16),
    /// Anything else reqwest can produce (invalid URL, body read failure, ...)
    Other(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Timeout => write!(f, "request timed out"),
            FetchError::Connect => write!(f, "connection failed"),
            FetchError::Status(code) => write!(f, "HTTP {}", code),
            FetchError::Other(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for FetchError {}

// Builds the HTTP client shared by all crawl tasks.
//
// One client means one connection pool; cloning it per task is cheap
// (it's reference counted internally).
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

// Fetches a page and returns its body text.
//
// Only 2xx responses yield a body; everything else becomes a FetchError.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await.map_err(classify)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    response.text().await.map_err(classify)
}

// Confirms that a resource URL is reachable.
//
// This is an independent GET against the exact URL; the body is discarded.
// A resource is only ever recorded after this returns Ok.
pub async fn verify_resource(client: &Client, url: &str) -> Result<(), FetchError> {
    let response = client.get(url).send().await.map_err(classify)?;

    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status(status.as_u16()))
    }
}

// Sorts a reqwest error into our taxonomy.
//
// reqwest errors can happen for many reasons (timeout, DNS, TLS, redirect
// loops); we only distinguish the ones the operator can act on.
fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect
    } else if let Some(status) = error.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Other(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(timeout_ms: u64) -> Client {
        build_client(Duration::from_millis(timeout_ms)).expect("client should build")
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
        assert_eq!(FetchError::Connect.to_string(), "connection failed");
        assert_eq!(FetchError::Status(404).to_string(), "HTTP 404");
        assert_eq!(
            FetchError::Other("boom".to_string()).to_string(),
            "boom"
        );
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&server)
            .await;

        let client = test_client(2000);
        let body = fetch_page(&client, &format!("{}/page", server.uri()))
            .await
            .expect("fetch should succeed");
        assert_eq!(body, "<html>hi</html>");
    }

    #[tokio::test]
    async fn test_fetch_page_non_2xx_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(2000);
        let err = fetch_page(&client, &format!("{}/missing", server.uri()))
            .await
            .expect_err("404 should be an error");
        assert_eq!(err, FetchError::Status(404));
    }

    #[tokio::test]
    async fn test_fetch_page_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = test_client(50);
        let err = fetch_page(&client, &format!("{}/slow", server.uri()))
            .await
            .expect_err("slow response should time out");
        assert_eq!(err, FetchError::Timeout);
    }

    #[tokio::test]
    async fn test_verify_resource_success_and_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string("console.log(1)"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone.js"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let client = test_client(2000);
        assert!(verify_resource(&client, &format!("{}/app.js", server.uri()))
            .await
            .is_ok());
        assert_eq!(
            verify_resource(&client, &format!("{}/gone.js", server.uri()))
                .await
                .expect_err("410 should fail verification"),
            FetchError::Status(410)
        );
    }
}
