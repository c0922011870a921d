//! HTTP helpers for network dataset sources.

use anyhow::Context;
use std::time::Duration;
use tracing::debug;

/// How a failed dataset request is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: usize, delay_ms: u64) -> Self {
        Self {
            retries,
            delay: Duration::from_millis(delay_ms),
        }
    }

    pub fn attempts(&self) -> usize {
        self.retries + 1
    }
}

/// GETs `url` and returns the response body.
///
/// Connection failures and non-success statuses are retried according to
/// `policy`. The error of the last attempt is returned.
pub async fn get_body(url: &str, policy: RetryPolicy) -> anyhow::Result<String> {
    let mut attempt = 1;
    loop {
        match get_once(url).await {
            Ok(body) => return Ok(body),
            Err(err) if attempt >= policy.attempts() => {
                return Err(err)
                    .with_context(|| format!("GET {url} failed after {attempt} attempt(s)"));
            }
            Err(err) => {
                debug!(url, attempt, error = %err, "Dataset request failed, retrying");
                attempt += 1;
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

async fn get_once(url: &str) -> reqwest::Result<String> {
    reqwest::get(url).await?.error_for_status()?.text().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 4);
        assert_eq!(policy.delay, Duration::from_millis(500));
        assert_eq!(RetryPolicy::new(0, 0).attempts(), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_failed_attempt() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/coins"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/coins", mock_server.uri());
        let body = get_body(&url, RetryPolicy::new(2, 0)).await.unwrap();
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_gives_up_after_all_attempts() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins"))
            .respond_with(ResponseTemplate::new(404))
            .expect(3)
            .mount(&mock_server)
            .await;

        let url = format!("{}/coins", mock_server.uri());
        let err = get_body(&url, RetryPolicy::new(2, 0)).await.unwrap_err();
        assert!(err.to_string().contains("failed after 3 attempt(s)"));
    }
}
