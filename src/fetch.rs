use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("food_graph_crawler/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Source of raw page markup. Anything other than a 200 is an error.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain sequential reqwest client; one request in flight at a time.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(
            "GET {} -> {} bytes in {}ms",
            url,
            body.len(),
            start.elapsed().as_millis()
        );
        Ok(body)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FixtureFetcher;
    use super::*;

    #[tokio::test]
    async fn fixture_serves_known_and_rejects_unknown() {
        let f = FixtureFetcher::new().page("http://a.test/x", "<p>hi</p>");
        assert_eq!(f.get("http://a.test/x").await.unwrap(), "<p>hi</p>");
        let err = f.get("http://a.test/y").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(f.requested().len(), 2);
    }

    #[test]
    fn status_error_names_url() {
        let e = FetchError::Status {
            url: "http://a.test/x".into(),
            status: 503,
        };
        assert_eq!(e.to_string(), "HTTP 503 for http://a.test/x");
    }
}
