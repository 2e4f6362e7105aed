use std::{fmt, time::Duration};

use awc::http::header;
use futures::future::{FutureExt as _, LocalBoxFuture};
use secstr::SecUtf8;

const USER_AGENT: &str = concat!("ghfeed/", env!("CARGO_PKG_VERSION"));
const FEED_BODY_LIMIT: usize = 8 * 1024 * 1024;
const AVATAR_BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("{url} returned {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },
    #[error("failed reading response body from {url}: {message}")]
    Body { url: String, message: String },
    #[error("invalid JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of raw `received_events` pages.
pub trait FeedSource {
    fn fetch_page<'a>(
        &'a self,
        user: &'a str,
        page: u32,
    ) -> LocalBoxFuture<'a, Result<Vec<serde_json::Value>, FetchError>>;
}

/// Source of avatar image bytes.
pub trait AvatarSource {
    fn fetch_avatar<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, FetchError>>;
}

#[derive(Clone)]
pub struct GitHubClient {
    http: awc::Client,
    api_url: String,
    token: Option<SecUtf8>,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Debug)]
        struct Redacted;

        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| Redacted))
            .finish()
    }
}

/// GitHub error bodies look like `{"message": "Not Found", ...}`.
#[derive(Debug, serde::Deserialize)]
struct ApiError {
    message: String,
}

fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ApiError>(body)
        .map(|err| err.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned())
}

pub fn received_events_url(api_url: &str, user: &str, page: u32) -> String {
    format!(
        "{}/users/{}/received_events?page={}",
        api_url.trim_end_matches('/'),
        user,
        page
    )
}

impl GitHubClient {
    pub fn new(api_url: String, token: Option<SecUtf8>, timeout: Duration) -> Self {
        let http = awc::Client::builder()
            .timeout(timeout)
            .add_default_header((header::USER_AGENT, USER_AGENT))
            .finish();
        Self {
            http,
            api_url,
            token,
        }
    }

    async fn get(&self, url: &str, limit: usize, authorized: bool) -> Result<Vec<u8>, FetchError> {
        let mut req = self.http.get(url);
        if authorized {
            req = req.insert_header((header::ACCEPT, "application/vnd.github+json"));
            if let Some(token) = &self.token {
                req = req.bearer_auth(token.unsecure());
            }
        }

        let mut resp = req.send().await.map_err(|err| FetchError::Request {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        let body = resp
            .body()
            .limit(limit)
            .await
            .map_err(|err| FetchError::Body {
                url: url.to_string(),
                message: err.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body.to_vec())
    }
}

impl FeedSource for GitHubClient {
    fn fetch_page<'a>(
        &'a self,
        user: &'a str,
        page: u32,
    ) -> LocalBoxFuture<'a, Result<Vec<serde_json::Value>, FetchError>> {
        async move {
            let url = received_events_url(&self.api_url, user, page);
            let body = self.get(&url, FEED_BODY_LIMIT, true).await?;
            serde_json::from_slice(&body).map_err(|source| FetchError::Json { url, source })
        }
        .boxed_local()
    }
}

impl AvatarSource for GitHubClient {
    // Avatars live on a CDN outside the API, so the token is never sent there.
    fn fetch_avatar<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, FetchError>> {
        self.get(url, AVATAR_BODY_LIMIT, false).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_received_events_url() {
        assert_eq!(
            received_events_url("https://api.github.com/", "alice", 3),
            "https://api.github.com/users/alice/received_events?page=3"
        );
        assert_eq!(
            received_events_url("http://localhost:8080", "bob", 1),
            "http://localhost:8080/users/bob/received_events?page=1"
        );
    }

    #[test]
    fn extracts_github_error_message() {
        assert_eq!(
            error_message(br#"{"message": "Not Found", "documentation_url": "x"}"#),
            "Not Found"
        );
        assert_eq!(error_message(b"bad gateway"), "bad gateway");
    }

    #[actix_rt::test]
    async fn debug_hides_token() {
        let client = GitHubClient::new(
            "https://api.github.com".into(),
            Some(SecUtf8::from("hunter2".to_string())),
            Duration::from_secs(5),
        );
        let debug = format!("{:?}", client);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("Redacted"));
    }
}
