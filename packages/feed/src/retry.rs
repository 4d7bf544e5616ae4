//! HTTP retry helper for transient errors.
//!
//! Feed downloads go through [`send_bytes`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so every request gets
//! exponential backoff on timeouts, connection resets, rate limiting and
//! server errors.
//!
//! ```ignore
//! let body = retry::send_bytes(|| client.get(&url), 3).await?;
//! ```

use std::time::Duration;

use crate::FeedError;

/// Sends an HTTP request and returns the response body.
///
/// `build_request` is called once per attempt since builders are consumed
/// by `.send()`. Connection errors, timeouts, HTTP 429 and HTTP 5xx are
/// retried up to `max_retries` times with 1s, 2s, 4s... backoff. A body
/// that fails to read mid-stream triggers a fresh request under the same
/// budget. Other 4xx statuses fail immediately.
///
/// # Errors
///
/// Returns [`FeedError`] if the request still fails after all retries or
/// the server returns a non-retryable status.
#[allow(clippy::future_not_send)]
pub async fn send_bytes<F>(build_request: F, max_retries: u32) -> Result<Vec<u8>, FeedError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;

    loop {
        let response = send_inner(&build_request, max_retries).await?;
        let url = response.url().to_string();

        match response.bytes().await {
            Ok(body) => {
                log::debug!("Fetched {} bytes from {url}", body.len());
                return Ok(body.to_vec());
            }
            Err(e) if attempt < max_retries => {
                attempt += 1;
                let delay = backoff(attempt);
                log::warn!(
                    "Body read failed (retry {attempt}/{max_retries}), re-fetching in {delay:?}...\n  \
                     url: {url}\n  \
                     error: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                log::error!("Body read failed after {max_retries} retries, giving up: {url}: {e}");
                return Err(FeedError::Http(e));
            }
        }
    }
}

/// Core retry loop. Returns the first 2xx/3xx response.
#[allow(clippy::future_not_send)]
async fn send_inner<F>(build_request: &F, max_retries: u32) -> Result<reqwest::Response, FeedError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = backoff(attempt);
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < max_retries {
                    log::warn!("  transient error: {e}");
                    continue;
                }
                return Err(FeedError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                    if attempt < max_retries {
                        log::warn!("  HTTP {status} from {}", response.url());
                        continue;
                    }
                    return Err(status_error(&response));
                }

                // 4xx other than 429 will not get better on retry.
                if status.is_client_error() {
                    return Err(status_error(&response));
                }

                return Ok(response);
            }
        }
    }

    unreachable!("send_inner retry loop exited without returning")
}

/// 1s, 2s, 4s, ... for attempts 1, 2, 3, ..., capped at 64s.
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.saturating_sub(1).min(6))
}

fn status_error(response: &reqwest::Response) -> FeedError {
    FeedError::Status {
        status: response.status().as_u16(),
        url: response.url().to_string(),
    }
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}
