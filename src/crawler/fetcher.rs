//! HTTP fetcher with a bounded retry state machine
//!
//! One fetch walks `Attempting -> (done | Backoff -> Attempting)` for at
//! most [`MAX_ATTEMPTS`] attempts. Transient failures (connect errors,
//! timeouts, 5xx, 429) back off geometrically between attempts; other 4xx
//! responses are permanent and fail immediately without consuming the
//! remaining budget. The rate limiter's wait applies before every attempt,
//! separate from and in addition to the backoff.

use crate::crawler::limiter::RateLimiter;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum fetch attempts per URL, retries included
pub const MAX_ATTEMPTS: u32 = 3;

/// Backoff before the second attempt; doubles after that
const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// A successfully fetched resource (2xx/3xx-resolved)
#[derive(Debug)]
pub struct FetchedPage {
    /// HTTP status code of the final response
    pub status_code: u16,

    /// Declared Content-Type header, if any
    pub content_type: Option<String>,

    /// Raw response body; may be empty, that is still a success
    pub body: Vec<u8>,

    /// Byte length of the body
    pub content_length: u64,
}

/// Terminal fetch failures
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Permanent failure for {url}: {reason}")]
    Permanent {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Gave up on {url} after {attempts} attempts: {reason}")]
    Exhausted {
        url: String,
        attempts: u32,
        last_status: Option<u16>,
        reason: String,
    },
}

impl FetchError {
    /// The last HTTP status observed, if the failure had one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Permanent { status, .. } => *status,
            Self::Exhausted { last_status, .. } => *last_status,
        }
    }
}

/// Whether a failure is worth retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Transient,
    Permanent,
}

/// Retry machine states; attempts are 1-based
#[derive(Debug, PartialEq, Eq)]
enum RetryState {
    Attempting { attempt: u32 },
    Backoff { next_attempt: u32, delay: Duration },
}

/// Classifies a response status: `None` means success (no retry even for an
/// empty body), otherwise transient (5xx, 429) or permanent (other 4xx).
pub fn classify_status(status: u16) -> Option<FailureClass> {
    match status {
        200..=399 => None,
        429 => Some(FailureClass::Transient),
        400..=499 => Some(FailureClass::Permanent),
        _ => Some(FailureClass::Transient),
    }
}

/// Classifies a transport-level error: timeouts and connection problems are
/// transient; anything else (invalid request, redirect loop) will not
/// resolve on retry.
pub fn classify_error(error: &reqwest::Error) -> FailureClass {
    if error.is_timeout() || error.is_connect() {
        FailureClass::Transient
    } else if error.is_body() || error.is_decode() {
        // Body cut off mid-transfer behaves like a connection error
        FailureClass::Transient
    } else {
        FailureClass::Permanent
    }
}

/// Backoff duration after a failed attempt (1-based): 1s, 2s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_BASE * 2u32.saturating_pow(attempt.saturating_sub(1))
}

/// Fetches a URL with bounded retries.
///
/// `delay_floor_secs` raises the limiter's lower bound for hosts whose
/// robots.txt declares a Crawl-delay.
pub async fn fetch(
    client: &Client,
    limiter: &RateLimiter,
    url: &Url,
    delay_floor_secs: f64,
) -> Result<FetchedPage, FetchError> {
    let mut state = RetryState::Attempting { attempt: 1 };
    let mut last_status: Option<u16> = None;
    let mut last_reason = String::new();

    loop {
        match state {
            RetryState::Attempting { attempt } => {
                limiter.wait_at_least(delay_floor_secs).await;
                tracing::debug!("Fetching {} (attempt {}/{})", url, attempt, MAX_ATTEMPTS);

                match client.get(url.clone()).send().await {
                    Ok(response) => {
                        let status = response.status().as_u16();
                        match classify_status(status) {
                            None => {
                                let content_type = response
                                    .headers()
                                    .get(reqwest::header::CONTENT_TYPE)
                                    .and_then(|v| v.to_str().ok())
                                    .map(|s| s.to_lowercase());

                                match response.bytes().await {
                                    Ok(body) => {
                                        let body = body.to_vec();
                                        let content_length = body.len() as u64;
                                        return Ok(FetchedPage {
                                            status_code: status,
                                            content_type,
                                            body,
                                            content_length,
                                        });
                                    }
                                    Err(e) => {
                                        // Headers arrived but the body did not
                                        last_status = Some(status);
                                        last_reason = format!("body read failed: {}", e);
                                        state = next_state(url, attempt, &last_status, &last_reason)?;
                                    }
                                }
                            }
                            Some(FailureClass::Permanent) => {
                                return Err(FetchError::Permanent {
                                    url: url.to_string(),
                                    status: Some(status),
                                    reason: format!("HTTP {}", status),
                                });
                            }
                            Some(FailureClass::Transient) => {
                                last_status = Some(status);
                                last_reason = format!("HTTP {}", status);
                                state = next_state(url, attempt, &last_status, &last_reason)?;
                            }
                        }
                    }
                    Err(e) => match classify_error(&e) {
                        FailureClass::Permanent => {
                            return Err(FetchError::Permanent {
                                url: url.to_string(),
                                status: None,
                                reason: e.to_string(),
                            });
                        }
                        FailureClass::Transient => {
                            last_reason = e.to_string();
                            state = next_state(url, attempt, &last_status, &last_reason)?;
                        }
                    },
                }
            }
            RetryState::Backoff {
                next_attempt,
                delay,
            } => {
                tracing::debug!(
                    "Backing off {:?} before attempt {}/{} for {}",
                    delay,
                    next_attempt,
                    MAX_ATTEMPTS,
                    url
                );
                tokio::time::sleep(delay).await;
                state = RetryState::Attempting {
                    attempt: next_attempt,
                };
            }
        }
    }
}

/// Advances past a transient failure: backoff if budget remains, otherwise
/// report exhaustion.
fn next_state(
    url: &Url,
    attempt: u32,
    last_status: &Option<u16>,
    reason: &str,
) -> Result<RetryState, FetchError> {
    if attempt >= MAX_ATTEMPTS {
        return Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: attempt,
            last_status: *last_status,
            reason: reason.to_string(),
        });
    }
    Ok(RetryState::Backoff {
        next_attempt: attempt + 1,
        delay: backoff_delay(attempt),
    })
}
