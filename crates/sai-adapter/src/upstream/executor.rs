//! Single-attempt HTTP execution and outcome classification.

use super::{RequestOutcome, PROMPT_TOO_LONG_MARKERS, RATE_LIMIT_BODY_MARKER};
use crate::config::SaiConfig;
use crate::credentials::Credential;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE, COOKIE};
use reqwest::StatusCode;
use sai_types::{ExecuteRequest, UsageHeaders};
use std::time::Instant;
use tracing::{error, info, warn};

/// Custom header for the key credential scheme.
const API_KEY_HEADER: &str = "x-api-key";

/// Delay between connect-level transport retries.
const TRANSPORT_RETRY_DELAY_MS: u64 = 200;

/// Issue one POST attempt with exactly one auth header and classify it.
///
/// Connect failures are retried up to `config.max_retries`; timeouts and
/// HTTP error statuses are not. Every failure path folds into an outcome;
/// this function never panics or returns a transport error.
pub(crate) fn send_attempt(
    client: &Client,
    config: &SaiConfig,
    request_id: &str,
    url: &str,
    payload: &ExecuteRequest,
    credential: &Credential,
) -> RequestOutcome {
    let headers = match build_headers(credential) {
        Ok(h) => h,
        Err(message) => {
            error!("❌ [{}] Could not build auth header: {}", request_id, message);
            return RequestOutcome::NoResponse;
        },
    };

    let auth_kind = credential.kind();
    let history_len = payload.chat_messages.as_ref().map_or(0, Vec::len);
    info!(
        "🌐 [SERVER → SAI] [{}] Sending request | Auth: {} | Timeout: {}s | Messages: {}",
        request_id, auth_kind, config.timeout_secs, history_len
    );

    let mut transport_retries: u32 = 0;
    loop {
        let start = Instant::now();
        let response = client.post(url).headers(headers.clone()).json(payload).send();

        match response {
            Ok(resp) => {
                let elapsed = start.elapsed().as_secs_f64();
                let status = resp.status();
                let resp_headers = resp.headers().clone();
                let body = match resp.text() {
                    Ok(text) => text,
                    Err(e) => {
                        error!("❌ [{}] Failed to read response body: {}", request_id, e);
                        return RequestOutcome::NoResponse;
                    },
                };
                return classify_response(request_id, status, &resp_headers, body, elapsed);
            },
            Err(e) if e.is_timeout() => {
                error!(
                    "⏱️ [{}] Upstream request timed out | Timeout: {}s | Auth: {} | URL: {}",
                    request_id, config.timeout_secs, auth_kind, url
                );
                return RequestOutcome::NoResponse;
            },
            Err(e) if e.is_connect() && transport_retries < config.max_retries => {
                transport_retries += 1;
                warn!(
                    "Transport error at {}, retry {}/{} after {}ms: {}",
                    url, transport_retries, config.max_retries, TRANSPORT_RETRY_DELAY_MS, e
                );
                std::thread::sleep(std::time::Duration::from_millis(TRANSPORT_RETRY_DELAY_MS));
            },
            Err(e) => {
                error!(
                    "❌ [{}] Upstream connection failed | Auth: {} | URL: {} | Error: {}",
                    request_id, auth_kind, url, e
                );
                return RequestOutcome::NoResponse;
            },
        }
    }
}

/// Build the request headers with exactly one auth header attached.
fn build_headers(credential: &Credential) -> Result<HeaderMap, String> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));

    let value = HeaderValue::from_str(credential.value()).map_err(|e| e.to_string())?;
    match credential {
        Credential::Key(_) => {
            let name = HeaderName::from_static(API_KEY_HEADER);
            headers.insert(name, value);
        },
        Credential::Cookie(_) => {
            headers.insert(COOKIE, value);
        },
    }
    Ok(headers)
}

/// Map one HTTP response onto the outcome taxonomy.
pub(crate) fn classify_response(
    request_id: &str,
    status: StatusCode,
    headers: &HeaderMap,
    body: String,
    elapsed_secs: f64,
) -> RequestOutcome {
    if status.is_success() {
        let usage = extract_usage(status, headers, elapsed_secs);
        return RequestOutcome::Success { body, headers: usage };
    }

    match status.as_u16() {
        401 => {
            warn!("⚠️ [{}] HTTP 401: credential rejected by SAI", request_id);
            RequestOutcome::Unauthorized
        },
        429 if body.contains(RATE_LIMIT_BODY_MARKER) => {
            warn!(
                "⚠️ [{}] HTTP 429: '{}' detected | Will retry with Cookie if available",
                request_id, RATE_LIMIT_BODY_MARKER
            );
            RequestOutcome::RateLimited
        },
        429 => {
            error!(
                "❌ [{}] HTTP 429 without usage-limit marker | Response: {}",
                request_id,
                crate::normalize::preview(&body, 200)
            );
            RequestOutcome::NoResponse
        },
        500 => {
            let lowered = body.to_lowercase();
            if PROMPT_TOO_LONG_MARKERS.iter().any(|marker| lowered.contains(marker)) {
                warn!(
                    "⚠️ [{}] HTTP 500: prompt too long | Response: {}",
                    request_id,
                    crate::normalize::preview(&body, 300)
                );
                RequestOutcome::TooLong
            } else {
                error!(
                    "❌ [{}] HTTP 500 unhandled | Response: {}",
                    request_id,
                    crate::normalize::preview(&body, 300)
                );
                RequestOutcome::ServerError
            }
        },
        _ => {
            error!(
                "❌ [{}] HTTP error from SAI | Status: {} | Response: {}",
                request_id,
                status,
                crate::normalize::preview(&body, 200)
            );
            RequestOutcome::NoResponse
        },
    }
}

/// Extract usage accounting from the response headers, defaulting every
/// missing or non-numeric field.
fn extract_usage(status: StatusCode, headers: &HeaderMap, elapsed_secs: f64) -> UsageHeaders {
    let prompt_tokens = header_u32(headers, "prompttokens");
    let completion_tokens = header_u32(headers, "completiontokens");
    let model = headers
        .get("model")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let tokens_per_second =
        if elapsed_secs > 0.0 { f64::from(completion_tokens) / elapsed_secs } else { 0.0 };

    UsageHeaders {
        prompt_tokens,
        completion_tokens,
        total_tokens: prompt_tokens + completion_tokens,
        model,
        response_time: elapsed_secs,
        status_code: status.as_u16(),
        tokens_per_second,
    }
}

fn header_u32(headers: &HeaderMap, name: &str) -> u32 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}
