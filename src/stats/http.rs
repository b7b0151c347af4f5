//! Outbound JSON GET with per-request timeout and error classification.

use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{Result, VitrineError};

/// Longest upstream error body kept in an [`VitrineError::Api`] message.
const MAX_ERROR_BODY: usize = 200;

/// Bytes escaped when a subject is placed in a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Encode `subject` as exactly one URL path segment.
///
/// `.` and `..` would be collapsed away when the URL is parsed, so they are
/// rejected with [`VitrineError::InvalidSubject`].
pub fn path_segment(subject: &str) -> Result<String> {
    if subject == "." || subject == ".." {
        return Err(VitrineError::InvalidSubject(subject.to_string()));
    }
    Ok(utf8_percent_encode(subject, PATH_SEGMENT).to_string())
}

/// Thin wrapper over a shared [`reqwest::Client`].
///
/// Every request carries its own timeout; nothing is retried here. The
/// pipeline treats any error as "try the next candidate".
#[derive(Clone)]
pub struct JsonFetcher {
    http: Client,
}

impl JsonFetcher {
    /// Build a fetcher sending `user_agent` on every request.
    pub fn new(user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| VitrineError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// GET `url` and decode the body as `P`.
    ///
    /// - connect/read failure → [`VitrineError::Http`]
    /// - elapsed `timeout` → [`VitrineError::Timeout`]
    /// - non-2xx status → [`VitrineError::Api`]
    /// - undecodable body → [`VitrineError::Json`]
    pub async fn get_json<P: DeserializeOwned>(&self, url: &str, timeout: Duration) -> Result<P> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VitrineError::Api {
                status: status.as_u16(),
                message: truncate(&body, MAX_ERROR_BODY),
            });
        }

        let body = response.text().await.map_err(|e| classify(e, timeout))?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> VitrineError {
    if err.is_timeout() {
        VitrineError::Timeout(timeout)
    } else {
        VitrineError::Http(err.to_string())
    }
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
