//! Request execution shared by the clients of the remote services.

use reqwest::{Client, Request};
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::error::{DecodeSnafu, Error, Result, TransportSnafu};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Execute `request` and decode a JSON body.
///
/// Any status outside `[200, 400)` is turned into [`Error::Rejected`] carrying
/// the response body as its message.
pub async fn execute_json<T: DeserializeOwned>(client: &Client, request: Request) -> Result<T> {
    let url = request.url().to_string();
    log::debug!("http request method={} url={}", request.method(), url);

    let response = client
        .execute(request)
        .await
        .context(TransportSnafu { url: &url })?;

    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .context(TransportSnafu { url: &url })?;
    log::debug!("http response url={} status={} bytes={}", url, status, body.len());

    if !(200..400).contains(&status) {
        return Err(Error::Rejected {
            status,
            message: String::from_utf8_lossy(&body).trim().to_string(),
        });
    }

    serde_json::from_slice(&body).context(DecodeSnafu { url })
}

/// Join a base URL and a relative segment with exactly one separator.
pub fn join_url(base: &str, segment: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        segment.trim_start_matches('/')
    )
}
