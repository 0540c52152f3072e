use std::time::Instant;

use reqwest::{
    blocking::Client,
    header::{HeaderMap, CONNECTION, CONTENT_TYPE},
    StatusCode,
};
use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, ClientResult};

use super::models::{HttpMethod, HttpValidationResult};

/// One blocking request/response exchange. Anything but `200 OK` is an error.
///
/// The request asks the server to close the connection, so the socket is
/// released before this returns.
pub(crate) fn execute(
    client: &Client,
    method: HttpMethod,
    url: &str,
    content_type: Option<&str>,
    body: Option<&[u8]>,
) -> ClientResult<HttpValidationResult> {
    let parsed = Url::parse(url).map_err(|err| ClientError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    })?;
    let network = |source| ClientError::Network {
        url: url.to_string(),
        source,
    };

    let mut request_builder = client
        .request(method.to_reqwest(), parsed)
        .header(CONNECTION, "close");
    if let Some(content_type) = content_type {
        request_builder = request_builder.header(CONTENT_TYPE, content_type);
    }
    if let Some(body) = body {
        request_builder = request_builder.body(body.to_vec());
    }

    debug!(%method, url, body_bytes = body.map(<[u8]>::len), "sending validation request");
    let start = Instant::now();
    let response = request_builder.send().map_err(network)?;
    let status = response.status();
    let response_type = content_type_of(response.headers());
    let bytes = response
        .bytes()
        .map_err(|source| ClientError::ResponseBody {
            url: url.to_string(),
            status: status.as_u16(),
            source,
        })?;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    info!(
        %method,
        url,
        status = status.as_u16(),
        body_bytes = bytes.len(),
        duration_ms,
        "validation response"
    );

    let body_text = String::from_utf8_lossy(&bytes).into_owned();
    if status != StatusCode::OK {
        return Err(ClientError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
            message: status_message(status, &body_text),
        });
    }

    Ok(HttpValidationResult {
        status_code: status.as_u16(),
        content_type: response_type,
        body: bytes.to_vec(),
        body_text,
        duration_ms,
    })
}

fn content_type_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn status_message(status: StatusCode, body_text: &str) -> String {
    let trimmed = body_text.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        trimmed.to_string()
    }
}
