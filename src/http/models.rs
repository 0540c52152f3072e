use std::{fmt, fs, path::Path};

use crate::error::{ClientError, ClientResult};

use super::content::ContentKind;

pub const ZIP_CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpValidationRequest {
    pub url: String,
    pub method: HttpMethod,
    pub content_type: Option<String>,
    pub body: Option<Vec<u8>>,
}

impl HttpValidationRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            content_type: None,
            body: None,
        }
    }

    /// POST carrying `body` as a zip archive.
    pub fn post(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            content_type: Some(ZIP_CONTENT_TYPE.to_string()),
            body: Some(body),
        }
    }

    pub fn post_file(url: impl Into<String>, path: &Path) -> ClientResult<Self> {
        let body = fs::read(path).map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::post(url, body))
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn body_len(&self) -> Option<usize> {
        self.body.as_ref().map(Vec::len)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpValidationResult {
    pub status_code: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub body_text: String,
    pub duration_ms: f64,
}

impl HttpValidationResult {
    pub fn content_kind(&self) -> ContentKind {
        ContentKind::detect(&self.body)
    }
}
