use once_cell::sync::Lazy;
use regex::bytes::Regex;

static JSON_BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A\s*[\[\{].*[\]\}]\s*\z").expect("valid JSON body pattern"));

static HTML_BODY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\A\s*(<\?xml[^>]*\?>\s*)?<x?html[\s>]").expect("valid HTML body pattern")
});

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Shape of a validation response body, sniffed from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Zip,
    Json,
    Html,
    Text,
}

impl ContentKind {
    pub fn detect(body: &[u8]) -> Self {
        if body.starts_with(ZIP_MAGIC) {
            ContentKind::Zip
        } else if JSON_BODY.is_match(body) {
            ContentKind::Json
        } else if HTML_BODY.is_match(body) {
            ContentKind::Html
        } else {
            ContentKind::Text
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ContentKind::Zip => ".zip",
            ContentKind::Json => ".json",
            ContentKind::Html => ".html",
            ContentKind::Text => ".txt",
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, ContentKind::Zip)
    }
}

/// First `limit` bytes of a body as text, or hex when they are not UTF-8.
pub fn create_preview(bytes: &[u8], limit: usize) -> String {
    let slice = &bytes[..bytes.len().min(limit)];
    match std::str::from_utf8(slice) {
        Ok(text) => text.to_string(),
        Err(_) => hex::encode(slice),
    }
}
