/// Translation of record text through the public Google Translate endpoint
///
/// The endpoint answers with a nested JSON array. The first element is a list
/// of segments, one per sentence, where each segment starts with the
/// translated text. Long explanations come back as several segments.

use serde_json::Value;
use tracing::debug;
use url::Url;

pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("invalid translator URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("translator returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("translator returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("translator response had no translated segments")]
    Empty,
}

/// Stateless translation client
#[derive(Debug, Clone)]
pub struct Translator {
    http: reqwest::Client,
    base_url: Url,
}

impl Translator {
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, TranslateError> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    fn request_url(&self, text: &str, source: &str, target: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", source)
            .append_pair("tl", target)
            .append_pair("dt", "t")
            .append_pair("q", text);
        url
    }

    /// Translate `text` from the `source` language code to the `target` one
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        debug!(source, target, chars = text.len(), "translating");
        let response = self.http.get(self.request_url(text, source, target)).send().await?;
        if !response.status().is_success() {
            return Err(TranslateError::Status(response.status()));
        }

        let body: Value = serde_json::from_str(&response.text().await?)?;
        join_segments(&body)
    }
}

/// Concatenate the translated text of every segment in a response body
fn join_segments(body: &Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or(TranslateError::Empty)?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        Err(TranslateError::Empty)
    } else {
        Ok(translated)
    }
}
