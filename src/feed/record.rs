/// Picture-of-the-day records and the space-theme filter
///
/// The feed returns one JSON object per calendar day. Only images whose
/// title mentions space or the universe are shown by the viewer.

use chrono::NaiveDate;
use serde::Deserialize;

/// Title keywords that mark a record as space-themed (matched lowercase)
const SPACE_KEYWORDS: [&str; 2] = ["space", "universe"];

/// Shown in place of a title or explanation the feed left out
pub const MISSING_TITLE: &str = "No title available.";
pub const MISSING_EXPLANATION: &str = "No explanation available.";

/// Kind of media a record points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    Image,
    /// Anything else the feed publishes (usually "video")
    Other(String),
}

impl From<&str> for MediaType {
    fn from(value: &str) -> Self {
        if value == "image" {
            MediaType::Image
        } else {
            MediaType::Other(value.to_string())
        }
    }
}

/// Raw JSON body returned by the feed endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ApodResponse {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
}

/// One day of the feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRecord {
    /// Day the record was published for (None if the feed omitted it)
    pub date: Option<NaiveDate>,
    pub title: String,
    pub explanation: String,
    pub media_type: MediaType,
    /// Display-resolution image URL
    pub url: Option<String>,
    pub copyright: Option<String>,
}

impl From<ApodResponse> for FeedRecord {
    fn from(raw: ApodResponse) -> Self {
        let date = raw
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Self {
            date,
            title: or_placeholder(raw.title, MISSING_TITLE),
            explanation: or_placeholder(raw.explanation, MISSING_EXPLANATION),
            media_type: MediaType::from(raw.media_type.as_str()),
            url: raw.url,
            copyright: raw.copyright.map(|c| c.trim().to_string()),
        }
    }
}

fn or_placeholder(text: String, placeholder: &str) -> String {
    if text.trim().is_empty() {
        placeholder.to_string()
    } else {
        text
    }
}

/// Why a successfully fetched record was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// The day's media is not a still image
    NotAnImage(String),
    /// The title does not mention space or the universe
    OffTopic(String),
}

impl std::fmt::Display for MissReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissReason::NotAnImage(kind) => write!(f, "media type is {kind:?}, not an image"),
            MissReason::OffTopic(title) => write!(f, "title {title:?} is not space-themed"),
        }
    }
}

impl FeedRecord {
    /// Check the record against the space-image filter.
    ///
    /// The media type is checked first, so a video is always rejected as
    /// `NotAnImage` even when its title mentions space.
    pub fn check_space_image(&self) -> Result<(), MissReason> {
        if let MediaType::Other(kind) = &self.media_type {
            return Err(MissReason::NotAnImage(kind.clone()));
        }

        let title = self.title.to_lowercase();
        if SPACE_KEYWORDS.iter().any(|keyword| title.contains(keyword)) {
            Ok(())
        } else {
            Err(MissReason::OffTopic(self.title.clone()))
        }
    }

    /// One-line caption: publication date and credit, if known
    pub fn caption(&self) -> Option<String> {
        match (self.date, self.copyright.as_deref()) {
            (Some(date), Some(credit)) => Some(format!("{date} · © {credit}")),
            (Some(date), None) => Some(date.to_string()),
            (None, Some(credit)) => Some(format!("© {credit}")),
            (None, None) => None,
        }
    }
}
