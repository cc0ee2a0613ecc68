use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use super::locator::FeedSource;
use super::record::{ApodResponse, FeedRecord, MissReason};

/// Public picture-of-the-day endpoint
pub const DEFAULT_FEED_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Failure to obtain a usable response from the feed
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("feed request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("feed returned HTTP {0}")]
    Status(StatusCode),

    #[error("feed returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of asking the feed for one day
#[derive(Debug)]
pub enum FeedOutcome {
    /// A space-themed image record
    Found(FeedRecord),
    /// The feed answered, but the record is not a space image
    Miss(MissReason),
    /// The feed could not be reached or answered with an error
    Unavailable(FeedError),
}

/// HTTP client for the picture-of-the-day feed
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl FeedClient {
    /// Create a client for the feed at `base_url`.
    ///
    /// The `reqwest::Client` carries the request timeout and is shared with
    /// the rest of the application.
    pub fn new(http: reqwest::Client, base_url: &str, api_key: impl Into<String>) -> Result<Self, FeedError> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            api_key: api_key.into(),
        })
    }

    /// Build the request URL for a given day, or for "today" when `date` is None
    pub fn request_url(&self, date: Option<NaiveDate>) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            if let Some(date) = date {
                query.append_pair("date", &date.format("%Y-%m-%d").to_string());
            }
        }
        url
    }

    /// Fetch the record for `date` and apply the space-image filter
    pub async fn fetch(&self, date: Option<NaiveDate>) -> FeedOutcome {
        match self.fetch_record(date).await {
            Ok(record) => match record.check_space_image() {
                Ok(()) => FeedOutcome::Found(record),
                Err(reason) => FeedOutcome::Miss(reason),
            },
            Err(err) => FeedOutcome::Unavailable(err),
        }
    }

    /// Fetch and parse the record for `date` without filtering
    pub async fn fetch_record(&self, date: Option<NaiveDate>) -> Result<FeedRecord, FeedError> {
        let url = self.request_url(date);
        debug!(date = ?date, "requesting feed record");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FeedError::Status(status));
        }

        let body = response.text().await?;
        let raw: ApodResponse = serde_json::from_str(&body)?;
        Ok(FeedRecord::from(raw))
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch(&self, date: Option<NaiveDate>) -> FeedOutcome {
        FeedClient::fetch(self, date).await
    }
}
