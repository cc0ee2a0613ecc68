/// The load action: search, translate, download
///
/// Runs as one background task per button press. The cursor is moved into
/// the task and handed back in the result, so only the UI update step ever
/// writes view state.

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::feed::{locate, FeedClient, FeedRecord, LocateOutcome, SearchCursor};
use crate::imagery;
use crate::state::data::{LoadOutcome, LoadResult, PresentedRecord};
use crate::translate::Translator;

/// Language pair used for record text
#[derive(Debug, Clone)]
pub struct Languages {
    pub source: String,
    pub target: String,
}

/// Clients and settings shared by every load task
#[derive(Debug, Clone)]
pub struct Services {
    pub http: reqwest::Client,
    pub feed: FeedClient,
    /// None when translation is switched off
    pub translator: Option<Translator>,
    pub languages: Languages,
    pub max_lookback_days: u32,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("apod-viewer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let feed = FeedClient::new(http.clone(), &config.feed_url, config.api_key.clone())?;
        let translator = if config.no_translate {
            None
        } else {
            Some(Translator::new(http.clone(), &config.translate_url)?)
        };

        Ok(Self {
            http,
            feed,
            translator,
            languages: Languages {
                source: config.source_lang.clone(),
                target: config.target_lang.clone(),
            },
            max_lookback_days: config.max_lookback_days,
        })
    }

    /// Translate `text`, keeping the original when translation is off or fails
    async fn localize(&self, text: &str) -> String {
        let Some(translator) = &self.translator else {
            return text.to_string();
        };

        match translator
            .translate(text, &self.languages.source, &self.languages.target)
            .await
        {
            Ok(translated) => translated,
            Err(err) => {
                warn!(error = %err, "translation failed, showing original text");
                text.to_string()
            }
        }
    }

    async fn present(&self, record: FeedRecord) -> PresentedRecord {
        let title = self.localize(&record.title).await;
        let explanation = self.localize(&record.explanation).await;

        let image = match record.url.as_deref() {
            Some(url) => imagery::fetch_image(&self.http, url).await.map_err(|err| {
                warn!(url, error = %err, "could not load picture");
                err.to_string()
            }),
            None => {
                warn!(title = %record.title, "record has no picture URL");
                Err("the record has no picture".to_string())
            }
        };

        PresentedRecord {
            record,
            title,
            explanation,
            image,
        }
    }
}

/// Find the next space image before `cursor` and prepare it for display
pub async fn load_space_image(services: Services, mut cursor: SearchCursor) -> LoadResult {
    let from = cursor.date();
    let outcome = match locate(&services.feed, &mut cursor, services.max_lookback_days).await {
        LocateOutcome::Found { record, searched } => {
            info!(%from, searched, "presenting record");
            LoadOutcome::Found(Box::new(services.present(record).await))
        }
        LocateOutcome::Exhausted { searched, last_failure } => LoadOutcome::NotFound {
            days_searched: searched,
            service_unreachable: last_failure.is_some(),
        },
    };

    LoadResult { cursor, outcome }
}
