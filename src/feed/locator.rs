/// Backward date scan for the next space-themed picture
///
/// The locator checks one calendar day at a time, starting at the search
/// cursor and walking into the past. The cursor steps back after every
/// request, including the one that finds a record, so the next search starts
/// the day before the last result.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use super::client::{FeedError, FeedOutcome};
use super::record::FeedRecord;

/// Anything that can answer "what was published on this day?"
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, date: Option<NaiveDate>) -> FeedOutcome;
}

/// The day the next request will ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchCursor {
    date: NaiveDate,
}

impl SearchCursor {
    /// Cursor starting at the local calendar date
    pub fn today() -> Self {
        Self::starting_at(Local::now().date_naive())
    }

    pub fn starting_at(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Move one day into the past
    pub fn step_back(&mut self) {
        if let Some(previous) = self.date.pred_opt() {
            self.date = previous;
        }
    }
}

/// How a search ended
#[derive(Debug)]
pub enum LocateOutcome {
    /// A space image was found after `searched` requests
    Found { record: FeedRecord, searched: u32 },
    /// `searched` days were searched without a match
    Exhausted {
        searched: u32,
        /// Set when the final request failed at transport level rather than on the filter
        last_failure: Option<FeedError>,
    },
}

/// Search backward from `cursor` for at most `max_days` days.
///
/// `max_days` of zero is treated as one: every call makes at least one request.
pub async fn locate<S>(source: &S, cursor: &mut SearchCursor, max_days: u32) -> LocateOutcome
where
    S: FeedSource + ?Sized,
{
    let max_days = max_days.max(1);
    let mut last_failure = None;

    for attempt in 1..=max_days {
        let date = cursor.date();
        debug!(%date, attempt, "asking feed");

        let outcome = source.fetch(Some(date)).await;
        cursor.step_back();

        match outcome {
            FeedOutcome::Found(record) => {
                info!(%date, title = %record.title, searched = attempt, "found space image");
                return LocateOutcome::Found { record, searched: attempt };
            }
            FeedOutcome::Miss(reason) => {
                debug!(%date, %reason, "skipping day");
                last_failure = None;
            }
            FeedOutcome::Unavailable(err) => {
                warn!(%date, error = %err, "feed unavailable, skipping day");
                last_failure = Some(err);
            }
        }
    }

    info!(searched = max_days, until = %cursor.date(), "no space image in search window");
    LocateOutcome::Exhausted {
        searched: max_days,
        last_failure,
    }
}
