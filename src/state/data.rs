/// Shared data structures for the application state
///
/// These structs represent the data that flows from the background
/// load task back into the UI layer.

use iced::widget::image::Handle;

use crate::feed::{FeedRecord, SearchCursor};

/// A decoded picture ready for display
#[derive(Debug, Clone)]
pub struct DisplayedImage {
    /// Downscaled copy that fits the main window's image pane
    pub preview: Handle,
    pub preview_width: u32,
    pub preview_height: u32,
    /// Original resolution, used by the full-size window
    pub full: Handle,
    pub width: u32,
    pub height: u32,
}

/// A found record with its text prepared for display
#[derive(Debug, Clone)]
pub struct PresentedRecord {
    pub record: FeedRecord,
    /// Title in the target language (original text if translation failed)
    pub title: String,
    /// Explanation in the target language (original text if translation failed)
    pub explanation: String,
    /// The decoded picture, or why it could not be shown
    pub image: Result<DisplayedImage, String>,
}

/// What a load action produced
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Found(Box<PresentedRecord>),
    NotFound {
        days_searched: u32,
        /// The last request failed at transport level, not on the filter
        service_unreachable: bool,
    },
}

/// Completion message of a load task
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// Cursor position after the search, to be stored by the view
    pub cursor: SearchCursor,
    pub outcome: LoadOutcome,
}
