use crate::feed::SearchCursor;

use super::data::{DisplayedImage, LoadOutcome, LoadResult};

pub const WELCOME_TITLE: &str = "Astronomy Picture of the Day";
pub const NOT_FOUND_TITLE: &str = "No space image found";

/// Where the main window is in its load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has been loaded yet
    Empty,
    /// A search is running in the background
    Loading,
    /// A record is on screen
    Loaded,
    /// The last search ran out of days
    LoadFailed,
}

/// Contents of the image pane
#[derive(Debug, Clone)]
pub enum ImagePane {
    Blank,
    Shown(DisplayedImage),
    /// The record was found but its picture could not be shown
    Unavailable(String),
}

/// Main window state: the only writer of what is on screen
#[derive(Debug)]
pub struct Viewer {
    cursor: SearchCursor,
    phase: Phase,
    pub title: String,
    pub caption: Option<String>,
    pub description: String,
    pub image: ImagePane,
}

impl Viewer {
    pub fn new(cursor: SearchCursor) -> Self {
        Self {
            cursor,
            phase: Phase::Empty,
            title: WELCOME_TITLE.to_string(),
            caption: None,
            description: String::new(),
            image: ImagePane::Blank,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> SearchCursor {
        self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Enter the loading phase and hand out the cursor for the search.
    ///
    /// Returns None when a search is already running.
    pub fn begin_load(&mut self) -> Option<SearchCursor> {
        if self.is_loading() {
            return None;
        }
        self.phase = Phase::Loading;
        Some(self.cursor)
    }

    /// Apply the result of a finished search
    pub fn apply(&mut self, result: LoadResult) {
        self.cursor = result.cursor;

        match result.outcome {
            LoadOutcome::Found(presented) => {
                self.title = presented.title;
                self.description = presented.explanation;
                self.caption = presented.record.caption();
                self.image = match presented.image {
                    Ok(image) => ImagePane::Shown(image),
                    Err(reason) => ImagePane::Unavailable(reason),
                };
                self.phase = Phase::Loaded;
            }
            LoadOutcome::NotFound {
                days_searched,
                service_unreachable,
            } => {
                self.title = NOT_FOUND_TITLE.to_string();
                self.description = not_found_message(days_searched, service_unreachable);
                self.caption = None;
                self.image = ImagePane::Blank;
                self.phase = Phase::LoadFailed;
            }
        }
    }

    /// The picture currently on screen, if any
    pub fn displayed_image(&self) -> Option<&DisplayedImage> {
        match &self.image {
            ImagePane::Shown(image) => Some(image),
            ImagePane::Blank | ImagePane::Unavailable(_) => None,
        }
    }

    /// Whether "view full size" is available
    pub fn can_zoom(&self) -> bool {
        !self.is_loading() && self.displayed_image().is_some()
    }
}

fn not_found_message(days_searched: u32, service_unreachable: bool) -> String {
    let days = if days_searched == 1 { "day" } else { "days" };
    let mut message = format!("No space image was found in the last {days_searched} {days} searched.");
    if service_unreachable {
        message.push_str(" The picture service may be unreachable.");
    }
    message
}
