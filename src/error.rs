/// Errors that stop the application before or while the UI runs
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("could not build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Feed(#[from] crate::feed::FeedError),

    #[error(transparent)]
    Translate(#[from] crate::translate::TranslateError),

    #[error("UI error: {0}")]
    Ui(#[from] iced::Error),
}
