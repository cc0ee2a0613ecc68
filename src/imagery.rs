/// Picture download and decoding
///
/// The image is decoded once into RGBA pixels. The full-resolution pixels
/// back the zoom window; a copy scaled to fit the main window's image pane
/// is produced alongside it.

use iced::widget::image::Handle;
use image::imageops::FilterType;
use tracing::debug;

use crate::state::data::DisplayedImage;

/// Size of the main window's image pane
pub const PREVIEW_WIDTH: u32 = 700;
pub const PREVIEW_HEIGHT: u32 = 400;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image download failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("image server returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("image download returned an empty body")]
    EmptyBody,

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image decoding task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Download the picture at `url` and decode it for display
pub async fn fetch_image(http: &reqwest::Client, url: &str) -> Result<DisplayedImage, ImageError> {
    debug!(url, "downloading image");
    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ImageError::Status(response.status()));
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Err(ImageError::EmptyBody);
    }

    // Spawn blocking because decoding and resampling are CPU-intensive
    tokio::task::spawn_blocking(move || decode(&bytes)).await?
}

/// Decode raw image bytes into a full-resolution bitmap plus a pane-sized preview
pub fn decode(bytes: &[u8]) -> Result<DisplayedImage, ImageError> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = (img.width(), img.height());

    let (preview_width, preview_height) = fit_within(width, height, PREVIEW_WIDTH, PREVIEW_HEIGHT);
    let preview = if (preview_width, preview_height) == (width, height) {
        img.to_rgba8()
    } else {
        img.resize_exact(preview_width, preview_height, FilterType::Lanczos3).to_rgba8()
    };

    debug!(width, height, preview_width, preview_height, "decoded image");

    Ok(DisplayedImage {
        preview: Handle::from_rgba(preview_width, preview_height, preview.into_raw()),
        preview_width,
        preview_height,
        full: Handle::from_rgba(width, height, img.to_rgba8().into_raw()),
        width,
        height,
    })
}

/// Largest size with the same aspect ratio that fits in `max_width` x `max_height`.
///
/// Images that already fit are left at their own size. Each side is at least one pixel.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return (width, height);
    }

    let scale = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );
    let fit = |side: u32| ((f64::from(side) * scale).round() as u32).max(1);
    (fit(width), fit(height))
}
