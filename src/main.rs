use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, scrollable, text, Canvas, Image};
use iced::{font, window, Background, Color, Element, Font, Length, Size, Subscription, Task, Theme};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod error;
mod feed;
mod imagery;
mod pipeline;
mod state;
mod translate;
mod ui;

use config::Config;
use error::AppError;
use feed::SearchCursor;
use pipeline::Services;
use state::data::LoadResult;
use state::viewer::{ImagePane, Viewer};
use ui::zoom::{ZoomCanvas, ZoomEvent, ZoomWindow};

const MAIN_TITLE: &str = "Astronomy Picture of the Day";
const ZOOM_TITLE: &str = "Full-size image";

/// Main application state
struct ApodViewer {
    /// Clients shared with background loads
    services: Services,
    /// What the main window shows
    viewer: Viewer,
    main_window: window::Id,
    /// Open full-size windows, each with its own zoom
    zoom_windows: HashMap<window::Id, ZoomWindow>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    WindowOpened(window::Id),
    WindowClosed(window::Id),
    /// User clicked "Load picture of the day"
    LoadToday,
    /// User clicked "Next space image"
    NextImage,
    /// Background load completed
    Loaded(LoadResult),
    /// User clicked "View full size"
    ViewFullSize,
    Zoom(window::Id, ZoomEvent),
}

impl ApodViewer {
    /// Create the application and open the main window
    fn new(services: Services, cursor: SearchCursor) -> (Self, Task<Message>) {
        let (main_window, open) = window::open(window::Settings {
            size: Size::new(800.0, 600.0),
            min_size: Some(Size::new(640.0, 480.0)),
            position: window::Position::Centered,
            ..window::Settings::default()
        });

        (
            ApodViewer {
                services,
                viewer: Viewer::new(cursor),
                main_window,
                zoom_windows: HashMap::new(),
            },
            open.map(Message::WindowOpened),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LoadToday | Message::NextImage => {
                let Some(cursor) = self.viewer.begin_load() else {
                    return Task::none();
                };
                info!(from = %cursor.date(), "searching for a space image");

                Task::perform(
                    pipeline::load_space_image(self.services.clone(), cursor),
                    Message::Loaded,
                )
            }
            Message::Loaded(result) => {
                self.viewer.apply(result);
                debug!(phase = ?self.viewer.phase(), next = %self.viewer.cursor().date(), "load finished");
                Task::none()
            }
            Message::ViewFullSize => {
                if !self.viewer.can_zoom() {
                    return Task::none();
                }
                let Some(image) = self.viewer.displayed_image().cloned() else {
                    return Task::none();
                };

                let (id, open) = window::open(window::Settings {
                    size: Size::new(800.0, 600.0),
                    ..window::Settings::default()
                });
                info!(width = image.width, height = image.height, "opening full-size window");
                self.zoom_windows.insert(id, ZoomWindow::new(image));
                open.map(Message::WindowOpened)
            }
            Message::Zoom(id, event) => {
                if let Some(zoom_window) = self.zoom_windows.get_mut(&id) {
                    zoom_window.zoom.apply(event);
                }
                Task::none()
            }
            Message::WindowOpened(id) => {
                debug!(?id, "window opened");
                Task::none()
            }
            Message::WindowClosed(id) => {
                if id == self.main_window {
                    info!("main window closed, exiting");
                    return iced::exit();
                }
                self.zoom_windows.remove(&id);
                Task::none()
            }
        }
    }

    fn view(&self, id: window::Id) -> Element<'_, Message> {
        match self.zoom_windows.get(&id) {
            Some(zoom_window) => self.view_zoom(id, zoom_window),
            None => self.view_main(),
        }
    }

    /// Build the main window
    fn view_main(&self) -> Element<'_, Message> {
        let loading = self.viewer.is_loading();

        let title = container(
            text(&self.viewer.title)
                .size(24)
                .font(Font {
                    weight: font::Weight::Bold,
                    ..Font::DEFAULT
                }),
        )
        .center_x(Length::Fill);

        let caption = if loading {
            "Searching for a space image...".to_string()
        } else {
            self.viewer.caption.clone().unwrap_or_default()
        };
        let caption = container(text(caption).size(13)).center_x(Length::Fill);

        let pane: Element<'_, Message> = match &self.viewer.image {
            ImagePane::Shown(image) => Image::<Handle>::new(image.preview.clone()).into(),
            ImagePane::Unavailable(reason) => text(format!("Picture unavailable: {reason}")).size(14).into(),
            ImagePane::Blank => text("").into(),
        };
        let pane = container(pane)
            .center_x(Length::Fill)
            .center_y(Length::Fixed(imagery::PREVIEW_HEIGHT as f32));

        let description = container(scrollable(text(&self.viewer.description).size(14)).height(Length::Fill))
            .padding(10)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(description_style);

        let buttons = row![
            button("Load picture of the day")
                .on_press_maybe((!loading).then_some(Message::LoadToday))
                .padding(10),
            button("Next space image")
                .on_press_maybe((!loading).then_some(Message::NextImage))
                .padding(10),
            button("View full size")
                .on_press_maybe(self.viewer.can_zoom().then_some(Message::ViewFullSize))
                .padding(10),
        ]
        .spacing(10);

        column![title, caption, pane, description, container(buttons).center_x(Length::Fill)]
            .spacing(10)
            .padding(20)
            .into()
    }

    /// Build a full-size window
    fn view_zoom<'a>(&'a self, id: window::Id, zoom_window: &'a ZoomWindow) -> Element<'a, Message> {
        let canvas = Canvas::new(ZoomCanvas {
            window: id,
            image: &zoom_window.image,
            zoom: zoom_window.zoom,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let status = text(format!(
            "{} x {} · {:.0}% · scroll to zoom, drag to pan",
            zoom_window.image.width,
            zoom_window.image.height,
            zoom_window.zoom.scale * 100.0
        ))
        .size(12);

        column![canvas, container(status).padding(4)].into()
    }

    fn title(&self, id: window::Id) -> String {
        if self.zoom_windows.contains_key(&id) {
            ZOOM_TITLE.to_string()
        } else {
            MAIN_TITLE.to_string()
        }
    }

    /// Dark grey background with purple accents
    fn theme(&self, _id: window::Id) -> Theme {
        Theme::custom(
            "Observatory".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb8(30, 30, 30),
                text: Color::WHITE,
                primary: Color::from_rgb8(138, 43, 226),
                success: Color::from_rgb8(46, 160, 67),
                danger: Color::from_rgb8(200, 60, 60),
            },
        )
    }

    fn subscription(&self) -> Subscription<Message> {
        window::close_events().map(Message::WindowClosed)
    }
}

fn description_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::from_rgb8(0x33, 0x33, 0x33))),
        text_color: Some(Color::WHITE),
        ..container::Style::default()
    }
}

fn main() -> Result<(), AppError> {
    let env_error = config::load_dotenv();
    let config = Config::load();
    init_tracing();
    if let Some(err) = env_error {
        warn!(error = %err, "could not read .env file");
    }
    config.validate()?;

    let services = Services::from_config(&config)?;
    let cursor = config.initial_cursor();
    info!(
        start = %cursor.date(),
        max_lookback_days = config.max_lookback_days,
        translate = !config.no_translate,
        "starting viewer"
    );

    iced::daemon(ApodViewer::title, ApodViewer::update, ApodViewer::view)
        .theme(ApodViewer::theme)
        .subscription(ApodViewer::subscription)
        .run_with(move || ApodViewer::new(services, cursor))?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}
