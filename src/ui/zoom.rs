use cgmath::Vector2;
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program};
use iced::{window, Point, Rectangle, Renderer, Size, Theme};

use crate::state::data::DisplayedImage;
use crate::Message;

/// Scale change per wheel tick
pub const ZOOM_STEP: f32 = 1.15;
/// Scale limits (1.0 = 100%)
pub const MIN_SCALE: f32 = 0.05;
pub const MAX_SCALE: f32 = 40.0;
/// Touchpad scroll distance that counts as one wheel tick
pub const PIXELS_PER_TICK: f32 = 50.0;

/// Direction of one wheel tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Interaction reported by the zoom canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomEvent {
    /// One wheel tick with the pointer at `anchor` (canvas coordinates)
    Wheel { anchor: Point, direction: ZoomDirection },
    /// Drag by a screen-space delta
    Pan(Vector2<f32>),
}

/// Affine view transform: screen = offset + scale * image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    /// Zoom level (1.0 = 100%)
    pub scale: f32,
    /// Screen position of the image's top-left corner
    pub offset: Vector2<f32>,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vector2::new(0.0, 0.0),
        }
    }
}

impl ZoomState {
    pub fn apply(&mut self, event: ZoomEvent) {
        match event {
            ZoomEvent::Wheel { anchor, direction } => self.wheel(anchor, direction),
            ZoomEvent::Pan(delta) => self.pan(delta),
        }
    }

    /// One wheel tick anchored at `anchor`
    pub fn wheel(&mut self, anchor: Point, direction: ZoomDirection) {
        let factor = match direction {
            ZoomDirection::In => ZOOM_STEP,
            ZoomDirection::Out => ZOOM_STEP.recip(),
        };
        self.zoom_at(Vector2::new(anchor.x, anchor.y), factor);
    }

    /// Multiply the scale by `factor`, keeping the image point under `anchor` in place
    pub fn zoom_at(&mut self, anchor: Vector2<f32>, factor: f32) {
        let scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let applied = scale / self.scale;
        self.offset = anchor - (anchor - self.offset) * applied;
        self.scale = scale;
    }

    pub fn pan(&mut self, delta: Vector2<f32>) {
        self.offset += delta;
    }

    /// Where an image of the given size lands on screen
    pub fn image_bounds(&self, width: u32, height: u32) -> Rectangle {
        Rectangle::new(
            Point::new(self.offset.x, self.offset.y),
            Size::new(width as f32 * self.scale, height as f32 * self.scale),
        )
    }
}

/// A full-size picture window
#[derive(Debug, Clone)]
pub struct ZoomWindow {
    pub image: DisplayedImage,
    pub zoom: ZoomState,
}

impl ZoomWindow {
    pub fn new(image: DisplayedImage) -> Self {
        Self {
            image,
            zoom: ZoomState::default(),
        }
    }
}

/// Canvas that draws the picture with the current transform and reports
/// wheel and drag input
pub struct ZoomCanvas<'a> {
    pub window: window::Id,
    pub image: &'a DisplayedImage,
    pub zoom: ZoomState,
}

impl Program<Message> for ZoomCanvas<'_> {
    type State = PointerState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.draw_image(
            self.zoom.image_bounds(self.image.width, self.image.height),
            canvas::Image::new(self.image.full.clone()),
        );
        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Mouse wheel for zooming: one step per line event, touchpad pixels accumulate
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if let Some(anchor) = cursor.position_in(bounds) {
                    let direction = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => tick_direction(y),
                        mouse::ScrollDelta::Pixels { y, .. } => state.accumulate_pixels(y),
                    };
                    if let Some(direction) = direction {
                        let event = ZoomEvent::Wheel { anchor, direction };
                        return (canvas::event::Status::Captured, Some(Message::Zoom(self.window, event)));
                    }
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse button press - start dragging
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_over(bounds) {
                    state.is_dragging = true;
                    state.last_position = Some(pos);
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse button release - stop dragging
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.is_dragging {
                    state.is_dragging = false;
                    state.last_position = None;
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse move - pan if dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if let (true, Some(last)) = (state.is_dragging, state.last_position) {
                    let delta = Vector2::new(position.x - last.x, position.y - last.y);
                    state.last_position = Some(position);
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::Zoom(self.window, ZoomEvent::Pan(delta))),
                    );
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(&self, state: &Self::State, bounds: Rectangle, cursor: Cursor) -> mouse::Interaction {
        if state.is_dragging {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Direction of a line-based wheel event; zero means no tick
fn tick_direction(y: f32) -> Option<ZoomDirection> {
    if y > 0.0 {
        Some(ZoomDirection::In)
    } else if y < 0.0 {
        Some(ZoomDirection::Out)
    } else {
        None
    }
}

/// State for drag and touchpad-scroll interactions
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    pub is_dragging: bool,
    pub last_position: Option<Point>,
    /// Pixel scroll not yet turned into a tick
    pub pending_scroll: f32,
}

impl PointerState {
    /// Add touchpad scroll; yields a tick once `PIXELS_PER_TICK` has built up
    fn accumulate_pixels(&mut self, y: f32) -> Option<ZoomDirection> {
        // A reversal starts a fresh gesture
        if self.pending_scroll * y < 0.0 {
            self.pending_scroll = 0.0;
        }
        self.pending_scroll += y;

        if self.pending_scroll.abs() < PIXELS_PER_TICK {
            return None;
        }
        let direction = tick_direction(self.pending_scroll);
        self.pending_scroll -= PIXELS_PER_TICK.copysign(self.pending_scroll);
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use iced::widget::image::Handle;

    const EPSILON: f32 = 1e-4;

    /// Image coordinates of a screen point
    fn to_image(zoom: &ZoomState, screen: Vector2<f32>) -> Vector2<f32> {
        (screen - zoom.offset) / zoom.scale
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPSILON * a.abs().max(1.0)
    }

    #[test]
    fn test_repeated_ticks_compound() {
        let mut zoom = ZoomState::default();
        for _ in 0..5 {
            zoom.wheel(Point::ORIGIN, ZoomDirection::In);
        }
        assert!(close(zoom.scale, ZOOM_STEP.powi(5)));

        let mut zoom = ZoomState { scale: 2.0, ..ZoomState::default() };
        for _ in 0..3 {
            zoom.wheel(Point::ORIGIN, ZoomDirection::Out);
        }
        assert!(close(zoom.scale, 2.0 * ZOOM_STEP.powi(-3)));
    }

    #[test]
    fn test_alternating_ticks_return_to_start() {
        let mut zoom = ZoomState::default();
        let anchor = Point::new(120.0, 80.0);
        for _ in 0..6 {
            zoom.wheel(anchor, ZoomDirection::In);
            zoom.wheel(anchor, ZoomDirection::Out);
        }
        assert!(close(zoom.scale, 1.0));
        assert!(close(zoom.offset.x, 0.0) && close(zoom.offset.y, 0.0));
    }

    #[test]
    fn test_point_under_cursor_stays_fixed() {
        let mut zoom = ZoomState {
            scale: 1.3,
            offset: Vector2::new(-40.0, 25.0),
        };
        let anchor = Vector2::new(310.0, 205.0);
        let before = to_image(&zoom, anchor);

        zoom.wheel(Point::new(anchor.x, anchor.y), ZoomDirection::In);
        let after = to_image(&zoom, anchor);

        assert!(close(before.x, after.x) && close(before.y, after.y));
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut zoom = ZoomState::default();
        for _ in 0..200 {
            zoom.wheel(Point::new(10.0, 10.0), ZoomDirection::In);
        }
        assert!(close(zoom.scale, MAX_SCALE));

        for _ in 0..400 {
            zoom.wheel(Point::new(10.0, 10.0), ZoomDirection::Out);
        }
        assert!(close(zoom.scale, MIN_SCALE));
        assert!(zoom.offset.x.is_finite() && zoom.offset.y.is_finite());
    }

    #[test]
    fn test_clamped_tick_does_not_move_image() {
        let mut zoom = ZoomState {
            scale: MAX_SCALE,
            offset: Vector2::new(5.0, 6.0),
        };
        zoom.wheel(Point::new(100.0, 100.0), ZoomDirection::In);
        assert_eq!(zoom.offset, Vector2::new(5.0, 6.0));
    }

    #[test]
    fn test_pan_moves_bounds() {
        let mut zoom = ZoomState::default();
        zoom.apply(ZoomEvent::Pan(Vector2::new(15.0, -5.0)));
        zoom.apply(ZoomEvent::Wheel {
            anchor: Point::new(15.0, -5.0),
            direction: ZoomDirection::In,
        });

        let bounds = zoom.image_bounds(200, 100);
        assert!(close(bounds.x, 15.0) && close(bounds.y, -5.0));
        assert!(close(bounds.width, 200.0 * ZOOM_STEP));
        assert!(close(bounds.height, 100.0 * ZOOM_STEP));
    }

    fn pixel() -> DisplayedImage {
        DisplayedImage {
            preview: Handle::from_rgba(1, 1, vec![0, 0, 0, 255]),
            preview_width: 1,
            preview_height: 1,
            full: Handle::from_rgba(1, 1, vec![0, 0, 0, 255]),
            width: 1,
            height: 1,
        }
    }

    fn bounds() -> Rectangle {
        Rectangle::new(Point::ORIGIN, Size::new(400.0, 300.0))
    }

    fn wheel(y: f32) -> canvas::Event {
        canvas::Event::Mouse(mouse::Event::WheelScrolled {
            delta: mouse::ScrollDelta::Lines { x: 0.0, y },
        })
    }

    fn touchpad(y: f32) -> canvas::Event {
        canvas::Event::Mouse(mouse::Event::WheelScrolled {
            delta: mouse::ScrollDelta::Pixels { x: 0.0, y },
        })
    }

    fn wheel_direction(message: Option<Message>) -> Option<ZoomDirection> {
        match message {
            Some(Message::Zoom(_, ZoomEvent::Wheel { direction, .. })) => Some(direction),
            _ => None,
        }
    }

    #[test]
    fn test_wheel_events_map_to_zoom_direction() {
        let image = pixel();
        let canvas = ZoomCanvas {
            window: window::Id::unique(),
            image: &image,
            zoom: ZoomState::default(),
        };
        let mut state = PointerState::default();
        let cursor = Cursor::Available(Point::new(50.0, 40.0));

        let (status, message) = canvas.update(&mut state, wheel(1.0), bounds(), cursor);
        assert_eq!(status, canvas::event::Status::Captured);
        match message {
            Some(Message::Zoom(id, ZoomEvent::Wheel { anchor, direction })) => {
                assert_eq!(id, canvas.window);
                assert_eq!(anchor, Point::new(50.0, 40.0));
                assert_eq!(direction, ZoomDirection::In);
            }
            other => panic!("expected a zoom-in message, got {other:?}"),
        }

        let (_, message) = canvas.update(&mut state, wheel(-1.0), bounds(), cursor);
        assert_eq!(wheel_direction(message), Some(ZoomDirection::Out));

        let (_, message) = canvas.update(&mut state, wheel(0.0), bounds(), cursor);
        assert!(message.is_none());
    }

    #[test]
    fn test_wheel_outside_canvas_is_ignored() {
        let image = pixel();
        let canvas = ZoomCanvas {
            window: window::Id::unique(),
            image: &image,
            zoom: ZoomState::default(),
        };
        let mut state = PointerState::default();

        let (status, message) = canvas.update(&mut state, wheel(1.0), bounds(), Cursor::Unavailable);
        assert_eq!(status, canvas::event::Status::Ignored);
        assert!(message.is_none());
    }

    #[test]
    fn test_touchpad_scroll_accumulates_into_ticks() {
        let image = pixel();
        let canvas = ZoomCanvas {
            window: window::Id::unique(),
            image: &image,
            zoom: ZoomState::default(),
        };
        let mut state = PointerState::default();
        let cursor = Cursor::Available(Point::new(10.0, 10.0));

        let mut ticks = Vec::new();
        for _ in 0..12 {
            let (_, message) = canvas.update(&mut state, touchpad(10.0), bounds(), cursor);
            ticks.extend(wheel_direction(message));
        }
        assert_eq!(ticks, vec![ZoomDirection::In, ZoomDirection::In]);

        // 20 px left over is dropped when the gesture reverses
        let (_, message) = canvas.update(&mut state, touchpad(-30.0), bounds(), cursor);
        assert!(message.is_none());
        let (_, message) = canvas.update(&mut state, touchpad(-20.0), bounds(), cursor);
        assert_eq!(wheel_direction(message), Some(ZoomDirection::Out));
    }

    #[test]
    fn test_drag_sends_pan_delta() {
        let image = pixel();
        let canvas = ZoomCanvas {
            window: window::Id::unique(),
            image: &image,
            zoom: ZoomState::default(),
        };
        let mut state = PointerState::default();
        let start = Point::new(100.0, 100.0);
        let press = canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left));
        let release = canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left));
        let moved = |position: Point| canvas::Event::Mouse(mouse::Event::CursorMoved { position });

        let (status, message) = canvas.update(&mut state, press, bounds(), Cursor::Available(start));
        assert_eq!(status, canvas::event::Status::Captured);
        assert!(message.is_none());
        assert!(state.is_dragging);

        let end = Point::new(130.0, 90.0);
        let (_, message) = canvas.update(&mut state, moved(end), bounds(), Cursor::Available(end));
        match message {
            Some(Message::Zoom(_, ZoomEvent::Pan(delta))) => assert_eq!(delta, Vector2::new(30.0, -10.0)),
            other => panic!("expected a pan message, got {other:?}"),
        }

        let (_, message) = canvas.update(&mut state, release, bounds(), Cursor::Available(end));
        assert!(message.is_none());
        assert!(!state.is_dragging);

        let after = Point::new(200.0, 200.0);
        let (status, message) = canvas.update(&mut state, moved(after), bounds(), Cursor::Available(after));
        assert_eq!(status, canvas::event::Status::Ignored);
        assert!(message.is_none());
    }
}
