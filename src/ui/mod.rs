/// Widgets that need their own event handling
pub mod zoom;
