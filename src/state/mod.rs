/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures passed back from background loads (data.rs)
/// - The main window's load state machine (viewer.rs)

pub mod data;
pub mod viewer;
