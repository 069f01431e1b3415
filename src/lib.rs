//! Keyboard navigation and modal dialogs for the arbor session manager.
//!
//! [`nav`] holds the navigation primitives (cursor, viewport, focus ring,
//! enum cycle); [`modals`] composes them into the concrete dialogs; the
//! remaining modules are the terminal host that drives them.

pub mod app;
pub mod config;
pub mod logging;
pub mod modal_ui;
pub mod modals;
pub mod nav;
pub mod session;
pub mod text_input;
pub mod ui;
pub mod validators;
