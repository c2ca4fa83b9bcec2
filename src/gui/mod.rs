//! GUI module - User interface components

mod app;
mod tabs;
mod widgets;

pub use app::ExplorerApp;
pub use tabs::{Choices, Tab, TabAction};
