//! smalens TUI: pick a category and stock, chart its close with 50/200-day SMAs.

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::Theme;
