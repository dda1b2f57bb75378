mod app;
mod config;
mod form;
mod logging;
mod ui;

pub use app::run_app;
