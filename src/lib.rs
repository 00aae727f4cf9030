pub mod app;
pub mod command;
pub mod config;
pub mod engine;
pub mod event;
pub mod format;
pub mod metrics;
pub mod ui;
pub mod view;
