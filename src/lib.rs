pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod store;
pub mod ui;

// UI labels follow the active word-list language.
rust_i18n::i18n!("locales", fallback = "en");
