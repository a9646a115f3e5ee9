// Quiz engine: problem data, answer evaluation, session state machine and
// progress persistence. The binary in main.rs is a thin line-based front end.

rust_i18n::i18n!("locales", fallback = "ja");

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod quiz;
pub mod session;
pub mod source;
pub mod store;
