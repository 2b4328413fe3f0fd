// Library surface shared by the binary and the integration tests.
pub mod app;
pub mod app_dirs;
pub mod challenge;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod levels;
pub mod metrics;
pub mod quotes;
pub mod report;
pub mod runtime;
pub mod session;
pub mod streak;
pub mod ui;
pub mod util;
pub mod word_generator;
