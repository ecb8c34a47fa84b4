//! Bot module - Telegram adapter around the dispatch gate.

pub mod dispatcher;
pub mod platform;
mod runtime;

pub use dispatcher::{build_dispatcher, AppState};
pub use platform::TelegramPlatform;
pub use runtime::run;
