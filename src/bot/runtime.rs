//! Bot runtime.

use teloxide::prelude::*;
use tracing::info;

use super::dispatcher::ThrottledBot;

/// Run the dispatcher with long polling until Ctrl-C.
pub async fn run(
    mut dispatcher: Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>,
) {
    info!("Starting bot in polling mode...");
    dispatcher.dispatch().await;
    info!("Dispatcher stopped");
}
