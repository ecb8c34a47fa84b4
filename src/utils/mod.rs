//! Utility functions.
//!
//! Small formatting and argument helpers used by commands.

use std::time::Duration;

/// Escape text for Telegram's HTML parse mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Format a cooldown for display, e.g. `2.50s`.
pub fn format_retry_after(retry_after: Duration) -> String {
    format!("{:.2}s", retry_after.as_secs_f64())
}

/// Format an uptime-style duration, e.g. `1d 4h`, `12m 5s`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Parse a user or chat id argument.
pub fn parse_snowflake(arg: &str) -> Option<i64> {
    arg.trim().parse::<i64>().ok().filter(|&id| id != 0)
}

/// Parse an on/off style switch.
pub fn parse_switch(arg: &str) -> Option<bool> {
    match arg.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "enable" | "1" => Some(true),
        "off" | "false" | "no" | "disable" | "0" => Some(false),
        _ => None,
    }
}
