//! Shared helpers for command handlers.

use chrono::NaiveDateTime;
use owo_colors::OwoColorize;

use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Rough age of a server timestamp (`YYYY-MM-DD HH:MM:SS`).
pub fn format_age(submitted_at: &str) -> Option<String> {
    let then = NaiveDateTime::parse_from_str(submitted_at, "%Y-%m-%d %H:%M:%S").ok()?;
    let delta = chrono::Local::now().naive_local() - then;

    let text = if delta.num_minutes() < 1 {
        "just now".to_owned()
    } else if delta.num_hours() < 1 {
        format!("{}m ago", delta.num_minutes())
    } else if delta.num_days() < 1 {
        format!("{}h ago", delta.num_hours())
    } else if delta.num_days() < 365 {
        format!("{}d ago", delta.num_days())
    } else {
        format!("{}y ago", delta.num_days() / 365)
    };
    Some(text)
}

/// A tag name, painted in its badge color when color is on.
pub fn badge(name: &str, color: &str, colored: bool) -> String {
    match (colored, output::parse_hex_color(color)) {
        (true, Some((r, g, b))) => name.truecolor(r, g, b).to_string(),
        _ => name.to_owned(),
    }
}

/// Shorten an opaque id for table display.
pub fn short_id(id: &str) -> String {
    if id.len() > 12 {
        format!("{}…", &id[..12])
    } else {
        id.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_long_digests() {
        let id = "0123456789abcdef0123456789abcdef";
        assert_eq!(short_id(id), "0123456789ab…");
        assert_eq!(short_id("short"), "short");
    }

    #[test]
    fn format_age_rejects_garbage() {
        assert!(format_age("not a date").is_none());
    }

    #[test]
    fn badge_is_plain_without_color() {
        assert_eq!(badge("lab", "#228BE6", false), "lab");
        assert_eq!(badge("lab", "garbage", true), "lab");
    }
}
