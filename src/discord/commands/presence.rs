// This module handles bot presence.
//
// Discord-layer glue only: we set what the bot shows under its name so users
// know it can be messaged and which prefix to use.

use poise::serenity_prelude as serenity;

/// Status text shown under the bot's name.
pub fn status_text(prefix: &str) -> String {
    format!("for DMs | {}help", prefix)
}

/// Show that the bot is waiting for modmail.
pub fn reset_status(ctx: &serenity::Context, prefix: &str) {
    let activity = serenity::ActivityData::watching(status_text(prefix));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}

/// Called once the bot is ready so the default presence is set in one place.
pub fn on_ready(ctx: &serenity::Context, prefix: &str) {
    reset_status(ctx, prefix);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mentions_help_with_prefix() {
        assert_eq!(status_text("?"), "for DMs | ?help");
    }
}
