// Helpers for replying to users.
//
// Every command that reports success or failure goes through here, so the
// colours, headers and mention rules stay the same everywhere.

use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use rand::seq::SliceRandom;

pub const SUCCESS_COLOUR: serenity::Colour = serenity::Colour::new(0x2ECC71);
pub const FAILURE_COLOUR: serenity::Colour = serenity::Colour::new(0xE74C3C);

pub const SUCCESS_HEADERS: &[&str] = &[
    "You got it.",
    "Done.",
    "Affirmative.",
    "As you wish.",
    "Okay.",
    "Fine by me.",
    "There we go.",
    "Sure!",
    "Your wish is my command.",
];

pub const FAILURE_HEADERS: &[&str] = &[
    "Abort!",
    "FAIL.",
    "I cannot do that.",
    "I'm leaving you.",
    "Its not me, its you.",
    "Hold up!",
    "Mistakes were made.",
    "Nope.",
    "Not happening.",
    "Oops.",
    "Something went wrong.",
    "Sorry, no.",
    "This will never work.",
    "Uh. No.",
    "🤔",
    "That is not happening.",
    "Whups.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    General,
    Affirmative,
    Negatory,
}

/// Pick a random header, falling back to the first one.
pub fn pick_header(headers: &[&'static str]) -> &'static str {
    headers
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
}

/// Build the embed for a response. The response text becomes the description.
pub fn response_embed(
    response: &str,
    title: Option<&str>,
    colour: Option<serenity::Colour>,
) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new().description(response);
    if let Some(title) = title {
        embed = embed.title(title);
    }
    if let Some(colour) = colour {
        embed = embed.colour(colour);
    }
    embed
}

/// Send a response embed without pinging anybody.
pub async fn send_general_response(
    ctx: Context<'_>,
    response: &str,
    title: Option<&str>,
) -> Result<(), Error> {
    send_response(ctx, response, title, None, ResponseKind::General).await
}

/// Send a green response with a random affirmative header.
pub async fn send_positive_response(ctx: Context<'_>, response: &str) -> Result<(), Error> {
    send_response(
        ctx,
        response,
        Some(pick_header(SUCCESS_HEADERS)),
        Some(SUCCESS_COLOUR),
        ResponseKind::Affirmative,
    )
    .await
}

/// Send a red response with a random negatory header.
pub async fn send_negatory_response(ctx: Context<'_>, response: &str) -> Result<(), Error> {
    send_response(
        ctx,
        response,
        Some(pick_header(FAILURE_HEADERS)),
        Some(FAILURE_COLOUR),
        ResponseKind::Negatory,
    )
    .await
}

async fn send_response(
    ctx: Context<'_>,
    response: &str,
    title: Option<&str>,
    colour: Option<serenity::Colour>,
    kind: ResponseKind,
) -> Result<(), Error> {
    tracing::debug!(
        ?kind,
        channel_id = ctx.channel_id().get(),
        "Sending response: {}",
        response
    );

    let reply = poise::CreateReply::default()
        .embed(response_embed(response, title, colour))
        .allowed_mentions(serenity::CreateAllowedMentions::new());
    ctx.send(reply).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_come_from_the_given_list() {
        for _ in 0..20 {
            assert!(SUCCESS_HEADERS.contains(&pick_header(SUCCESS_HEADERS)));
            assert!(FAILURE_HEADERS.contains(&pick_header(FAILURE_HEADERS)));
        }
    }

    #[test]
    fn empty_header_list_falls_back_to_empty_title() {
        assert_eq!(pick_header(&[]), "");
    }

    #[test]
    fn success_and_failure_colours_differ() {
        assert_ne!(SUCCESS_COLOUR, FAILURE_COLOUR);
        assert_eq!(SUCCESS_COLOUR.0, 0x2ECC71);
    }
}
