//! Card for `release` events. Only publication is announced.

use super::{body_excerpt, RELEASE_NOTES_LIMIT};
use crate::card::{ButtonKind, Card, HeaderTemplate};
use crate::webhook::events::ReleaseEvent;

/// Build the card for a published release; other actions yield `None`.
pub fn release_card(event: &ReleaseEvent) -> Option<Card> {
    if event.action != "published" {
        return None;
    }

    let release = &event.release;
    let name = release
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(release.tag_name.as_str());

    let card = Card::new(
        format!("🎉 [{}] 新版本发布", event.repository.full_name),
        HeaderTemplate::Purple,
    )
    .markdown(format!(
        "**版本:** {}\n**名称:** {}\n**发布人:** {}",
        release.tag_name, name, release.author.login
    ))
    .markdown(format!(
        "**发布说明:**\n{}",
        body_excerpt(release.body.as_deref(), "无发布说明", RELEASE_NOTES_LIMIT)
    ))
    .divider()
    .button("查看发布", ButtonKind::Primary, &release.html_url);

    Some(card)
}

#[cfg(test)]
#[path = "release_tests.rs"]
mod tests;
