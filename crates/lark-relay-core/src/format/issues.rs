//! Card for `issues` events.

use super::{body_excerpt, DESCRIPTION_LIMIT};
use crate::card::{ButtonKind, Card, HeaderTemplate};
use crate::webhook::events::IssuesEvent;

/// Chinese label for an issue action; unknown actions pass through.
pub fn action_label(action: &str) -> &str {
    match action {
        "opened" => "创建",
        "closed" => "关闭",
        "reopened" => "重新打开",
        "assigned" => "分配",
        "unassigned" => "取消分配",
        other => other,
    }
}

/// Header colour for an issue action
pub fn action_template(action: &str) -> HeaderTemplate {
    match action {
        "opened" => HeaderTemplate::Green,
        "closed" => HeaderTemplate::Red,
        "reopened" => HeaderTemplate::Orange,
        _ => HeaderTemplate::Blue,
    }
}

/// Build the card announcing an issue change.
pub fn issues_card(event: &IssuesEvent) -> Card {
    let issue = &event.issue;

    Card::new(
        format!(
            "🐛 [{}] Issue {}",
            event.repository.full_name,
            action_label(&event.action)
        ),
        action_template(&event.action),
    )
    .markdown(format!(
        "**标题:** {}\n**操作人:** {}\n**Issue #:** {}",
        issue.title, event.sender.login, issue.number
    ))
    .markdown(format!(
        "**描述:** {}",
        body_excerpt(issue.body.as_deref(), "无描述", DESCRIPTION_LIMIT)
    ))
    .divider()
    .button("查看 Issue", ButtonKind::Primary, &issue.html_url)
}

#[cfg(test)]
#[path = "issues_tests.rs"]
mod tests;
