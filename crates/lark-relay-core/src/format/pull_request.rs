//! Card for `pull_request` events.

use super::{body_excerpt, DESCRIPTION_LIMIT};
use crate::card::{ButtonKind, Card, HeaderTemplate};
use crate::webhook::events::PullRequestEvent;

/// Chinese label for a pull request action; unknown actions pass through.
pub fn action_label(action: &str) -> &str {
    match action {
        "opened" => "创建",
        "closed" => "关闭",
        "merged" => "合并",
        "reopened" => "重新打开",
        "review_requested" => "请求审查",
        other => other,
    }
}

/// Header colour for a pull request action
pub fn action_template(action: &str) -> HeaderTemplate {
    match action {
        "opened" => HeaderTemplate::Green,
        "closed" => HeaderTemplate::Red,
        "merged" => HeaderTemplate::Purple,
        _ => HeaderTemplate::Blue,
    }
}

/// GitHub reports merges as `closed` with `merged: true`.
pub fn effective_action(event: &PullRequestEvent) -> &str {
    if event.action == "closed" && event.pull_request.merged == Some(true) {
        "merged"
    } else {
        &event.action
    }
}

/// Build the card announcing a pull request change.
pub fn pull_request_card(event: &PullRequestEvent) -> Card {
    let pr = &event.pull_request;
    let action = effective_action(event);

    Card::new(
        format!(
            "🔀 [{}] Pull Request {}",
            event.repository.full_name,
            action_label(action)
        ),
        action_template(action),
    )
    .markdown(format!(
        "**标题:** {}\n**操作人:** {}\n**PR #:** {}\n**分支:** {} → {}",
        pr.title, event.sender.login, pr.number, pr.head.name, pr.base.name
    ))
    .markdown(format!(
        "**描述:** {}",
        body_excerpt(pr.body.as_deref(), "无描述", DESCRIPTION_LIMIT)
    ))
    .divider()
    .button("查看 PR", ButtonKind::Primary, &pr.html_url)
}

#[cfg(test)]
#[path = "pull_request_tests.rs"]
mod tests;
