//! Card for `push` events.

use super::commit::{author_display, describe_commit};
use crate::card::{ButtonKind, Card, HeaderTemplate};
use crate::webhook::events::PushEvent;

/// Maximum number of commits listed individually on a card
pub const MAX_LISTED_COMMITS: usize = 10;

const TITLE: &str = "GitHub 项目更新通知";
const UNKNOWN_BRANCH: &str = "未知分支";
const UNKNOWN_PUSHER: &str = "未知推送者";
const UNKNOWN_COMMITTERS: &str = "未知提交者";
const NO_HEAD_COMMIT_MESSAGE: &str = "无提交信息 (可能为创建/删除分支)";
const NO_CHANGES_MESSAGE: &str = "无具体代码变更 (例如：分支创建/删除)";
const NO_URL: &str = "#";

/// Build the card announcing a push.
pub fn push_card(event: &PushEvent) -> Card {
    let branch = branch_name(event.git_ref.as_deref());
    let pusher = event
        .pusher
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_PUSHER);

    let card = Card::new(TITLE, HeaderTemplate::Blue)
        .markdown(format!("📦 **仓库**: {}", event.repository.full_name))
        .markdown(format!("🌿 **分支**: {}", branch));

    let card = match event.commits.as_slice() {
        [] => {
            let (message, url, committer) = match &event.head_commit {
                Some(head) => (
                    head.message
                        .clone()
                        .unwrap_or_else(|| NO_HEAD_COMMIT_MESSAGE.to_string()),
                    head.url.clone().unwrap_or_else(|| NO_URL.to_string()),
                    head.author_name().unwrap_or(pusher).to_string(),
                ),
                None => (
                    NO_CHANGES_MESSAGE.to_string(),
                    event.compare.clone().unwrap_or_else(|| NO_URL.to_string()),
                    pusher.to_string(),
                ),
            };
            single_change(card, &committer, &message, &url)
        }
        [commit] => {
            let described = describe_commit(commit);
            let url = commit.url.as_deref().unwrap_or(NO_URL);
            single_change(card, &described.author, &described.line, url)
        }
        commits => {
            let mut authors: Vec<&str> = Vec::new();
            for name in commits.iter().filter_map(|c| c.author_name()) {
                if !authors.contains(&name) {
                    authors.push(name);
                }
            }
            let committers = if authors.is_empty() {
                UNKNOWN_COMMITTERS.to_string()
            } else {
                authors
                    .iter()
                    .map(|&name| author_display(Some(name)))
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            let mut card = card
                .markdown(format!("👤 **提交者**: {}", committers))
                .markdown(format!("✨ **总提交数**: {}", commits.len()));

            for (index, commit) in commits.iter().take(MAX_LISTED_COMMITS).enumerate() {
                let described = describe_commit(commit);
                card = card.markdown(format!(
                    "  {}. {}: {}",
                    index + 1,
                    described.author,
                    described.line
                ));
            }

            if commits.len() > MAX_LISTED_COMMITS {
                card = card.markdown(format!(
                    "  ... 还有{}个提交",
                    commits.len() - MAX_LISTED_COMMITS
                ));
            }

            match event.compare.as_deref().filter(|url| !url.is_empty()) {
                Some(compare) => card.button("🔍 查看所有变更", ButtonKind::Default, compare),
                None => card,
            }
        }
    };

    card.markdown(format!("💾 请及时拉取最新数据 git pull origin {}", branch))
}

fn single_change(card: Card, committer: &str, message: &str, url: &str) -> Card {
    card.markdown(format!("👤 **提交者**: {}", committer))
        .markdown(format!("💬 **信息**: {}", message))
        .button("🔗 查看提交详情", ButtonKind::Default, url)
}

/// Short branch or tag name for a full git ref.
pub fn branch_name(git_ref: Option<&str>) -> &str {
    let Some(git_ref) = git_ref.filter(|r| !r.is_empty()) else {
        return UNKNOWN_BRANCH;
    };

    git_ref
        .strip_prefix("refs/heads/")
        .or_else(|| git_ref.strip_prefix("refs/tags/"))
        .unwrap_or_else(|| git_ref.rsplit('/').next().unwrap_or(git_ref))
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
