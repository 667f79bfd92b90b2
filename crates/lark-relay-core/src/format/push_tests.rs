//! Tests for the push card.

use super::*;
use crate::card::{CardAction, CardElement};
use serde_json::json;

fn parse(value: serde_json::Value) -> PushEvent {
    serde_json::from_value(value).unwrap()
}

fn texts(card: &Card) -> Vec<&str> {
    card.elements.iter().filter_map(CardElement::text).collect()
}

fn button_urls(card: &Card) -> Vec<&str> {
    card.elements
        .iter()
        .filter_map(|element| match element {
            CardElement::Action { actions } => Some(actions),
            _ => None,
        })
        .flatten()
        .map(|action| match action {
            CardAction::Button { url, .. } => url.as_str(),
        })
        .collect()
}

fn commit(message: &str, author: &str, url: &str) -> serde_json::Value {
    json!({"message": message, "url": url, "author": {"name": author}})
}

#[test]
fn test_single_commit_card() {
    let event = parse(json!({
        "ref": "refs/heads/main",
        "repository": {"full_name": "octo/relay"},
        "pusher": {"name": "octocat"},
        "commits": [commit("feat: add card", "octocat", "https://github.com/octo/relay/commit/1")],
        "compare": "https://github.com/octo/relay/compare/a...b"
    }));

    let card = push_card(&event);

    assert_eq!(card.title(), "GitHub 项目更新通知");
    assert_eq!(card.header.template, HeaderTemplate::Blue);
    assert_eq!(
        texts(&card),
        vec![
            "📦 **仓库**: octo/relay",
            "🌿 **分支**: main",
            "👤 **提交者**: **@octocat**",
            "💬 **信息**: ✨ **特性** feat: add card",
            "💾 请及时拉取最新数据 git pull origin main",
        ]
    );
    assert_eq!(
        button_urls(&card),
        vec!["https://github.com/octo/relay/commit/1"]
    );
}

#[test]
fn test_multiple_commits_list_each_commit_and_link_compare() {
    let event = parse(json!({
        "ref": "refs/heads/dev",
        "repository": {"full_name": "octo/relay"},
        "pusher": {"name": "octocat"},
        "commits": [
            commit("fix: one", "alice", "u1"),
            commit("docs: two", "bob", "u2"),
            commit("chore: three", "alice", "u3"),
        ],
        "compare": "https://github.com/octo/relay/compare/a...b"
    }));

    let card = push_card(&event);

    assert_eq!(
        texts(&card),
        vec![
            "📦 **仓库**: octo/relay",
            "🌿 **分支**: dev",
            "👤 **提交者**: **@alice**, **@bob**",
            "✨ **总提交数**: 3",
            "  1. **@alice**: 🐛 **修复** fix: one",
            "  2. **@bob**: 📚 **文档** docs: two",
            "  3. **@alice**: 🔧 **杂项** chore: three",
            "💾 请及时拉取最新数据 git pull origin dev",
        ]
    );
    assert_eq!(
        button_urls(&card),
        vec!["https://github.com/octo/relay/compare/a...b"]
    );
}

#[test]
fn test_commit_list_is_capped() {
    let commits: Vec<_> = (1..=13)
        .map(|i| commit(&format!("change {}", i), "alice", "u"))
        .collect();
    let event = parse(json!({
        "ref": "refs/heads/main",
        "repository": {"full_name": "octo/relay"},
        "pusher": {"name": "alice"},
        "commits": commits
    }));

    let card = push_card(&event);
    let texts = texts(&card);

    assert!(texts.contains(&"✨ **总提交数**: 13"));
    assert!(texts.contains(&"  10. **@alice**: 📝 **其他** change 10"));
    assert!(!texts.iter().any(|t| t.contains("change 11")));
    assert!(texts.contains(&"  ... 还有3个提交"));
    assert!(button_urls(&card).is_empty(), "no compare URL, no button");
}

#[test]
fn test_multiple_commits_without_author_names() {
    let event = parse(json!({
        "ref": "refs/heads/main",
        "repository": {"full_name": "octo/relay"},
        "pusher": {"name": "alice"},
        "commits": [{"message": "a"}, {"message": "b"}]
    }));

    let card = push_card(&event);

    assert!(texts(&card).contains(&"👤 **提交者**: 未知提交者"));
}

#[test]
fn test_branch_creation_without_commits_uses_head_commit() {
    let event = parse(json!({
        "ref": "refs/heads/feature",
        "repository": {"full_name": "octo/relay"},
        "pusher": {"name": "octocat"},
        "commits": [],
        "head_commit": {
            "message": "Initial work",
            "url": "https://github.com/octo/relay/commit/9",
            "author": {"name": "hubot"}
        }
    }));

    let card = push_card(&event);

    assert!(texts(&card).contains(&"👤 **提交者**: hubot"));
    assert!(texts(&card).contains(&"💬 **信息**: Initial work"));
    assert_eq!(
        button_urls(&card),
        vec!["https://github.com/octo/relay/commit/9"]
    );
}

#[test]
fn test_branch_deletion_without_head_commit_links_compare() {
    let event = parse(json!({
        "ref": "refs/heads/old",
        "repository": {"full_name": "octo/relay"},
        "pusher": {"name": "octocat"},
        "commits": [],
        "head_commit": null,
        "compare": "https://github.com/octo/relay/compare/x...y"
    }));

    let card = push_card(&event);

    assert!(texts(&card).contains(&"👤 **提交者**: octocat"));
    assert!(texts(&card).contains(&"💬 **信息**: 无具体代码变更 (例如：分支创建/删除)"));
    assert_eq!(
        button_urls(&card),
        vec!["https://github.com/octo/relay/compare/x...y"]
    );
}

#[test]
fn test_missing_pusher_name_and_urls_fall_back() {
    let event = parse(json!({
        "repository": {"full_name": "octo/relay"},
        "pusher": {}
    }));

    let card = push_card(&event);

    assert!(texts(&card).contains(&"🌿 **分支**: 未知分支"));
    assert!(texts(&card).contains(&"👤 **提交者**: 未知推送者"));
    assert_eq!(button_urls(&card), vec!["#"]);
}

mod branch_name_tests {
    use super::*;

    #[test]
    fn test_heads_prefix_is_stripped() {
        assert_eq!(branch_name(Some("refs/heads/main")), "main");
        assert_eq!(branch_name(Some("refs/heads/feature/login")), "feature/login");
    }

    #[test]
    fn test_tags_prefix_is_stripped() {
        assert_eq!(branch_name(Some("refs/tags/v1.2.0")), "v1.2.0");
    }

    #[test]
    fn test_other_refs_keep_last_segment() {
        assert_eq!(branch_name(Some("refs/remotes/origin/main")), "main");
        assert_eq!(branch_name(Some("main")), "main");
    }

    #[test]
    fn test_missing_ref() {
        assert_eq!(branch_name(None), "未知分支");
        assert_eq!(branch_name(Some("")), "未知分支");
    }
}
