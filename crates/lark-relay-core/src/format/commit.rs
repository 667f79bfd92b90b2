//! Conventional Commits classification for push cards.

use crate::webhook::events::Commit;
use regex::Regex;
use std::sync::LazyLock;

/// Shown when a commit has no message
pub const NO_MESSAGE: &str = "无提交信息";

/// Shown when a commit has no author name
pub const UNKNOWN_AUTHOR: &str = "未知作者";

static CONVENTIONAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(\([^)]*\))?!?:\s").expect("conventional commit pattern is valid")
});

/// Commit categories, keyed by Conventional Commits type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Test,
    Chore,
    Perf,
    Ci,
    Build,
    Revert,
    Merge,
    Other,
}

impl CommitKind {
    /// Classify the first line of a commit message.
    pub fn classify(first_line: &str) -> Self {
        let lowered = first_line.to_lowercase();

        if let Some(captures) = CONVENTIONAL_PREFIX.captures(&lowered) {
            return match &captures[1] {
                "feat" => Self::Feat,
                "fix" => Self::Fix,
                "docs" => Self::Docs,
                "style" => Self::Style,
                "refactor" => Self::Refactor,
                "test" => Self::Test,
                "chore" => Self::Chore,
                "perf" => Self::Perf,
                "ci" => Self::Ci,
                "build" => Self::Build,
                "revert" => Self::Revert,
                _ => Self::Other,
            };
        }

        if lowered.starts_with("merge") {
            Self::Merge
        } else {
            Self::Other
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Feat => "✨",
            Self::Fix => "🐛",
            Self::Docs => "📚",
            Self::Style => "💅",
            Self::Refactor => "♻️",
            Self::Test => "🧪",
            Self::Chore => "🔧",
            Self::Perf => "⚡",
            Self::Ci => "🚀",
            Self::Build => "📦",
            Self::Revert => "⏪",
            Self::Merge => "🔀",
            Self::Other => "📝",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Feat => "特性",
            Self::Fix => "修复",
            Self::Docs => "文档",
            Self::Style => "样式",
            Self::Refactor => "重构",
            Self::Test => "测试",
            Self::Chore => "杂项",
            Self::Perf => "性能",
            Self::Ci => "CI",
            Self::Build => "构建",
            Self::Revert => "回滚",
            Self::Merge => "合并",
            Self::Other => "其他",
        }
    }
}

/// A commit rendered for a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitLine {
    /// `"{icon} **{label}** {first line}"`
    pub line: String,

    /// `"**@{name}**"`, or [`UNKNOWN_AUTHOR`]
    pub author: String,
}

/// Render a commit's first line and author for display.
pub fn describe_commit(commit: &Commit) -> CommitLine {
    let first_line = commit
        .message
        .as_deref()
        .map(|m| m.lines().next().unwrap_or_default())
        .unwrap_or(NO_MESSAGE);

    let kind = CommitKind::classify(first_line);

    CommitLine {
        line: format!("{} **{}** {}", kind.icon(), kind.label(), first_line),
        author: author_display(commit.author_name()),
    }
}

/// Bold `@name` mention, or the unknown-author placeholder
pub fn author_display(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("**@{}**", name),
        None => UNKNOWN_AUTHOR.to_string(),
    }
}

#[cfg(test)]
#[path = "commit_tests.rs"]
mod tests;
