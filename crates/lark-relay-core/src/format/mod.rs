//! # Card Formatters
//!
//! Pure functions mapping typed GitHub events onto Feishu cards. Card copy is
//! written in Chinese for the Feishu groups the relay posts into.

pub mod commit;
pub mod issues;
pub mod pull_request;
pub mod push;
pub mod release;

pub use issues::issues_card;
pub use pull_request::pull_request_card;
pub use push::push_card;
pub use release::release_card;

use crate::card::truncate;

/// Character limit for issue and pull request descriptions
pub const DESCRIPTION_LIMIT: usize = 200;

/// Character limit for release notes
pub const RELEASE_NOTES_LIMIT: usize = 300;

/// Body text, or `placeholder` when the body is missing or empty, cut to `limit`.
pub(crate) fn body_excerpt(body: Option<&str>, placeholder: &str, limit: usize) -> String {
    match body.filter(|b| !b.is_empty()) {
        Some(body) => truncate(body, limit),
        None => placeholder.to_string(),
    }
}
