//! # Feishu Interactive Cards
//!
//! Typed model of the subset of the Feishu message-card schema the relay
//! emits, plus the `interactive` message envelope posted to a custom bot.
//!
//! Serialisation produces exactly the JSON Feishu expects, e.g. a divider is
//! `{"tag": "hr"}` and a Markdown block is
//! `{"tag": "div", "text": {"tag": "lark_md", "content": "..."}}`.

use serde::{Deserialize, Serialize};

pub mod sign;

pub use sign::FeishuSigner;

/// Suffix appended to truncated text
pub const ELLIPSIS: &str = "...";

// ============================================================================
// Card model
// ============================================================================

/// A complete message card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub config: CardConfig,
    pub header: CardHeader,
    pub elements: Vec<CardElement>,
}

impl Card {
    /// Start a card with the given title and header colour
    pub fn new(title: impl Into<String>, template: HeaderTemplate) -> Self {
        Self {
            config: CardConfig::default(),
            header: CardHeader {
                title: CardText::plain(title),
                template,
            },
            elements: Vec::new(),
        }
    }

    /// Append a Markdown block
    pub fn markdown(mut self, content: impl Into<String>) -> Self {
        self.elements.push(CardElement::Div {
            text: CardText::markdown(content),
        });
        self
    }

    /// Append a horizontal rule
    pub fn divider(mut self) -> Self {
        self.elements.push(CardElement::Hr);
        self
    }

    /// Append a row holding a single link button
    pub fn button(
        mut self,
        label: impl Into<String>,
        kind: ButtonKind,
        url: impl Into<String>,
    ) -> Self {
        self.elements.push(CardElement::Action {
            actions: vec![CardAction::Button {
                text: CardText::plain(label),
                kind,
                url: url.into(),
            }],
        });
        self
    }

    /// Title shown in the card header
    pub fn title(&self) -> &str {
        self.header.title.content()
    }
}

/// Card-level rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    pub wide_screen_mode: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            wide_screen_mode: true,
        }
    }
}

/// Card header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardHeader {
    pub title: CardText,
    pub template: HeaderTemplate,
}

/// Header colour themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderTemplate {
    Blue,
    Green,
    Red,
    Orange,
    Purple,
}

/// Text node, either plain or in Feishu's Markdown dialect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum CardText {
    PlainText { content: String },
    LarkMd { content: String },
}

impl CardText {
    pub fn plain(content: impl Into<String>) -> Self {
        Self::PlainText {
            content: content.into(),
        }
    }

    pub fn markdown(content: impl Into<String>) -> Self {
        Self::LarkMd {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::PlainText { content } | Self::LarkMd { content } => content,
        }
    }
}

/// Top-level card body element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum CardElement {
    Div { text: CardText },
    Hr,
    Action { actions: Vec<CardAction> },
}

impl CardElement {
    /// Text of a `div` element
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Div { text } => Some(text.content()),
            _ => None,
        }
    }
}

/// Interactive component inside an `action` element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum CardAction {
    Button {
        text: CardText,
        #[serde(rename = "type")]
        kind: ButtonKind,
        url: String,
    },
}

/// Button styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    Default,
    Primary,
}

// ============================================================================
// Message envelope
// ============================================================================

/// Body posted to a Feishu custom bot webhook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeishuMessage {
    pub msg_type: &'static str,
    pub card: Card,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
}

impl FeishuMessage {
    /// Wrap a card in an unsigned `interactive` message
    pub fn interactive(card: Card) -> Self {
        Self {
            msg_type: "interactive",
            card,
            timestamp: None,
            sign: None,
        }
    }

    /// Attach a signature computed for `timestamp`
    pub fn signed(mut self, signer: &FeishuSigner, timestamp: i64) -> Self {
        self.sign = Some(signer.sign(timestamp));
        self.timestamp = Some(timestamp);
        self
    }
}

// ============================================================================
// Text helpers
// ============================================================================

/// Keep the first `limit` characters of `text`, appending [`ELLIPSIS`] only
/// when something was cut.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
