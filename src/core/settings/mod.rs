//! The settings value object: a snapshot of every user-configurable field that drives
//! prompt construction. Tagged by `mode`; the tag decides which form a history record
//! restores into.

mod form;

pub use form::{QuestionForm, ReplyForm};

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Settings {
    Reply(ReplySettings),
    Question(QuestionSettings),
}

impl Settings {
    pub fn mode(&self) -> Mode {
        match self {
            Settings::Reply(_) => Mode::Reply,
            Settings::Question(_) => Mode::Question,
        }
    }

    pub fn selected_model(&self) -> &str {
        match self {
            Settings::Reply(s) => &s.selected_model,
            Settings::Question(s) => &s.selected_model,
        }
    }

    pub fn reference_urls(&self) -> &[String] {
        match self {
            Settings::Reply(s) => &s.reference_urls,
            Settings::Question(s) => &s.reference_urls,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Reply,
    Question,
}

impl Mode {
    /// Short label used in history listings.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Reply => "[Reply]",
            Mode::Question => "[Question]",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Reply => write!(f, "reply"),
            Mode::Question => write!(f, "question"),
        }
    }
}

/// Who the user is replying to. `Other` takes a free-text override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipChoice {
    #[default]
    Friend,
    Colleague,
    Boss,
    Client,
    Family,
    Partner,
    Other,
}

impl RelationshipChoice {
    pub const ALL: [RelationshipChoice; 7] = [
        RelationshipChoice::Friend,
        RelationshipChoice::Colleague,
        RelationshipChoice::Boss,
        RelationshipChoice::Client,
        RelationshipChoice::Family,
        RelationshipChoice::Partner,
        RelationshipChoice::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipChoice::Friend => "friend",
            RelationshipChoice::Colleague => "colleague",
            RelationshipChoice::Boss => "boss",
            RelationshipChoice::Client => "client",
            RelationshipChoice::Family => "family",
            RelationshipChoice::Partner => "partner",
            RelationshipChoice::Other => "other",
        }
    }

    /// Text that goes into the prompt for a fixed choice.
    fn display_text(self) -> &'static str {
        match self {
            RelationshipChoice::Friend => "Friend",
            RelationshipChoice::Colleague => "Colleague",
            RelationshipChoice::Boss => "Boss / senior",
            RelationshipChoice::Client => "Client / customer",
            RelationshipChoice::Family => "Family",
            RelationshipChoice::Partner => "Partner",
            RelationshipChoice::Other => "Other",
        }
    }
}

/// Resolve the relationship text: the choice's label, or the override when `Other`.
/// An empty override falls back to "Other".
pub fn resolve_relationship(choice: RelationshipChoice, other_text: &str) -> String {
    match choice {
        RelationshipChoice::Other => {
            let text = other_text.trim();
            if text.is_empty() {
                RelationshipChoice::Other.display_text().to_string()
            } else {
                text.to_string()
            }
        }
        fixed => fixed.display_text().to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Punctuation {
    #[default]
    Use,
    Omit,
}

impl Punctuation {
    pub fn describe(self) -> &'static str {
        match self {
            Punctuation::Use => "Use punctuation",
            Punctuation::Omit => "Omit punctuation",
        }
    }
}

pub const DEFAULT_LEVEL: u8 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplySettings {
    pub received_message: String,
    pub user_role: String,
    /// Resolved relationship text that goes into the prompt.
    pub relationship: String,
    pub relationship_choice: RelationshipChoice,
    /// Negative (0) to positive (100).
    pub sentiment: u8,
    /// Casual (0) to formal (100).
    pub politeness: u8,
    pub char_count: Option<String>,
    pub punctuation: Punctuation,
    pub show_extra: bool,
    pub reply_content: String,
    pub reference_urls: Vec<String>,
    pub selected_model: String,
}

impl Default for ReplySettings {
    fn default() -> Self {
        Self {
            received_message: String::new(),
            user_role: String::new(),
            relationship: resolve_relationship(RelationshipChoice::default(), ""),
            relationship_choice: RelationshipChoice::default(),
            sentiment: DEFAULT_LEVEL,
            politeness: DEFAULT_LEVEL,
            char_count: None,
            punctuation: Punctuation::default(),
            show_extra: false,
            reply_content: String::new(),
            reference_urls: Vec::new(),
            selected_model: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionSettings {
    pub question: String,
    pub expertise: String,
    pub output_format: String,
    pub urgency: String,
    pub assumptions: String,
    pub reference_urls: Vec<String>,
    pub selected_model: String,
}

/// Trim URLs and drop empty entries. Order and duplicates are kept.
pub fn clean_urls<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    urls.into_iter()
        .map(|u| u.as_ref().trim().to_string())
        .filter(|u| !u.is_empty())
        .collect()
}
