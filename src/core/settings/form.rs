//! Form overlays: the fields a user filled in for one run, applied on top of a base
//! settings snapshot (defaults, or a record restored from history).
//!
//! `None` means "not touched"; the base value is kept.

use super::{
    Punctuation, QuestionSettings, RelationshipChoice, ReplySettings, clean_urls,
    resolve_relationship,
};

#[derive(Debug, Clone, Default)]
pub struct ReplyForm {
    pub received_message: Option<String>,
    pub user_role: Option<String>,
    pub relationship: Option<RelationshipChoice>,
    pub relationship_other: Option<String>,
    pub sentiment: Option<u8>,
    pub politeness: Option<u8>,
    pub char_count: Option<String>,
    pub punctuation: Option<Punctuation>,
    pub show_extra: Option<bool>,
    pub reply_content: Option<String>,
    /// Replaces the base list when non-empty.
    pub reference_urls: Vec<String>,
    pub selected_model: Option<String>,
}

impl ReplyForm {
    pub fn apply(self, mut base: ReplySettings) -> ReplySettings {
        if let Some(v) = self.received_message {
            base.received_message = v;
        }
        if let Some(v) = self.user_role {
            base.user_role = v;
        }

        // Typing into the "other" box selects it.
        let choice = match (self.relationship, &self.relationship_other) {
            (Some(choice), _) => Some(choice),
            (None, Some(_)) => Some(RelationshipChoice::Other),
            (None, None) => None,
        };
        if let Some(choice) = choice {
            let other_text = match (&self.relationship_other, choice) {
                (Some(text), _) => text.clone(),
                (None, RelationshipChoice::Other)
                    if base.relationship_choice == RelationshipChoice::Other =>
                {
                    base.relationship.clone()
                }
                (None, _) => String::new(),
            };
            base.relationship_choice = choice;
            base.relationship = resolve_relationship(choice, &other_text);
        }

        if let Some(v) = self.sentiment {
            base.sentiment = v;
        }
        if let Some(v) = self.politeness {
            base.politeness = v;
        }
        if let Some(v) = self.char_count {
            let v = v.trim().to_string();
            base.char_count = if v.is_empty() { None } else { Some(v) };
        }
        if let Some(v) = self.punctuation {
            base.punctuation = v;
        }
        if let Some(v) = self.show_extra {
            base.show_extra = v;
        }
        if let Some(v) = self.reply_content {
            base.reply_content = v;
        }
        if !self.reference_urls.is_empty() {
            base.reference_urls = clean_urls(&self.reference_urls);
        }
        if let Some(v) = self.selected_model {
            base.selected_model = v.trim().to_string();
        }
        base
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestionForm {
    pub question: Option<String>,
    pub expertise: Option<String>,
    pub output_format: Option<String>,
    pub urgency: Option<String>,
    pub assumptions: Option<String>,
    pub reference_urls: Vec<String>,
    pub selected_model: Option<String>,
}

impl QuestionForm {
    pub fn apply(self, mut base: QuestionSettings) -> QuestionSettings {
        if let Some(v) = self.question {
            base.question = v;
        }
        if let Some(v) = self.expertise {
            base.expertise = v;
        }
        if let Some(v) = self.output_format {
            base.output_format = v;
        }
        if let Some(v) = self.urgency {
            base.urgency = v;
        }
        if let Some(v) = self.assumptions {
            base.assumptions = v;
        }
        if !self.reference_urls.is_empty() {
            base.reference_urls = clean_urls(&self.reference_urls);
        }
        if let Some(v) = self.selected_model {
            base.selected_model = v.trim().to_string();
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_keeps_base() {
        let base = ReplySettings {
            received_message: "hi".to_string(),
            sentiment: 80,
            ..Default::default()
        };
        assert_eq!(ReplyForm::default().apply(base.clone()), base);
    }

    #[test]
    fn other_text_selects_other_choice() {
        let form = ReplyForm {
            relationship_other: Some("Landlord".to_string()),
            ..Default::default()
        };
        let settings = form.apply(ReplySettings::default());
        assert_eq!(settings.relationship_choice, RelationshipChoice::Other);
        assert_eq!(settings.relationship, "Landlord");
    }

    #[test]
    fn switching_choice_resolves_label() {
        let form = ReplyForm {
            relationship: Some(RelationshipChoice::Colleague),
            ..Default::default()
        };
        let settings = form.apply(ReplySettings::default());
        assert_eq!(settings.relationship, "Colleague");
    }

    #[test]
    fn restored_other_text_survives_reselecting_other() {
        let base = ReplySettings {
            relationship_choice: RelationshipChoice::Other,
            relationship: "Coach".to_string(),
            ..Default::default()
        };
        let form = ReplyForm {
            relationship: Some(RelationshipChoice::Other),
            ..Default::default()
        };
        assert_eq!(form.apply(base).relationship, "Coach");
    }

    #[test]
    fn urls_are_cleaned_and_replace_base() {
        let base = ReplySettings {
            reference_urls: vec!["https://old.example".to_string()],
            ..Default::default()
        };
        let form = ReplyForm {
            reference_urls: vec![" https://new.example ".to_string(), String::new()],
            ..Default::default()
        };
        assert_eq!(form.apply(base).reference_urls, vec!["https://new.example"]);
    }

    #[test]
    fn blank_char_count_clears_it() {
        let base = ReplySettings {
            char_count: Some("100".to_string()),
            ..Default::default()
        };
        let form = ReplyForm {
            char_count: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(form.apply(base).char_count, None);
    }

    #[test]
    fn question_form_overrides_fields() {
        let base = QuestionSettings {
            question: "old".to_string(),
            expertise: "Law".to_string(),
            ..Default::default()
        };
        let form = QuestionForm {
            question: Some("new".to_string()),
            selected_model: Some(" models/gemini-pro ".to_string()),
            ..Default::default()
        };
        let settings = form.apply(base);
        assert_eq!(settings.question, "new");
        assert_eq!(settings.expertise, "Law");
        assert_eq!(settings.selected_model, "models/gemini-pro");
    }
}
